/// The evaluator module reduces parsed lines to results.
///
/// The evaluator takes the flat node sequence produced by the parser and
/// rewrites it in place until a single number remains, honouring grouping and
/// operator precedence. It owns the variable store and performs the control
/// verbs.
///
/// # Responsibilities
/// - Reduces node sequences following the usual order of operations.
/// - Resolves variables and commits assignments.
/// - Renders results in the requested number system.
/// - Saves, loads and clears variables.
pub mod evaluator;
/// The lexer module splits an input line into items.
///
/// The scanner is a state machine that yields one item per number, variable,
/// operator, parenthesis, keyword or whitespace run, each tagged with its byte
/// offset. It can run on its own thread and hand items to the parser through a
/// rendezvous channel.
pub mod lexer;
/// Node types shared by the parser and the evaluator.
pub mod node;
/// The parser module validates items and builds the node sequence.
///
/// Every item is checked against the node to its left; there is no tree.
/// Errors carry the offending text and position, and the nodes accepted up to
/// that point stay available for inspection.
pub mod parser;
/// The value module defines number literals and number systems.
///
/// Numbers stay in their literal text form with a number system tag, and are
/// converted to `f64` only when an operator needs them.
pub mod value;
