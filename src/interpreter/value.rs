/// Radix-tagged number literals.
///
/// Defines `NumberSystem` (decimal, hexadecimal, binary, octal) and `Number`,
/// the literal-as-text representation shared by the parser, the evaluator and
/// the variable store. Numbers keep the text the user typed and are converted
/// to `f64` only when an operator consumes them.
pub mod core;
/// Output formatting in a chosen number system.
///
/// Renders computed values as hex, octal or binary literals for `hex(...)`,
/// `oct(...)` and `bin(...)`.
pub mod radix;
