use thiserror::Error;

use crate::interpreter::{node::Node, value::core::Pos};

/// Represents all errors that can occur during lexing or parsing.
///
/// Every variant carries the byte offset of the offending item; variants
/// about a specific token also carry its text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The scanner hit a character it does not recognise.
    #[error("{message} at pos {pos}")]
    Lex {
        /// Scanner message, e.g. `Unexpected <`.
        message: String,
        /// Position of the character.
        pos:     Pos,
    },
    /// A token that is never valid where it appeared.
    #[error("unexpected {token} at pos {pos}")]
    Unexpected {
        /// The token text.
        token: String,
        /// Position of the token.
        pos:   Pos,
    },
    /// An operator without a value or `)` on its left.
    #[error("unexpected {token} at pos {pos}, operators should follow numbers, variables, or closing parenthesis")]
    OperatorPlacement {
        /// The operator text.
        token: String,
        /// Position of the operator.
        pos:   Pos,
    },
    /// A number or variable directly after another value or `)`.
    #[error("unexpected {token} at pos {pos}, numbers and variables should follow operators, (, =, or an output setting")]
    ValuePlacement {
        /// The value text.
        token: String,
        /// Position of the value.
        pos:   Pos,
    },
    /// An opening parenthesis after a value or `)`.
    #[error("unexpected ( at pos {pos}, should be following abs, dec, hex, bin, oct, =, operators, or other (s")]
    OpenParenPlacement {
        /// Position of the parenthesis.
        pos: Pos,
    },
    /// A closing parenthesis that does not follow a value or another `)`.
    #[error("unexpected ) at pos {pos}, should be following numbers, variables, or other )s")]
    CloseParenPlacement {
        /// Position of the parenthesis.
        pos: Pos,
    },
    /// A closing parenthesis with nothing open.
    #[error("unexpected ) at pos {pos}, no parenthesis open")]
    NoOpenParen {
        /// Position of the parenthesis.
        pos: Pos,
    },
    /// `abs` directly after a value or `)`.
    #[error("unexpected abs() at pos {pos}, may follow operators, (, or =")]
    AbsPlacement {
        /// Position of `abs`.
        pos: Pos,
    },
    /// An output setting that is not the first thing on the line.
    #[error("unexpected {token} at pos {pos}, setting output type must be the first thing you do")]
    OutputPlacement {
        /// The keyword text.
        token: String,
        /// Position of the keyword.
        pos:   Pos,
    },
    /// `=` anywhere other than right after a leading variable.
    #[error("unexpected = at pos {pos}, equals can only follow a variable name at the very start of the line. Ex: $foo = 1")]
    AssignPlacement {
        /// Position of the `=`.
        pos: Pos,
    },
    /// `clear`, `save` or `load` used in any shape other than its fixed form.
    #[error("unexpected {verb} at pos {pos}, when used the input should be only: {form}")]
    VerbForm {
        /// The verb text.
        verb: String,
        /// Position of the verb.
        pos:  Pos,
        /// The only accepted spelling, e.g. `save(name)`.
        form: &'static str,
    },
    /// Input ended with parentheses still open.
    #[error("unexpected end of input, there are unclosed parenthesis")]
    UnclosedParen {
        /// Length of the input.
        pos: Pos,
    },
    /// Input ended right after an operator, `(`, `=`, or a function name.
    #[error("unexpected end of input")]
    UnexpectedEnd {
        /// Length of the input.
        pos: Pos,
    },
    /// The item stream closed without an end-of-input item.
    #[error("internal error while parsing: item stream closed at pos {pos}")]
    Interrupted {
        /// End of the last item received.
        pos: Pos,
    },
}

impl ParseError {
    /// Returns the byte offset the error refers to.
    #[must_use]
    pub const fn pos(&self) -> Pos {
        match self {
            Self::Lex { pos, .. }
            | Self::Unexpected { pos, .. }
            | Self::OperatorPlacement { pos, .. }
            | Self::ValuePlacement { pos, .. }
            | Self::OpenParenPlacement { pos }
            | Self::CloseParenPlacement { pos }
            | Self::NoOpenParen { pos }
            | Self::AbsPlacement { pos }
            | Self::OutputPlacement { pos, .. }
            | Self::AssignPlacement { pos }
            | Self::VerbForm { pos, .. }
            | Self::UnclosedParen { pos }
            | Self::UnexpectedEnd { pos }
            | Self::Interrupted { pos } => *pos,
        }
    }
}

/// A rejected line: the error plus every node built before parsing stopped.
///
/// `nodes` always ends with [`Node::ParsingStopped`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct ParseFailure {
    /// Why parsing stopped.
    pub error: ParseError,
    /// Nodes accepted so far, terminated by the stop marker.
    pub nodes: Vec<Node>,
}
