use thiserror::Error;

/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of an
/// input line: unrecognised characters, tokens in an illegal left context,
/// unbalanced parentheses, malformed verbs and premature end of input.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation, such as
/// unknown variables, malformed number literals and storage failures.
pub mod runtime_error;
/// Storage errors.
///
/// Failures of the profile persistence backends.
pub mod storage_error;

pub use parse_error::{ParseError, ParseFailure};
pub use runtime_error::RuntimeError;
pub use storage_error::StorageError;

/// Any failure of a single input line.
#[derive(Debug, Error)]
pub enum Error {
    /// The line was rejected by the lexer or parser.
    #[error(transparent)]
    Parse(#[from] ParseFailure),
    /// The line parsed but could not be evaluated.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
