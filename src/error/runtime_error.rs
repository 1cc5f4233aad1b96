use thiserror::Error;

use crate::{error::StorageError, interpreter::value::core::Pos};

/// Represents all errors that can occur during evaluation.
///
/// An evaluation error aborts the current line. The variable store is left
/// untouched because assignments are committed only after a full reduction.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A variable was read before anything was assigned to it.
    #[error("unknown variable {name}")]
    UnknownVariable {
        /// The variable name including the `$`.
        name: String,
    },
    /// A literal could not be converted to a number in its system.
    #[error("malformed number {literal}")]
    MalformedNumber {
        /// The literal text.
        literal: String,
    },
    /// A shift by a negative amount.
    #[error("cannot shift by negative count {count}")]
    NegativeShift {
        /// The shift count.
        count: i64,
    },
    /// An operator or function was applied to something that is not a value.
    #[error("expected a number or variable at pos {pos}, found {token}")]
    NotAValue {
        /// Text of the node found instead.
        token: String,
        /// Its position.
        pos:   Pos,
    },
    /// The node sequence could not be reduced to a single value.
    #[error("cannot reduce expression: {nodes}")]
    Irreducible {
        /// The remaining nodes, rendered.
        nodes: String,
    },
    /// The evaluator was handed the output of a failed parse.
    #[error("cannot evaluate a line that failed to parse (stopped at pos {pos})")]
    IncompleteParse {
        /// Where parsing stopped.
        pos: Pos,
    },
    /// Saving or loading a profile failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
