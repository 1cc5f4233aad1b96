/// Operator arithmetic.
///
/// Maps each binary operator to its floating point computation, including
/// floored division and modulo and 64-bit integer shifts.
pub mod binary;

/// Core evaluation logic and calculator state.
///
/// Contains the `Calculator`, control node handling (output settings,
/// assignment, `clear`, `save`, `load`) and the result type shared by the
/// evaluator.
pub mod core;

/// Flat sequence reduction.
///
/// Reduces a parsed node sequence in place: groups first, then `**`, then
/// the multiplicative operators, then `+` and `-`.
pub mod pemdas;
