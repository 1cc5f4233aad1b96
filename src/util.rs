/// Numeric conversion helpers.
///
/// The evaluator works on `f64` values, but shifts and radix formatting need
/// integers. These helpers perform those conversions without panicking:
/// truncation saturates, and exact conversions report failure with `None`.
pub mod num;
