use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// `2^63`, the first whole `f64` above `i64::MAX`.
const I64_UPPER_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Converts an `f64` to `i64` if and only if it is a whole number in
/// `[-2^63, 2^63)`.
///
/// Used by the output radix formatter: anything that fails this check is
/// printed in decimal form instead.
///
/// ## Example
/// ```
/// use radcalc::util::num::f64_to_i64_exact;
///
/// assert_eq!(f64_to_i64_exact(255.0), Some(255));
/// assert_eq!(f64_to_i64_exact(-8.0), Some(-8));
/// assert_eq!(f64_to_i64_exact(0.5), None);
/// assert_eq!(f64_to_i64_exact(f64::NAN), None);
/// assert_eq!(f64_to_i64_exact(2f64.powi(60)), Some(1 << 60));
/// assert_eq!(f64_to_i64_exact(1e300), None);
/// ```
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn f64_to_i64_exact(value: f64) -> Option<i64> {
    if !value.is_finite()
       || value.fract() != 0.0
       || !(-I64_UPPER_BOUND..I64_UPPER_BOUND).contains(&value)
    {
        return None;
    }
    Some(value as i64)
}

/// Truncates an `f64` shift operand toward zero.
///
/// Out-of-range values saturate and `NaN` becomes `0`, so the conversion never
/// panics.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn f64_to_i64_truncating(value: f64) -> i64 {
    value as i64
}

/// Converts a shift count to `u32`.
///
/// ## Errors
/// Returns `RuntimeError::NegativeShift` when the count is below zero.
/// Counts beyond `u32::MAX` are clamped, which still shifts every bit out.
pub fn shift_count(count: i64) -> EvalResult<u32> {
    if count < 0 {
        return Err(RuntimeError::NegativeShift { count });
    }
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

/// Converts an `i64` to `f64`. Values beyond `2^53` lose precision, matching
/// the float semantics of the rest of the evaluator.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    value as f64
}
