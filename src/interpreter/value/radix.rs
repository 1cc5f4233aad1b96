use crate::{
    interpreter::value::core::{NumberSystem, format_decimal},
    util::num::f64_to_i64_exact,
};

/// Formats a value as a literal of the requested number system.
///
/// The output always re-lexes as a number literal of the same system:
/// `0xff`, `0377`, `b11111111`. Negative integers keep their sign in front of
/// the prefix (`-0x6`). Zero becomes `0x0`, `00` and `b0`.
///
/// Only whole numbers in `[-2^63, 2^63)` have an integer form; any other
/// value (fractions, infinities, `NaN`, huge magnitudes) is left in decimal.
///
/// # Example
/// ```
/// use radcalc::interpreter::value::{core::NumberSystem, radix::format_in};
///
/// assert_eq!(format_in(255.0, NumberSystem::Hex), "0xff");
/// assert_eq!(format_in(255.0, NumberSystem::Oct), "0377");
/// assert_eq!(format_in(2.0, NumberSystem::Bin), "b10");
/// assert_eq!(format_in(-6.0, NumberSystem::Hex), "-0x6");
/// assert_eq!(format_in(0.5, NumberSystem::Hex), "0.5");
/// ```
#[must_use]
pub fn format_in(value: f64, system: NumberSystem) -> String {
    let Some(integer) = f64_to_i64_exact(value).filter(|_| system != NumberSystem::Dec) else {
        return format_decimal(value);
    };

    let sign = if integer < 0 { "-" } else { "" };
    let magnitude = integer.unsigned_abs();

    match system {
        NumberSystem::Hex => format!("{sign}0x{magnitude:x}"),
        NumberSystem::Oct => format!("{sign}0{magnitude:o}"),
        NumberSystem::Bin => format!("{sign}b{magnitude:b}"),
        NumberSystem::Dec => format_decimal(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::value::core::Number;

    #[test]
    fn rendered_literals_relex_in_the_same_system() {
        for system in [NumberSystem::Hex, NumberSystem::Oct, NumberSystem::Bin] {
            for value in [0.0, 1.0, 8.0, 255.0, -493.0, 12_245_527.0] {
                let text = format_in(value, system);
                let number = Number::parse(0, &text);
                assert_eq!(number.system, system, "{text}");
                assert_eq!(number.to_f64().unwrap(), value, "{text}");
            }
        }
    }

    #[test]
    fn decimal_output() {
        assert_eq!(format_in(493.0, NumberSystem::Dec), "493");
        assert_eq!(format_in(-0.1, NumberSystem::Dec), "-0.1");
    }

    #[test]
    fn non_integral_values_stay_decimal() {
        assert_eq!(format_in(2.5, NumberSystem::Bin), "2.5");
        assert_eq!(format_in(f64::INFINITY, NumberSystem::Oct), "inf");
    }

    #[test]
    fn integers_beyond_2_pow_53_keep_their_radix() {
        assert_eq!(format_in(2f64.powi(60), NumberSystem::Hex), "0x1000000000000000");
        assert_eq!(format_in(2f64.powi(54), NumberSystem::Bin), format!("b1{}", "0".repeat(54)));
        assert_eq!(format_in(-(2f64.powi(63)), NumberSystem::Hex), "-0x8000000000000000");
    }
}
