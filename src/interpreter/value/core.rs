use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{
    error::RuntimeError,
    interpreter::evaluator::core::EvalResult,
    util::num::i64_to_f64,
};

/// Byte offset into the input line.
pub type Pos = usize;

/// The four number systems a literal can be written in, and the four output
/// formats a result can be rendered in.
///
/// The lowercase names double as the output keywords: `dec(...)`, `hex(...)`,
/// `bin(...)`, `oct(...)`.
#[derive(Debug,
         Clone,
         Copy,
         PartialEq,
         Eq,
         Hash,
         Default,
         Serialize,
         Deserialize,
         Display,
         EnumString,
         AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NumberSystem {
    /// `123`, `1.5`, `-7`
    #[default]
    Dec,
    /// `0xff`, `0X7F`
    Hex,
    /// `b0101`
    Bin,
    /// `0755`
    Oct,
}

impl NumberSystem {
    /// Detects the number system of a literal from its prefix.
    ///
    /// A leading `-` is ignored. `b`/`B` marks binary, `0x`/`0X` marks hex,
    /// and a leading `0` followed by more characters (with no decimal point)
    /// marks octal. Everything else, including a lone `0`, is decimal.
    ///
    /// # Example
    /// ```
    /// use radcalc::interpreter::value::core::NumberSystem;
    ///
    /// assert_eq!(NumberSystem::infer("0xff"), NumberSystem::Hex);
    /// assert_eq!(NumberSystem::infer("-b101"), NumberSystem::Bin);
    /// assert_eq!(NumberSystem::infer("0755"), NumberSystem::Oct);
    /// assert_eq!(NumberSystem::infer("0.5"), NumberSystem::Dec);
    /// assert_eq!(NumberSystem::infer("0"), NumberSystem::Dec);
    /// ```
    #[must_use]
    pub fn infer(literal: &str) -> Self {
        let digits = literal.strip_prefix('-').unwrap_or(literal);
        match digits.as_bytes() {
            [b'b' | b'B', ..] => Self::Bin,
            [b'0', b'x' | b'X', ..] => Self::Hex,
            [b'0', _, ..] if !digits.contains('.') => Self::Oct,
            _ => Self::Dec,
        }
    }

    const fn radix(self) -> u32 {
        match self {
            Self::Dec => 10,
            Self::Hex => 16,
            Self::Bin => 2,
            Self::Oct => 8,
        }
    }

    /// Length of the literal prefix that precedes the digits.
    const fn prefix_len(self) -> usize {
        match self {
            Self::Dec => 0,
            Self::Hex => 2,
            Self::Bin | Self::Oct => 1,
        }
    }
}

/// A number literal as text plus the number system it is written in.
///
/// Numbers are kept as text so that a literal typed by the user is echoed
/// back exactly (`0xff` stays `0xff`). Conversion to `f64` happens only when
/// an operator needs the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Number {
    /// Lowercased literal text, possibly with a leading `-`.
    pub value:  String,
    /// The number system `value` is written in.
    pub system: NumberSystem,
    /// Where the literal (or the expression it was computed from) starts.
    #[serde(skip)]
    pub pos:    Pos,
}

impl Number {
    /// Creates a number from literal text in a known system.
    #[must_use]
    pub fn new(pos: Pos, value: &str, system: NumberSystem) -> Self {
        Self { value: value.to_lowercase(),
               system,
               pos }
    }

    /// Creates a number from literal text, inferring its system.
    #[must_use]
    pub fn parse(pos: Pos, literal: &str) -> Self {
        Self::new(pos, literal, NumberSystem::infer(literal))
    }

    /// Creates a decimal number holding a computed value.
    #[must_use]
    pub fn from_f64(pos: Pos, value: f64) -> Self {
        Self { value: format_decimal(value),
               system: NumberSystem::Dec,
               pos }
    }

    /// Converts the literal to an `f64`.
    ///
    /// Decimal text is parsed as floating point. Hex, octal and binary text is
    /// parsed as a signed 64-bit integer after its prefix is removed.
    ///
    /// # Errors
    /// Returns `RuntimeError::MalformedNumber` if the text is not a valid
    /// literal for its system (for example `08`, `0x`, or an integer that
    /// overflows 64 bits).
    ///
    /// # Example
    /// ```
    /// use radcalc::interpreter::value::core::Number;
    ///
    /// assert_eq!(Number::parse(0, "0xff").to_f64().unwrap(), 255.0);
    /// assert_eq!(Number::parse(0, "-0755").to_f64().unwrap(), -493.0);
    /// assert_eq!(Number::parse(0, "b101").to_f64().unwrap(), 5.0);
    /// assert!(Number::parse(0, "089").to_f64().is_err());
    /// ```
    pub fn to_f64(&self) -> EvalResult<f64> {
        let malformed = || RuntimeError::MalformedNumber { literal: self.value.clone() };

        if self.system == NumberSystem::Dec {
            return self.value.parse::<f64>().map_err(|_| malformed());
        }

        let (negative, unsigned) = match self.value.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, self.value.as_str()),
        };
        let digits = unsigned.get(self.system.prefix_len()..)
                             .filter(|d| !d.is_empty() && !d.starts_with(['+', '-']))
                             .ok_or_else(malformed)?;
        let signed = if negative { format!("-{digits}") } else { digits.to_string() };

        i64::from_str_radix(&signed, self.system.radix()).map(i64_to_f64)
                                                           .map_err(|_| malformed())
    }

    /// Re-renders the value in another number system.
    ///
    /// # Errors
    /// Fails when the literal itself cannot be converted, see [`Self::to_f64`].
    pub fn render(&self, system: NumberSystem) -> EvalResult<String> {
        Ok(super::radix::format_in(self.to_f64()?, system))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Formats an `f64` as the shortest decimal text that round-trips, never
/// using exponent notation. Negative zero prints as `0`.
#[must_use]
pub fn format_decimal(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inference_follows_prefixes() {
        assert_eq!(NumberSystem::infer("b0"), NumberSystem::Bin);
        assert_eq!(NumberSystem::infer("B11"), NumberSystem::Bin);
        assert_eq!(NumberSystem::infer("0X1F"), NumberSystem::Hex);
        assert_eq!(NumberSystem::infer("00"), NumberSystem::Oct);
        assert_eq!(NumberSystem::infer("-0.25"), NumberSystem::Dec);
        assert_eq!(NumberSystem::infer("10"), NumberSystem::Dec);
        assert_eq!(NumberSystem::infer(""), NumberSystem::Dec);
    }

    #[test]
    fn literals_are_lowercased() {
        let n = Number::parse(3, "0XFF");
        assert_eq!(n.value, "0xff");
        assert_eq!(n.system, NumberSystem::Hex);
        assert_eq!(n.pos, 3);
    }

    #[test]
    fn malformed_literals_are_errors() {
        for literal in ["0x", "b", "08", "1.2.3", "-", "0xfffffffffffffffff"] {
            let err = Number::parse(0, literal).to_f64().unwrap_err();
            assert!(matches!(err, RuntimeError::MalformedNumber { .. }), "{literal}");
        }
    }

    #[test]
    fn decimal_formatting_has_no_exponent() {
        assert_eq!(format_decimal(3.0), "3");
        assert_eq!(format_decimal(-15.0), "-15");
        assert_eq!(format_decimal(1e21), "1000000000000000000000");
        assert_eq!(format_decimal(1e-22), "0.0000000000000000000001");
        assert_eq!(format_decimal(0.75), "0.75");
    }

    #[test]
    fn system_keywords() {
        assert_eq!(NumberSystem::Hex.to_string(), "hex");
        assert_eq!("oct".parse::<NumberSystem>().unwrap(), NumberSystem::Oct);
    }
}
