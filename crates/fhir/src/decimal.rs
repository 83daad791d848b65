//! Decimal values that remember how they were written.

use crate::primitive::ValueError;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// A FHIR `decimal`.
///
/// FHIR requires decimal precision to survive a round trip, so `1.50` must be written
/// back as `1.50`, not `1.5`. The parsed [`Decimal`] is used for arithmetic and
/// comparison while the original text is what gets serialized.
///
/// Equality is numeric: `1.5` and `1.50` compare equal.
#[derive(Debug, Clone)]
pub struct PreciseDecimal {
    value: Decimal,
    original: String,
}

impl PreciseDecimal {
    /// Parses FHIR decimal lexical form, scientific notation included.
    pub fn parse(text: &str) -> Result<Self, ValueError> {
        if !is_decimal_lexical(text) {
            return Err(ValueError::invalid("decimal", text));
        }
        let value = if text.contains(['e', 'E']) {
            Decimal::from_scientific(text)
        } else {
            Decimal::from_str(text)
        }
        .map_err(|_| ValueError::invalid("decimal", text))?;
        Ok(Self {
            value,
            original: text.to_string(),
        })
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    /// The text this value was parsed from.
    pub fn original(&self) -> &str {
        &self.original
    }
}

fn is_decimal_lexical(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(index) => (&unsigned[..index], Some(&unsigned[index + 1..])),
        None => (unsigned, None),
    };
    let (integer, fraction) = match mantissa.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (mantissa, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let integer_ok = digits(integer) && (integer == "0" || !integer.starts_with('0'));
    let fraction_ok = fraction.is_none_or(digits);
    let exponent_ok = exponent.is_none_or(|e| {
        digits(e.strip_prefix(['+', '-']).unwrap_or(e))
    });
    integer_ok && fraction_ok && exponent_ok
}

impl From<Decimal> for PreciseDecimal {
    fn from(value: Decimal) -> Self {
        Self {
            value,
            original: value.to_string(),
        }
    }
}

impl PartialEq for PreciseDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Display for PreciseDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl FromStr for PreciseDecimal {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_keeps_trailing_zeros() {
        let value = PreciseDecimal::parse("1.50").unwrap();
        assert_eq!(value.to_string(), "1.50");
        assert_eq!(value.value(), dec!(1.5));
        assert_eq!(value, PreciseDecimal::from(dec!(1.5)));
    }

    #[test]
    fn test_scientific_notation() {
        let value = PreciseDecimal::parse("1.2e3").unwrap();
        assert_eq!(value.value(), dec!(1200));
        assert_eq!(value.original(), "1.2e3");
    }

    #[test]
    fn test_rejects_non_fhir_forms() {
        for text in ["", "01", "1.", ".5", "+1", "1e", "abc", "1,5"] {
            assert!(PreciseDecimal::parse(text).is_err(), "{text} should fail");
        }
        assert!(PreciseDecimal::parse("-0.001").is_ok());
    }
}
