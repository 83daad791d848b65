//! Quantity values produced by `toQuantity()`.

use rust_decimal::Decimal;
use std::fmt;

/// A decimal value with an optional UCUM unit.
///
/// Numbers converted to quantities carry the unit `'1'`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuantityValue {
    pub value: Decimal,
    pub unit: Option<String>,
}

impl QuantityValue {
    pub fn new(value: Decimal, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: Some(unit.into()),
        }
    }

    /// A dimensionless quantity (`unit = '1'`).
    pub fn unity(value: Decimal) -> Self {
        Self::new(value, "1")
    }

    /// Parses the FHIRPath quantity literal form `5 'mg'` or a bare number.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        match text.split_once(' ') {
            Some((number, unit)) => {
                let value = number.parse().ok()?;
                let unit = unit.trim().strip_prefix('\'')?.strip_suffix('\'')?;
                Some(Self::new(value, unit))
            }
            None => text.parse().ok().map(Self::unity),
        }
    }
}

impl fmt::Display for QuantityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.unit {
            Some(unit) => write!(f, "{} '{}'", self.value, unit),
            None => write!(f, "{}", self.value),
        }
    }
}
