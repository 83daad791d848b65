//! Scalar coercions exposed to the FHIRPath evaluator.
//!
//! Every FHIR type answers the eight FHIRPath conversion functions. Types that have
//! no scalar projection keep the default methods, which report
//! [`ConversionError::NotConvertible`] instead of failing at the call site.

use crate::quantity::QuantityValue;
use crate::temporal::{PrecisionDate, PrecisionDateTime, PrecisionTime};
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Target of a scalar conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Boolean,
    String,
    Integer,
    Decimal,
    Date,
    Time,
    DateTime,
    Quantity,
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarType::Boolean => "Boolean",
            ScalarType::String => "String",
            ScalarType::Integer => "Integer",
            ScalarType::Decimal => "Decimal",
            ScalarType::Date => "Date",
            ScalarType::Time => "Time",
            ScalarType::DateTime => "DateTime",
            ScalarType::Quantity => "Quantity",
        };
        f.write_str(name)
    }
}

/// Outcome of a failed conversion. These are ordinary values; the evaluator maps
/// them to an empty result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The source type has no projection onto the target type.
    #[error("cannot convert {from} to {to}")]
    NotConvertible { from: &'static str, to: ScalarType },

    /// The source type can convert, but this particular value cannot.
    #[error("cannot convert {from} value `{value}` to {to}")]
    InvalidValue {
        from: &'static str,
        to: ScalarType,
        value: String,
    },

    /// A primitive carrying only an id or extensions.
    #[error("{from} has no value to convert to {to}")]
    Empty { from: &'static str, to: ScalarType },
}

pub type ConversionResult<T> = std::result::Result<T, ConversionError>;

/// The eight FHIRPath conversion functions.
pub trait ScalarConversion {
    /// FHIR type name used in error messages.
    fn fhir_type_name(&self) -> &'static str;

    /// Convenience constructor for the default "not convertible" outcome.
    fn not_convertible(&self, to: ScalarType) -> ConversionError {
        ConversionError::NotConvertible {
            from: self.fhir_type_name(),
            to,
        }
    }

    fn to_boolean(&self) -> ConversionResult<bool> {
        Err(self.not_convertible(ScalarType::Boolean))
    }

    /// `toString()`. Named to avoid clashing with [`ToString`].
    fn to_string_value(&self) -> ConversionResult<String> {
        Err(self.not_convertible(ScalarType::String))
    }

    fn to_integer(&self) -> ConversionResult<i64> {
        Err(self.not_convertible(ScalarType::Integer))
    }

    fn to_decimal(&self) -> ConversionResult<Decimal> {
        Err(self.not_convertible(ScalarType::Decimal))
    }

    fn to_date(&self) -> ConversionResult<PrecisionDate> {
        Err(self.not_convertible(ScalarType::Date))
    }

    fn to_time(&self) -> ConversionResult<PrecisionTime> {
        Err(self.not_convertible(ScalarType::Time))
    }

    fn to_date_time(&self) -> ConversionResult<PrecisionDateTime> {
        Err(self.not_convertible(ScalarType::DateTime))
    }

    fn to_quantity(&self) -> ConversionResult<QuantityValue> {
        Err(self.not_convertible(ScalarType::Quantity))
    }
}

/// FHIRPath `toBoolean()` on a string.
pub fn string_to_boolean(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" | "1.0" => Some(true),
        "false" | "f" | "no" | "n" | "0" | "0.0" => Some(false),
        _ => None,
    }
}

/// FHIRPath `toBoolean()` on a decimal.
pub fn decimal_to_boolean(value: Decimal) -> Option<bool> {
    if value == Decimal::ONE {
        Some(true)
    } else if value.is_zero() {
        Some(false)
    } else {
        None
    }
}

/// FHIRPath `toBoolean()` on an integer.
pub fn integer_to_boolean(value: i64) -> Option<bool> {
    match value {
        1 => Some(true),
        0 => Some(false),
        _ => None,
    }
}
