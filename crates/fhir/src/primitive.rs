//! The primitive value model.
//!
//! A FHIR primitive is a scalar plus optional decoration: an element `id` and a list
//! of extensions. Either part may be missing; a primitive with neither is absent and
//! is never written by the codecs.
//!
//! [`Primitive<K>`] is generic over a zero-sized [`PrimitiveKind`] marker, which names
//! the FHIR type and fixes the Rust value type. `code`, `id` and `uri` all hold a
//! `String` but validate differently.

use crate::base::ELEMENT_TYPE;
use crate::datatypes::Extension;
use crate::decimal::PreciseDecimal;
use base64::{Engine, engine::general_purpose::STANDARD};
use helios_fhirpath_support::conversion::{
    decimal_to_boolean, integer_to_boolean, string_to_boolean,
};
use helios_fhirpath_support::type_info::FHIR_TYPE_NAMESPACE;
use helios_fhirpath_support::{
    ConversionError, ConversionResult, ElementInfo, PrecisionDate, PrecisionDateTime,
    PrecisionTime, QuantityValue, ScalarConversion, ScalarType, TypeInfo, TypeKind,
};
use serde_json::Value as JsonValue;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use thiserror::Error;

/// A scalar that does not satisfy its FHIR type's lexical rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("invalid {type_name} value `{text}`")]
    Invalid {
        type_name: &'static str,
        text: String,
    },
}

impl ValueError {
    pub fn invalid(type_name: &'static str, text: &str) -> Self {
        ValueError::Invalid {
            type_name,
            text: text.to_string(),
        }
    }
}

/// Borrowed scalar used by the conversion rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Boolean(bool),
    Integer(i64),
    Decimal(rust_decimal::Decimal),
    Text(&'a str),
    Binary,
    Date(PrecisionDate),
    DateTime(&'a PrecisionDateTime),
    Time(&'a PrecisionTime),
}

/// A Rust type that can hold the value of a FHIR primitive.
pub trait PrimitiveValue: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Parses the FHIR lexical form. Empty text is never valid.
    fn from_lexical(text: &str) -> Option<Self>;

    fn to_lexical(&self) -> String;

    /// Reads the JSON representation. Most types are JSON strings.
    fn from_json(value: &JsonValue) -> Option<Self> {
        value.as_str().and_then(Self::from_lexical)
    }

    fn to_json(&self) -> JsonValue {
        JsonValue::String(self.to_lexical())
    }

    fn scalar(&self) -> Scalar<'_>;
}

impl PrimitiveValue for String {
    fn from_lexical(text: &str) -> Option<Self> {
        (!text.is_empty()).then(|| text.to_string())
    }

    fn to_lexical(&self) -> String {
        self.clone()
    }

    fn scalar(&self) -> Scalar<'_> {
        Scalar::Text(self)
    }
}

impl PrimitiveValue for bool {
    fn from_lexical(text: &str) -> Option<Self> {
        match text {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    fn to_lexical(&self) -> String {
        self.to_string()
    }

    fn from_json(value: &JsonValue) -> Option<Self> {
        value.as_bool()
    }

    fn to_json(&self) -> JsonValue {
        JsonValue::Bool(*self)
    }

    fn scalar(&self) -> Scalar<'_> {
        Scalar::Boolean(*self)
    }
}

fn is_integer_lexical(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'))
}

impl PrimitiveValue for i32 {
    fn from_lexical(text: &str) -> Option<Self> {
        is_integer_lexical(text).then(|| text.parse().ok()).flatten()
    }

    fn to_lexical(&self) -> String {
        self.to_string()
    }

    fn from_json(value: &JsonValue) -> Option<Self> {
        value.as_i64().and_then(|v| v.try_into().ok())
    }

    fn to_json(&self) -> JsonValue {
        JsonValue::from(*self)
    }

    fn scalar(&self) -> Scalar<'_> {
        Scalar::Integer(i64::from(*self))
    }
}

impl PrimitiveValue for u32 {
    fn from_lexical(text: &str) -> Option<Self> {
        is_integer_lexical(text).then(|| text.parse().ok()).flatten()
    }

    fn to_lexical(&self) -> String {
        self.to_string()
    }

    fn from_json(value: &JsonValue) -> Option<Self> {
        value.as_u64().and_then(|v| v.try_into().ok())
    }

    fn to_json(&self) -> JsonValue {
        JsonValue::from(*self)
    }

    fn scalar(&self) -> Scalar<'_> {
        Scalar::Integer(i64::from(*self))
    }
}

impl PrimitiveValue for PreciseDecimal {
    fn from_lexical(text: &str) -> Option<Self> {
        PreciseDecimal::parse(text).ok()
    }

    fn to_lexical(&self) -> String {
        self.original().to_string()
    }

    fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Number(number) => PreciseDecimal::parse(&number.to_string()).ok(),
            _ => None,
        }
    }

    fn to_json(&self) -> JsonValue {
        serde_json::Number::from_str(self.original())
            .map(JsonValue::Number)
            .unwrap_or_else(|_| JsonValue::String(self.original().to_string()))
    }

    fn scalar(&self) -> Scalar<'_> {
        Scalar::Decimal(self.value())
    }
}

impl PrimitiveValue for PrecisionDate {
    fn from_lexical(text: &str) -> Option<Self> {
        PrecisionDate::parse(text).ok()
    }

    fn to_lexical(&self) -> String {
        self.to_string()
    }

    fn scalar(&self) -> Scalar<'_> {
        Scalar::Date(*self)
    }
}

impl PrimitiveValue for PrecisionDateTime {
    fn from_lexical(text: &str) -> Option<Self> {
        PrecisionDateTime::parse(text).ok()
    }

    fn to_lexical(&self) -> String {
        self.to_string()
    }

    fn scalar(&self) -> Scalar<'_> {
        Scalar::DateTime(self)
    }
}

impl PrimitiveValue for PrecisionTime {
    fn from_lexical(text: &str) -> Option<Self> {
        PrecisionTime::parse(text).ok()
    }

    fn to_lexical(&self) -> String {
        self.to_string()
    }

    fn scalar(&self) -> Scalar<'_> {
        Scalar::Time(self)
    }
}

impl PrimitiveValue for Vec<u8> {
    fn from_lexical(text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        STANDARD.decode(text).ok()
    }

    fn to_lexical(&self) -> String {
        STANDARD.encode(self)
    }

    fn scalar(&self) -> Scalar<'_> {
        Scalar::Binary
    }
}

/// Marker naming a FHIR primitive type.
pub trait PrimitiveKind:
    fmt::Debug + Clone + Copy + PartialEq + Default + Send + Sync + 'static
{
    type Value: PrimitiveValue;

    /// FHIR type name (`dateTime`).
    const NAME: &'static str;

    fn type_info() -> &'static TypeInfo;

    /// Type-specific constraints beyond the value type's own parsing.
    fn accepts(value: &Self::Value) -> bool;

    fn parse_lexical(text: &str) -> Result<Self::Value, ValueError> {
        Self::Value::from_lexical(text)
            .filter(Self::accepts)
            .ok_or_else(|| ValueError::invalid(Self::NAME, text))
    }

    fn parse_json(value: &JsonValue) -> Result<Self::Value, ValueError> {
        Self::Value::from_json(value)
            .filter(Self::accepts)
            .ok_or_else(|| ValueError::invalid(Self::NAME, &value.to_string()))
    }
}

const PRIMITIVE_ELEMENTS: &[ElementInfo] = &[
    ElementInfo::attribute("id", 0),
    ElementInfo::list("extension", &["Extension"]),
];

macro_rules! primitive_kind {
    (
        $(#[$meta:meta])*
        $kind:ident, $name:literal, $value:ty, $info:ident, base = $base:expr, accepts = $accepts:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $kind;

        pub static $info: TypeInfo = TypeInfo {
            namespace: FHIR_TYPE_NAMESPACE,
            name: $name,
            kind: TypeKind::Primitive,
            base: Some($base),
            elements: PRIMITIVE_ELEMENTS,
        };

        impl PrimitiveKind for $kind {
            type Value = $value;
            const NAME: &'static str = $name;

            fn type_info() -> &'static TypeInfo {
                &$info
            }

            fn accepts(value: &Self::Value) -> bool {
                let check: fn(&$value) -> bool = $accepts;
                check(value)
            }
        }
    };
}

primitive_kind!(StringKind, "string", String, STRING_TYPE, base = &ELEMENT_TYPE, accepts = |_| true);
primitive_kind!(
    CodeKind, "code", String, CODE_TYPE, base = &STRING_TYPE,
    accepts = |v| v.trim() == v.as_str()
);
primitive_kind!(
    IdKind, "id", String, ID_TYPE, base = &STRING_TYPE,
    accepts = |v| v.len() <= 64 && v.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.')
);
primitive_kind!(
    UriKind, "uri", String, URI_TYPE, base = &ELEMENT_TYPE,
    accepts = |v| !v.chars().any(char::is_whitespace)
);
primitive_kind!(BooleanKind, "boolean", bool, BOOLEAN_TYPE, base = &ELEMENT_TYPE, accepts = |_| true);
primitive_kind!(IntegerKind, "integer", i32, INTEGER_TYPE, base = &ELEMENT_TYPE, accepts = |_| true);
primitive_kind!(
    UnsignedIntKind, "unsignedInt", u32, UNSIGNED_INT_TYPE, base = &INTEGER_TYPE,
    accepts = |v| i32::try_from(*v).is_ok()
);
primitive_kind!(
    DecimalKind, "decimal", PreciseDecimal, DECIMAL_TYPE, base = &ELEMENT_TYPE,
    accepts = |_| true
);
primitive_kind!(DateKind, "date", PrecisionDate, DATE_TYPE, base = &ELEMENT_TYPE, accepts = |_| true);
primitive_kind!(
    /// A time, when given, carries seconds and a zone offset.
    DateTimeKind, "dateTime", PrecisionDateTime, DATE_TIME_TYPE, base = &ELEMENT_TYPE,
    accepts = |v| v.time().is_none_or(|t| t.second().is_some() && v.offset().is_some())
);
primitive_kind!(
    /// Always a full RFC 3339 timestamp.
    InstantKind, "instant", PrecisionDateTime, INSTANT_TYPE, base = &ELEMENT_TYPE,
    accepts = |v| chrono::DateTime::parse_from_rfc3339(&v.to_string()).is_ok()
);
primitive_kind!(
    TimeKind, "time", PrecisionTime, TIME_TYPE, base = &ELEMENT_TYPE,
    accepts = |v| v.second().is_some()
);
primitive_kind!(
    Base64BinaryKind, "base64Binary", Vec<u8>, BASE64_BINARY_TYPE, base = &ELEMENT_TYPE,
    accepts = |_| true
);

/// A FHIR primitive: optional value, optional element id, extensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive<K: PrimitiveKind> {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub value: Option<K::Value>,
    _kind: PhantomData<K>,
}

// derived `Default` would demand `K::Value: Default`
impl<K: PrimitiveKind> Default for Primitive<K> {
    fn default() -> Self {
        Self {
            id: None,
            extension: Vec::new(),
            value: None,
            _kind: PhantomData,
        }
    }
}

pub type FhirString = Primitive<StringKind>;
pub type Code = Primitive<CodeKind>;
pub type Id = Primitive<IdKind>;
pub type Uri = Primitive<UriKind>;
pub type Boolean = Primitive<BooleanKind>;
pub type Integer = Primitive<IntegerKind>;
pub type UnsignedInt = Primitive<UnsignedIntKind>;
pub type Decimal = Primitive<DecimalKind>;
pub type Date = Primitive<DateKind>;
pub type DateTime = Primitive<DateTimeKind>;
pub type Instant = Primitive<InstantKind>;
pub type Time = Primitive<TimeKind>;
pub type Base64Binary = Primitive<Base64BinaryKind>;

impl<K: PrimitiveKind> Primitive<K> {
    pub fn new(value: K::Value) -> Self {
        Self {
            id: None,
            extension: Vec::new(),
            value: Some(value),
            _kind: PhantomData,
        }
    }

    /// Parses the FHIR lexical form into a primitive without decoration.
    pub fn parse(text: &str) -> Result<Self, ValueError> {
        K::parse_lexical(text).map(Self::new)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extension.push(extension);
        self
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn has_decoration(&self) -> bool {
        self.id.is_some() || !self.extension.is_empty()
    }

    pub fn is_present(&self) -> bool {
        self.has_value() || self.has_decoration()
    }

    fn scalar_for(&self, to: ScalarType) -> ConversionResult<Scalar<'_>> {
        self.value
            .as_ref()
            .map(PrimitiveValue::scalar)
            .ok_or(ConversionError::Empty { from: K::NAME, to })
    }

    fn invalid(&self, to: ScalarType) -> ConversionError {
        ConversionError::InvalidValue {
            from: K::NAME,
            to,
            value: self
                .value
                .as_ref()
                .map(PrimitiveValue::to_lexical)
                .unwrap_or_default(),
        }
    }
}

macro_rules! impl_from_value {
    ($kind:ty, $from:ty, |$v:ident| $convert:expr) => {
        impl From<$from> for Primitive<$kind> {
            fn from($v: $from) -> Self {
                Self::new($convert)
            }
        }
    };
}

impl_from_value!(StringKind, &str, |v| v.to_string());
impl_from_value!(CodeKind, &str, |v| v.to_string());
impl_from_value!(IdKind, &str, |v| v.to_string());
impl_from_value!(UriKind, &str, |v| v.to_string());
impl_from_value!(BooleanKind, bool, |v| v);
impl_from_value!(IntegerKind, i32, |v| v);
impl_from_value!(UnsignedIntKind, u32, |v| v);
impl_from_value!(DecimalKind, rust_decimal::Decimal, |v| PreciseDecimal::from(v));
impl_from_value!(DateKind, PrecisionDate, |v| v);
impl_from_value!(DateTimeKind, PrecisionDateTime, |v| v);
impl_from_value!(TimeKind, PrecisionTime, |v| v);

/// Read access to a primitive without knowing its kind.
pub trait PrimitiveNode: ScalarConversion + fmt::Debug + Send + Sync {
    fn type_info(&self) -> &'static TypeInfo;

    fn element_id(&self) -> Option<&str>;

    fn extensions(&self) -> &[Extension];

    fn has_value(&self) -> bool;

    fn has_decoration(&self) -> bool {
        self.element_id().is_some() || !self.extensions().is_empty()
    }

    fn is_present(&self) -> bool {
        self.has_value() || self.has_decoration()
    }

    /// The value in its JSON representation.
    fn json_value(&self) -> Option<JsonValue>;

    /// The value in FHIR lexical form (XML `value` attribute).
    fn lexical_value(&self) -> Option<String>;

    fn as_any(&self) -> &dyn Any;

    /// True when `other` is the same kind holding an equal value.
    fn value_equals(&self, other: &dyn PrimitiveNode) -> bool;
}

/// Write access used by decoders.
pub trait PrimitiveMut: PrimitiveNode {
    fn set_json(&mut self, value: &JsonValue) -> Result<(), ValueError>;

    fn set_lexical(&mut self, text: &str) -> Result<(), ValueError>;

    fn set_element_id(&mut self, id: String);

    fn extensions_mut(&mut self) -> &mut Vec<Extension>;
}

impl<K: PrimitiveKind> PrimitiveNode for Primitive<K> {
    fn type_info(&self) -> &'static TypeInfo {
        K::type_info()
    }

    fn element_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn extensions(&self) -> &[Extension] {
        &self.extension
    }

    fn has_value(&self) -> bool {
        self.value.is_some()
    }

    fn json_value(&self) -> Option<JsonValue> {
        self.value.as_ref().map(PrimitiveValue::to_json)
    }

    fn lexical_value(&self) -> Option<String> {
        self.value.as_ref().map(PrimitiveValue::to_lexical)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn value_equals(&self, other: &dyn PrimitiveNode) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| self.value == other.value)
    }
}

impl<K: PrimitiveKind> PrimitiveMut for Primitive<K> {
    fn set_json(&mut self, value: &JsonValue) -> Result<(), ValueError> {
        self.value = Some(K::parse_json(value)?);
        Ok(())
    }

    fn set_lexical(&mut self, text: &str) -> Result<(), ValueError> {
        self.value = Some(K::parse_lexical(text)?);
        Ok(())
    }

    fn set_element_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn extensions_mut(&mut self) -> &mut Vec<Extension> {
        &mut self.extension
    }
}

fn parse_integer_text(text: &str) -> Option<i64> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl<K: PrimitiveKind> ScalarConversion for Primitive<K> {
    fn fhir_type_name(&self) -> &'static str {
        K::NAME
    }

    fn to_boolean(&self) -> ConversionResult<bool> {
        let to = ScalarType::Boolean;
        let converted = match self.scalar_for(to)? {
            Scalar::Boolean(value) => Some(value),
            Scalar::Integer(value) => integer_to_boolean(value),
            Scalar::Decimal(value) => decimal_to_boolean(value),
            Scalar::Text(text) => string_to_boolean(text),
            _ => return Err(self.not_convertible(to)),
        };
        converted.ok_or_else(|| self.invalid(to))
    }

    fn to_string_value(&self) -> ConversionResult<String> {
        self.value
            .as_ref()
            .map(PrimitiveValue::to_lexical)
            .ok_or(ConversionError::Empty {
                from: K::NAME,
                to: ScalarType::String,
            })
    }

    fn to_integer(&self) -> ConversionResult<i64> {
        let to = ScalarType::Integer;
        match self.scalar_for(to)? {
            Scalar::Integer(value) => Ok(value),
            Scalar::Boolean(value) => Ok(i64::from(value)),
            Scalar::Text(text) => parse_integer_text(text).ok_or_else(|| self.invalid(to)),
            _ => Err(self.not_convertible(to)),
        }
    }

    fn to_decimal(&self) -> ConversionResult<rust_decimal::Decimal> {
        let to = ScalarType::Decimal;
        match self.scalar_for(to)? {
            Scalar::Decimal(value) => Ok(value),
            Scalar::Integer(value) => Ok(rust_decimal::Decimal::from(value)),
            Scalar::Boolean(true) => Ok(rust_decimal::Decimal::ONE),
            Scalar::Boolean(false) => Ok(rust_decimal::Decimal::ZERO),
            Scalar::Text(text) => PreciseDecimal::parse(text)
                .map(|d| d.value())
                .map_err(|_| self.invalid(to)),
            _ => Err(self.not_convertible(to)),
        }
    }

    fn to_date(&self) -> ConversionResult<PrecisionDate> {
        let to = ScalarType::Date;
        match self.scalar_for(to)? {
            Scalar::Date(value) => Ok(value),
            Scalar::DateTime(value) => Ok(value.date()),
            Scalar::Text(text) => PrecisionDateTime::parse(text)
                .map(|dt| dt.date())
                .map_err(|_| self.invalid(to)),
            _ => Err(self.not_convertible(to)),
        }
    }

    fn to_time(&self) -> ConversionResult<PrecisionTime> {
        let to = ScalarType::Time;
        match self.scalar_for(to)? {
            Scalar::Time(value) => Ok(value.clone()),
            Scalar::Text(text) => PrecisionTime::parse(text).map_err(|_| self.invalid(to)),
            _ => Err(self.not_convertible(to)),
        }
    }

    fn to_date_time(&self) -> ConversionResult<PrecisionDateTime> {
        let to = ScalarType::DateTime;
        match self.scalar_for(to)? {
            Scalar::DateTime(value) => Ok(value.clone()),
            Scalar::Date(value) => Ok(PrecisionDateTime::from(value)),
            Scalar::Text(text) => PrecisionDateTime::parse(text).map_err(|_| self.invalid(to)),
            _ => Err(self.not_convertible(to)),
        }
    }

    fn to_quantity(&self) -> ConversionResult<QuantityValue> {
        let to = ScalarType::Quantity;
        match self.scalar_for(to)? {
            Scalar::Integer(value) => Ok(QuantityValue::unity(value.into())),
            Scalar::Decimal(value) => Ok(QuantityValue::unity(value)),
            Scalar::Boolean(value) => Ok(QuantityValue::unity(if value {
                rust_decimal::Decimal::ONE
            } else {
                rust_decimal::Decimal::ZERO
            })),
            Scalar::Text(text) => QuantityValue::parse(text).ok_or_else(|| self.invalid(to)),
            _ => Err(self.not_convertible(to)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_default_for_kinds_without_default_values() {
        assert_eq!(Date::default().value, None);
        assert_eq!(DateTime::default().value, None);
        assert_eq!(Time::default().value, None);
        assert!(!Decimal::default().is_present());
        assert!(Instant::default().extension.is_empty());
    }

    #[test]
    fn test_presence_predicates() {
        let empty = FhirString::default();
        assert!(!empty.has_value() && !empty.has_decoration() && !empty.is_present());

        let decorated = FhirString::default().with_id("a1");
        assert!(!decorated.has_value());
        assert!(decorated.has_decoration());
        assert!(decorated.is_present());

        let valued = FhirString::from("x");
        assert!(valued.has_value() && !valued.has_decoration());
    }

    #[test]
    fn test_kind_validation() {
        assert!(Id::parse("abc-123.x").is_ok());
        assert!(Id::parse("has space").is_err());
        assert!(Code::parse(" padded").is_err());
        assert!(Uri::parse("http://a b").is_err());
        assert!(FhirString::parse("").is_err());
        assert!(Integer::parse("007").is_err());
        assert!(Integer::parse("-12").is_ok());
        assert!(UnsignedInt::parse("-1").is_err());
        assert!(Time::parse("10:30").is_err());
        assert!(DateTime::parse("2015-02-07T13:28").is_err());
        assert!(DateTime::parse("2015-02-07T13:28:17Z").is_ok());
        assert!(Instant::parse("2015-02-07").is_err());
        assert!(Instant::parse("2015-02-07T13:28:17.239+02:00").is_ok());
        assert_eq!(
            Boolean::parse("yes").unwrap_err().to_string(),
            "invalid boolean value `yes`"
        );
    }

    #[test]
    fn test_json_representations() {
        let mut decimal = Decimal::default();
        let number: JsonValue = serde_json::from_str("1.50").unwrap();
        decimal.set_json(&number).unwrap();
        assert_eq!(decimal.lexical_value().as_deref(), Some("1.50"));
        assert_eq!(decimal.json_value().unwrap().to_string(), "1.50");

        let mut flag = Boolean::default();
        assert!(flag.set_json(&json!("true")).is_err());
        flag.set_json(&json!(true)).unwrap();
        assert_eq!(flag.value, Some(true));

        let mut count = Integer::default();
        assert!(count.set_json(&json!(1.5)).is_err());
        assert!(count.set_json(&json!(3_000_000_000i64)).is_err());

        let binary = Base64Binary::parse("aGVsbG8=").unwrap();
        assert_eq!(binary.value.as_deref(), Some(&b"hello"[..]));
        assert_eq!(binary.json_value(), Some(json!("aGVsbG8=")));
    }

    #[test]
    fn test_value_equals_checks_kind() {
        let code = Code::from("final");
        let string = FhirString::from("final");
        assert!(!code.value_equals(&string));
        assert!(code.value_equals(&Code::from("final").with_id("x")));
    }

    #[test]
    fn test_boolean_conversions() {
        assert_eq!(FhirString::from("Y").to_boolean(), Ok(true));
        assert_eq!(Integer::from(0).to_boolean(), Ok(false));
        assert_eq!(Decimal::from(dec!(1.0)).to_boolean(), Ok(true));
        assert!(matches!(
            Integer::from(2).to_boolean(),
            Err(ConversionError::InvalidValue { .. })
        ));
        assert!(matches!(
            Date::parse("2020").unwrap().to_boolean(),
            Err(ConversionError::NotConvertible { from: "date", .. })
        ));
        assert_eq!(
            Boolean::default().with_id("x").to_boolean(),
            Err(ConversionError::Empty {
                from: "boolean",
                to: ScalarType::Boolean
            })
        );
    }

    #[test]
    fn test_numeric_and_temporal_conversions() {
        assert_eq!(Boolean::from(true).to_integer(), Ok(1));
        assert_eq!(FhirString::from("-42").to_integer(), Ok(-42));
        assert!(Decimal::from(dec!(1.5)).to_integer().is_err());
        assert_eq!(Integer::from(3).to_decimal(), Ok(dec!(3)));
        assert_eq!(FhirString::from("2.50").to_decimal(), Ok(dec!(2.5)));

        let date_time = DateTime::parse("2015-02-07T13:28:17-05:00").unwrap();
        assert_eq!(date_time.to_date().unwrap().to_string(), "2015-02-07");
        let date = Date::parse("2015-02").unwrap();
        assert_eq!(date.to_date_time().unwrap().to_string(), "2015-02");
        assert_eq!(Time::parse("10:30:00").unwrap().to_time().unwrap().to_string(), "10:30:00");
        assert!(Date::parse("2015").unwrap().to_time().is_err());
    }

    #[test]
    fn test_quantity_and_string_conversions() {
        assert_eq!(
            Integer::from(5).to_quantity(),
            Ok(QuantityValue::unity(dec!(5)))
        );
        assert_eq!(
            FhirString::from("5 'mg'").to_quantity(),
            Ok(QuantityValue::new(dec!(5), "mg"))
        );
        assert_eq!(Decimal::from(dec!(1.50)).to_string_value(), Ok("1.50".to_string()));
        assert_eq!(Boolean::from(false).to_string_value(), Ok("false".to_string()));
        assert!(matches!(
            Base64Binary::parse("aGk=").unwrap().to_quantity(),
            Err(ConversionError::NotConvertible { .. })
        ));
    }
}
