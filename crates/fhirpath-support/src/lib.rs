//! # FHIRPath Support Types
//!
//! This crate provides the foundational types and traits that serve as a bridge between
//! the FHIRPath evaluator and the FHIR element model. It defines the data structures an
//! evaluator needs to introspect and coerce FHIR values without knowing their concrete
//! Rust types.
//!
//! ## Overview
//!
//! The fhirpath_support crate acts as the shared vocabulary that allows:
//! - FHIR data structures to describe themselves through static [`TypeInfo`] descriptors
//! - The evaluator to attempt speculative scalar coercions through [`ScalarConversion`]
//! - Coercion failures to be ordinary values ([`ConversionError`]) rather than panics
//! - Dates, times and quantities to travel between the model and the evaluator
//!
//! ## Core Types
//!
//! - [`TypeInfo`] / [`ElementInfo`] - Static schema description of a FHIR type
//! - [`ScalarConversion`] - The eight FHIRPath conversion functions every type answers
//! - [`ConversionError`] - Typed "not convertible" outcome
//! - [`PrecisionDate`], [`PrecisionTime`], [`PrecisionDateTime`] - Partial-precision temporals
//! - [`QuantityValue`] - Decimal value with an optional unit
//!
//! ## Usage Example
//!
//! ```rust
//! use helios_fhirpath_support::{ConversionError, ScalarConversion, ScalarType};
//!
//! struct Address;
//!
//! impl ScalarConversion for Address {
//!     fn fhir_type_name(&self) -> &'static str {
//!         "Address"
//!     }
//! }
//!
//! let err = Address.to_boolean().unwrap_err();
//! assert_eq!(
//!     err,
//!     ConversionError::NotConvertible { from: "Address", to: ScalarType::Boolean }
//! );
//! assert_eq!(err.to_string(), "cannot convert Address to Boolean");
//! ```

pub mod conversion;
pub mod quantity;
pub mod temporal;
pub mod type_info;

pub use conversion::{ConversionError, ConversionResult, ScalarConversion, ScalarType};
pub use quantity::QuantityValue;
pub use temporal::{
    ParseError, PrecisionDate, PrecisionDateTime, PrecisionTime, TimeZoneOffset,
};
pub use type_info::{Cardinality, ElementInfo, Representation, TypeInfo, TypeKind};
