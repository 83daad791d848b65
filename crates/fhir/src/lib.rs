//! # FHIR Element Model
//!
//! Strongly-typed FHIR data types and resources, built on one shared contract that the
//! codecs in `helios-serde` and the FHIRPath evaluator both consume.
//!
//! ## Overview
//!
//! - [`primitive`] - `Primitive<K>`: an optional scalar plus optional element id and
//!   extensions, with the lexical and JSON forms of every FHIR primitive type
//! - [`element`] - the [`Composite`] trait: ordered [`Field`] views for reading,
//!   [`Slot`]s for decoding, and closed [`Choice`] enums for `[x]` fields
//! - [`reflect`] - `children`, `equal` and `equivalent` computed from field views
//! - [`resource`] - the [`Resource`] trait, the type-erased [`ResourceEnvelope`] used
//!   for contained resources, and the discriminant [`registry`]
//! - [`datatypes`] / [`resources`] - the shipped types
//!
//! Every type also implements [`ScalarConversion`] and publishes a static [`TypeInfo`].
//!
//! ## Example
//!
//! ```rust
//! use helios_fhir::prelude::*;
//!
//! let patient = Patient {
//!     id: Some(Id::from("example")),
//!     active: Some(Boolean::from(true)),
//!     ..Default::default()
//! };
//!
//! let active = patient.children(Some(&["active"]));
//! assert_eq!(active.len(), 1);
//! assert_eq!(active[0].type_name(), "boolean");
//!
//! let mut other = patient.clone();
//! other.id = Some(Id::from("copy"));
//! assert_eq!(patient.equal(&other), Some(false));
//! assert_eq!(patient.equivalent(&other), Some(true));
//!
//! assert_eq!(
//!     patient.to_boolean().unwrap_err().to_string(),
//!     "cannot convert Patient to Boolean"
//! );
//! ```

pub mod base;
pub mod datatypes;
pub mod decimal;
pub mod element;
pub mod primitive;
pub mod reflect;
pub mod resource;
pub mod resources;

pub use decimal::PreciseDecimal;
pub use element::{
    AttributeSlot, Choice, Composite, CompositeListSlot, Field, FieldValue, Node,
    PrimitiveListSlot, Slot, SlotError,
};
pub use primitive::{Primitive, PrimitiveKind, PrimitiveMut, PrimitiveNode, PrimitiveValue, ValueError};
pub use reflect::Comparison;
pub use resource::{Resource, ResourceEnvelope, registry};

pub use helios_fhirpath_support::{
    ConversionError, ConversionResult, ElementInfo, PrecisionDate, PrecisionDateTime,
    PrecisionTime, QuantityValue, ScalarConversion, ScalarType, TimeZoneOffset, TypeInfo,
    TypeKind,
};

/// Everything needed to build and inspect resources.
pub mod prelude {
    pub use crate::datatypes::*;
    pub use crate::element::{Choice, Composite, Node};
    pub use crate::primitive::{
        Base64Binary, Boolean, Code, Date, DateTime, Decimal, FhirString, Id, Instant, Integer,
        PrimitiveMut, PrimitiveNode, Time, UnsignedInt, Uri,
    };
    pub use crate::resource::{Resource, ResourceEnvelope};
    pub use crate::resources::*;
    pub use helios_fhirpath_support::ScalarConversion;
}
