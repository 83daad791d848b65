//! # Helios FHIR Serialization Module
//!
//! FHIR JSON and FHIR XML codecs for the element model in `helios-fhir`.
//!
//! ## Features
//!
//! - **JSON Support**: a `Serialize` view and `DeserializeSeed`s over `serde_json`,
//!   driven by each type's field and slot tables.
//! - **XML Support** (feature `xml`, on by default): a streaming encoder and decoder
//!   over quick-xml events.
//! - **Polymorphic resources**: `resource_from_*` entry points decode whichever
//!   resource the document names into a [`ResourceEnvelope`](helios_fhir::ResourceEnvelope).
//! - **Conversion**: [`convert::convert`] and the `fhir-convert` binary translate
//!   one document between the formats.
//!
//! Decoding is strict. Input that is well-formed but does not match the model
//! fails with [`SerdeError::Decode`] naming the type and field.
//!
//! ## FHIR JSON ↔ XML Mapping
//!
//! | JSON Pattern | XML Pattern |
//! |--------------|-------------|
//! | `{"active": true}` | `<active value="true"/>` |
//! | `{"birthDate": "1974-12-25", "_birthDate": {"id": "123"}}` | `<birthDate id="123" value="1974-12-25"/>` |
//! | `{"given": ["John", "Doe"]}` | `<given value="John"/><given value="Doe"/>` |
//! | `{"given": ["A", null], "_given": [null, {"id": "123"}]}` | `<given value="A"/><given id="123"/>` |
//! | `{"valueBoolean": false}` | `<valueBoolean value="false"/>` |
//! | `{"contained": [{"resourceType": "Organization"}]}` | `<contained><Organization/></contained>` |
//!
//! ## Examples
//!
//! ```rust
//! use helios_fhir::prelude::*;
//! use helios_serde::{from_json_str, to_xml_string};
//!
//! let patient: Patient =
//!     from_json_str(r#"{"resourceType": "Patient", "active": true}"#).unwrap();
//! let xml = to_xml_string(&patient).unwrap();
//! assert!(xml.ends_with(r#"<Patient xmlns="http://hl7.org/fhir"><active value="true"/></Patient>"#));
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod json;
#[cfg(feature = "xml")]
pub mod xml;

// Re-export common types and functions
pub use config::{ConvertConfig, init_logging};
pub use convert::Format;
pub use error::{DecodeError, DecodeErrorKind, Result, SerdeError};

// Re-export JSON functions at top level for convenience
pub use json::{
    from_json_reader, from_json_slice, from_json_str, resource_from_json_reader,
    resource_from_json_slice, resource_from_json_str, to_json_string, to_json_string_pretty,
    to_json_vec, to_json_writer,
};

#[cfg(feature = "xml")]
pub use xml::{
    from_xml_reader, from_xml_slice, from_xml_str, resource_from_xml_reader,
    resource_from_xml_slice, resource_from_xml_str, to_xml_string, to_xml_string_pretty,
    to_xml_vec, to_xml_writer,
};
