//! FHIR JSON.
//!
//! Encoding walks [`helios_fhir::Composite::fields`] through a `Serialize` view and
//! decoding fills [`helios_fhir::Composite::slot`]s from `DeserializeSeed`s, both in a
//! single pass over `serde_json`.
//!
//! ## Layout rules
//!
//! - resources open with `"resourceType"`, then fields in schema order
//! - a primitive's value sits under its name and its `id`/`extension` under the
//!   same name prefixed with `_`, written right after the value
//! - repeating primitives use two arrays aligned by position, with `null` where a
//!   position has no value or no decoration
//! - a choice field is keyed by base name plus type suffix (`valueQuantity`)
//! - `Element.id` and `Extension.url` are plain strings
//!
//! Decoding rejects unknown keys, duplicate keys, `null` outside the aligned
//! arrays, and two different types for one choice field.

pub mod de;
pub mod ser;

pub use de::{
    from_json_reader, from_json_slice, from_json_str, resource_from_json_reader,
    resource_from_json_slice, resource_from_json_str,
};
pub use ser::{CompositeJson, to_json_string, to_json_string_pretty, to_json_vec, to_json_writer};
