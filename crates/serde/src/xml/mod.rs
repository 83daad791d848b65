//! XML serialization and deserialization for FHIR values.
//!
//! Both directions stream: the encoder writes quick-xml events while walking
//! [`Composite::fields`](helios_fhir::Composite::fields), and the decoder reads
//! events and fills [`Composite::slot`](helios_fhir::Composite::slot)s without
//! building a JSON intermediate.
//!
//! ## FHIR JSON ↔ XML Mapping
//!
//! ### Primitives with Extensions
//!
//! **JSON Pattern**:
//! ```json
//! {
//!   "birthDate": "1974-12-25",
//!   "_birthDate": {
//!     "id": "bd1",
//!     "extension": [...]
//!   }
//! }
//! ```
//!
//! **XML Pattern**:
//! ```xml
//! <birthDate id="bd1" value="1974-12-25">
//!   <extension url="...">...</extension>
//! </birthDate>
//! ```
//!
//! ### Arrays with Extensions
//!
//! **JSON Pattern**:
//! ```json
//! {
//!   "given": ["Alice", null],
//!   "_given": [null, {"id": "g1"}]
//! }
//! ```
//!
//! **XML Pattern**:
//! ```xml
//! <given value="Alice"/>
//! <given id="g1"/>
//! ```
//!
//! ### Choice fields
//!
//! The element is named by base name plus type suffix, exactly as the JSON key:
//! `<valueQuantity>..</valueQuantity>`.
//!
//! ### Contained resources
//!
//! A field holding a resource is a bare wrapper element around one element named
//! by the resource type:
//!
//! ```xml
//! <contained>
//!   <Organization>
//!     <id value="org1"/>
//!   </Organization>
//! </contained>
//! ```
//!
//! ## Special Attributes
//!
//! - **`value`**: the value of a primitive
//! - **`id`**: the element id of a primitive or data type
//! - **`url`**: `Extension.url`
//!
//! Anything else is a child element. Decoding rejects attributes outside this
//! set, including prefixed ones other than namespace declarations.
//!
//! ## Namespace Handling
//!
//! The FHIR namespace (`http://hl7.org/fhir`) is declared on the root element and
//! every element must resolve to it when decoding.

pub mod de;
pub mod ser;
mod utils;

pub use utils::FHIR_NAMESPACE;

// Re-export serialization functions
pub use ser::{to_xml_string, to_xml_string_pretty, to_xml_vec, to_xml_writer};

// Re-export deserialization functions
pub use de::{
    from_xml_reader, from_xml_slice, from_xml_str, resource_from_xml_reader,
    resource_from_xml_slice, resource_from_xml_str,
};
