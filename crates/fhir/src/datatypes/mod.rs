//! General-purpose data types.

mod address;
mod coding;
mod extension;
mod human_name;
mod identifier;
mod meta;
mod period;
mod quantity;

pub use address::{ADDRESS_TYPE, Address};
pub use coding::{CODEABLE_CONCEPT_TYPE, CODING_TYPE, CodeableConcept, Coding};
pub use extension::{EXTENSION_TYPE, Extension, ExtensionValue};
pub use human_name::{HUMAN_NAME_TYPE, HumanName};
pub use identifier::{IDENTIFIER_TYPE, Identifier, REFERENCE_TYPE, Reference};
pub use meta::{META_TYPE, Meta};
pub use period::{PERIOD_TYPE, Period};
pub use quantity::{QUANTITY_TYPE, Quantity};
