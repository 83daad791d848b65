use crate::base::ELEMENT_TYPE;
use crate::datatypes::Extension;
use crate::element::{Composite, Field, Slot, SlotError, any_accessors};
use crate::primitive::{Boolean, Code, FhirString, Uri};
use helios_fhirpath_support::type_info::FHIR_TYPE_NAMESPACE;
use helios_fhirpath_support::{ElementInfo, ScalarConversion, TypeInfo, TypeKind};

pub static CODING_TYPE: TypeInfo = TypeInfo {
    namespace: FHIR_TYPE_NAMESPACE,
    name: "Coding",
    kind: TypeKind::Complex,
    base: Some(&ELEMENT_TYPE),
    elements: &[
        ElementInfo::attribute("id", 0),
        ElementInfo::list("extension", &["Extension"]),
        ElementInfo::single("system", &["uri"]),
        ElementInfo::single("version", &["string"]),
        ElementInfo::single("code", &["code"]),
        ElementInfo::single("display", &["string"]),
        ElementInfo::single("userSelected", &["boolean"]),
    ],
};

pub static CODEABLE_CONCEPT_TYPE: TypeInfo = TypeInfo {
    namespace: FHIR_TYPE_NAMESPACE,
    name: "CodeableConcept",
    kind: TypeKind::Complex,
    base: Some(&ELEMENT_TYPE),
    elements: &[
        ElementInfo::attribute("id", 0),
        ElementInfo::list("extension", &["Extension"]),
        ElementInfo::list("coding", &["Coding"]),
        ElementInfo::single("text", &["string"]),
    ],
};

/// A reference to a code defined by a terminology system.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Coding {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub system: Option<Uri>,
    pub version: Option<FhirString>,
    pub code: Option<Code>,
    pub display: Option<FhirString>,
    pub user_selected: Option<Boolean>,
}

impl Composite for Coding {
    fn type_info(&self) -> &'static TypeInfo {
        &CODING_TYPE
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::attribute("id", &self.id),
            Field::composites("extension", &self.extension),
            Field::primitive("system", &self.system),
            Field::primitive("version", &self.version),
            Field::primitive("code", &self.code),
            Field::primitive("display", &self.display),
            Field::primitive("userSelected", &self.user_selected),
        ]
    }

    fn slot(&mut self, name: &str) -> Result<Slot<'_>, SlotError> {
        Ok(match name {
            "id" => Slot::attribute(&mut self.id),
            "extension" => Slot::composites(&mut self.extension),
            "system" => Slot::primitive(&mut self.system),
            "version" => Slot::primitive(&mut self.version),
            "code" => Slot::primitive(&mut self.code),
            "display" => Slot::primitive(&mut self.display),
            "userSelected" => Slot::primitive(&mut self.user_selected),
            _ => return Err(SlotError::Unknown),
        })
    }

    any_accessors!();
}

impl ScalarConversion for Coding {
    fn fhir_type_name(&self) -> &'static str {
        "Coding"
    }
}

/// A concept expressed as codings and/or text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CodeableConcept {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub coding: Vec<Coding>,
    pub text: Option<FhirString>,
}

impl Composite for CodeableConcept {
    fn type_info(&self) -> &'static TypeInfo {
        &CODEABLE_CONCEPT_TYPE
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::attribute("id", &self.id),
            Field::composites("extension", &self.extension),
            Field::composites("coding", &self.coding),
            Field::primitive("text", &self.text),
        ]
    }

    fn slot(&mut self, name: &str) -> Result<Slot<'_>, SlotError> {
        Ok(match name {
            "id" => Slot::attribute(&mut self.id),
            "extension" => Slot::composites(&mut self.extension),
            "coding" => Slot::composites(&mut self.coding),
            "text" => Slot::primitive(&mut self.text),
            _ => return Err(SlotError::Unknown),
        })
    }

    any_accessors!();
}

impl ScalarConversion for CodeableConcept {
    fn fhir_type_name(&self) -> &'static str {
        "CodeableConcept"
    }
}
