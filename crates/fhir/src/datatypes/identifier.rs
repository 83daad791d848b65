//! `Identifier` and `Reference` refer to each other (`Identifier.assigner`,
//! `Reference.identifier`), so they live together.

use crate::base::ELEMENT_TYPE;
use crate::datatypes::{CodeableConcept, Extension, Period};
use crate::element::{Composite, Field, Slot, SlotError, any_accessors};
use crate::primitive::{Code, FhirString, Uri};
use helios_fhirpath_support::type_info::FHIR_TYPE_NAMESPACE;
use helios_fhirpath_support::{ElementInfo, ScalarConversion, TypeInfo, TypeKind};

pub static IDENTIFIER_TYPE: TypeInfo = TypeInfo {
    namespace: FHIR_TYPE_NAMESPACE,
    name: "Identifier",
    kind: TypeKind::Complex,
    base: Some(&ELEMENT_TYPE),
    elements: &[
        ElementInfo::attribute("id", 0),
        ElementInfo::list("extension", &["Extension"]),
        ElementInfo::single("use", &["code"]),
        ElementInfo::single("type", &["CodeableConcept"]),
        ElementInfo::single("system", &["uri"]),
        ElementInfo::single("value", &["string"]),
        ElementInfo::single("period", &["Period"]),
        ElementInfo::single("assigner", &["Reference"]),
    ],
};

pub static REFERENCE_TYPE: TypeInfo = TypeInfo {
    namespace: FHIR_TYPE_NAMESPACE,
    name: "Reference",
    kind: TypeKind::Complex,
    base: Some(&ELEMENT_TYPE),
    elements: &[
        ElementInfo::attribute("id", 0),
        ElementInfo::list("extension", &["Extension"]),
        ElementInfo::single("reference", &["string"]),
        ElementInfo::single("type", &["uri"]),
        ElementInfo::single("identifier", &["Identifier"]),
        ElementInfo::single("display", &["string"]),
    ],
};

/// A business identifier.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Identifier {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub r#use: Option<Code>,
    pub r#type: Option<CodeableConcept>,
    pub system: Option<Uri>,
    pub value: Option<FhirString>,
    pub period: Option<Period>,
    pub assigner: Option<Box<Reference>>,
}

impl Composite for Identifier {
    fn type_info(&self) -> &'static TypeInfo {
        &IDENTIFIER_TYPE
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::attribute("id", &self.id),
            Field::composites("extension", &self.extension),
            Field::primitive("use", &self.r#use),
            Field::composite("type", &self.r#type),
            Field::primitive("system", &self.system),
            Field::primitive("value", &self.value),
            Field::composite("period", &self.period),
            Field::boxed("assigner", &self.assigner),
        ]
    }

    fn slot(&mut self, name: &str) -> Result<Slot<'_>, SlotError> {
        Ok(match name {
            "id" => Slot::attribute(&mut self.id),
            "extension" => Slot::composites(&mut self.extension),
            "use" => Slot::primitive(&mut self.r#use),
            "type" => Slot::composite(&mut self.r#type),
            "system" => Slot::primitive(&mut self.system),
            "value" => Slot::primitive(&mut self.value),
            "period" => Slot::composite(&mut self.period),
            "assigner" => Slot::boxed(&mut self.assigner),
            _ => return Err(SlotError::Unknown),
        })
    }

    any_accessors!();
}

impl ScalarConversion for Identifier {
    fn fhir_type_name(&self) -> &'static str {
        "Identifier"
    }
}

/// A reference from one resource to another.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reference {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub reference: Option<FhirString>,
    pub r#type: Option<Uri>,
    pub identifier: Option<Identifier>,
    pub display: Option<FhirString>,
}

impl Reference {
    /// A literal reference such as `Patient/123` or `#contained-id`.
    pub fn to(reference: &str) -> Self {
        Self {
            reference: Some(FhirString::from(reference)),
            ..Default::default()
        }
    }
}

impl Composite for Reference {
    fn type_info(&self) -> &'static TypeInfo {
        &REFERENCE_TYPE
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::attribute("id", &self.id),
            Field::composites("extension", &self.extension),
            Field::primitive("reference", &self.reference),
            Field::primitive("type", &self.r#type),
            Field::composite("identifier", &self.identifier),
            Field::primitive("display", &self.display),
        ]
    }

    fn slot(&mut self, name: &str) -> Result<Slot<'_>, SlotError> {
        Ok(match name {
            "id" => Slot::attribute(&mut self.id),
            "extension" => Slot::composites(&mut self.extension),
            "reference" => Slot::primitive(&mut self.reference),
            "type" => Slot::primitive(&mut self.r#type),
            "identifier" => Slot::composite(&mut self.identifier),
            "display" => Slot::primitive(&mut self.display),
            _ => return Err(SlotError::Unknown),
        })
    }

    any_accessors!();
}

impl ScalarConversion for Reference {
    fn fhir_type_name(&self) -> &'static str {
        "Reference"
    }
}
