use crate::base::ELEMENT_TYPE;
use crate::datatypes::{Extension, Period};
use crate::element::{Composite, Field, Slot, SlotError, any_accessors};
use crate::primitive::{Code, FhirString};
use helios_fhirpath_support::type_info::FHIR_TYPE_NAMESPACE;
use helios_fhirpath_support::{ElementInfo, ScalarConversion, TypeInfo, TypeKind};

pub static HUMAN_NAME_TYPE: TypeInfo = TypeInfo {
    namespace: FHIR_TYPE_NAMESPACE,
    name: "HumanName",
    kind: TypeKind::Complex,
    base: Some(&ELEMENT_TYPE),
    elements: &[
        ElementInfo::attribute("id", 0),
        ElementInfo::list("extension", &["Extension"]),
        ElementInfo::single("use", &["code"]),
        ElementInfo::single("text", &["string"]),
        ElementInfo::single("family", &["string"]),
        ElementInfo::list("given", &["string"]),
        ElementInfo::list("prefix", &["string"]),
        ElementInfo::list("suffix", &["string"]),
        ElementInfo::single("period", &["Period"]),
    ],
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HumanName {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub r#use: Option<Code>,
    pub text: Option<FhirString>,
    pub family: Option<FhirString>,
    pub given: Vec<FhirString>,
    pub prefix: Vec<FhirString>,
    pub suffix: Vec<FhirString>,
    pub period: Option<Period>,
}

impl Composite for HumanName {
    fn type_info(&self) -> &'static TypeInfo {
        &HUMAN_NAME_TYPE
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::attribute("id", &self.id),
            Field::composites("extension", &self.extension),
            Field::primitive("use", &self.r#use),
            Field::primitive("text", &self.text),
            Field::primitive("family", &self.family),
            Field::primitives("given", &self.given),
            Field::primitives("prefix", &self.prefix),
            Field::primitives("suffix", &self.suffix),
            Field::composite("period", &self.period),
        ]
    }

    fn slot(&mut self, name: &str) -> Result<Slot<'_>, SlotError> {
        Ok(match name {
            "id" => Slot::attribute(&mut self.id),
            "extension" => Slot::composites(&mut self.extension),
            "use" => Slot::primitive(&mut self.r#use),
            "text" => Slot::primitive(&mut self.text),
            "family" => Slot::primitive(&mut self.family),
            "given" => Slot::primitives(&mut self.given),
            "prefix" => Slot::primitives(&mut self.prefix),
            "suffix" => Slot::primitives(&mut self.suffix),
            "period" => Slot::composite(&mut self.period),
            _ => return Err(SlotError::Unknown),
        })
    }

    any_accessors!();
}

impl ScalarConversion for HumanName {
    fn fhir_type_name(&self) -> &'static str {
        "HumanName"
    }
}
