use crate::base::ELEMENT_TYPE;
use crate::datatypes::{Extension, Period};
use crate::element::{Composite, Field, Slot, SlotError, any_accessors};
use crate::primitive::{Code, FhirString};
use helios_fhirpath_support::type_info::FHIR_TYPE_NAMESPACE;
use helios_fhirpath_support::{ElementInfo, ScalarConversion, TypeInfo, TypeKind};

pub static ADDRESS_TYPE: TypeInfo = TypeInfo {
    namespace: FHIR_TYPE_NAMESPACE,
    name: "Address",
    kind: TypeKind::Complex,
    base: Some(&ELEMENT_TYPE),
    elements: &[
        ElementInfo::attribute("id", 0),
        ElementInfo::list("extension", &["Extension"]),
        ElementInfo::single("use", &["code"]),
        ElementInfo::single("type", &["code"]),
        ElementInfo::single("text", &["string"]),
        ElementInfo::list("line", &["string"]),
        ElementInfo::single("city", &["string"]),
        ElementInfo::single("district", &["string"]),
        ElementInfo::single("state", &["string"]),
        ElementInfo::single("postalCode", &["string"]),
        ElementInfo::single("country", &["string"]),
        ElementInfo::single("period", &["Period"]),
    ],
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Address {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub r#use: Option<Code>,
    pub r#type: Option<Code>,
    pub text: Option<FhirString>,
    pub line: Vec<FhirString>,
    pub city: Option<FhirString>,
    pub district: Option<FhirString>,
    pub state: Option<FhirString>,
    pub postal_code: Option<FhirString>,
    pub country: Option<FhirString>,
    pub period: Option<Period>,
}

impl Composite for Address {
    fn type_info(&self) -> &'static TypeInfo {
        &ADDRESS_TYPE
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::attribute("id", &self.id),
            Field::composites("extension", &self.extension),
            Field::primitive("use", &self.r#use),
            Field::primitive("type", &self.r#type),
            Field::primitive("text", &self.text),
            Field::primitives("line", &self.line),
            Field::primitive("city", &self.city),
            Field::primitive("district", &self.district),
            Field::primitive("state", &self.state),
            Field::primitive("postalCode", &self.postal_code),
            Field::primitive("country", &self.country),
            Field::composite("period", &self.period),
        ]
    }

    fn slot(&mut self, name: &str) -> Result<Slot<'_>, SlotError> {
        Ok(match name {
            "id" => Slot::attribute(&mut self.id),
            "extension" => Slot::composites(&mut self.extension),
            "use" => Slot::primitive(&mut self.r#use),
            "type" => Slot::primitive(&mut self.r#type),
            "text" => Slot::primitive(&mut self.text),
            "line" => Slot::primitives(&mut self.line),
            "city" => Slot::primitive(&mut self.city),
            "district" => Slot::primitive(&mut self.district),
            "state" => Slot::primitive(&mut self.state),
            "postalCode" => Slot::primitive(&mut self.postal_code),
            "country" => Slot::primitive(&mut self.country),
            "period" => Slot::composite(&mut self.period),
            _ => return Err(SlotError::Unknown),
        })
    }

    any_accessors!();
}

impl ScalarConversion for Address {
    fn fhir_type_name(&self) -> &'static str {
        "Address"
    }
}
