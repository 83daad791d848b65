use crate::base::ELEMENT_TYPE;
use crate::datatypes::Extension;
use crate::element::{Composite, Field, Slot, SlotError, any_accessors};
use crate::primitive::DateTime;
use helios_fhirpath_support::type_info::FHIR_TYPE_NAMESPACE;
use helios_fhirpath_support::{ElementInfo, ScalarConversion, TypeInfo, TypeKind};

pub static PERIOD_TYPE: TypeInfo = TypeInfo {
    namespace: FHIR_TYPE_NAMESPACE,
    name: "Period",
    kind: TypeKind::Complex,
    base: Some(&ELEMENT_TYPE),
    elements: &[
        ElementInfo::attribute("id", 0),
        ElementInfo::list("extension", &["Extension"]),
        ElementInfo::single("start", &["dateTime"]),
        ElementInfo::single("end", &["dateTime"]),
    ],
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Period {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub start: Option<DateTime>,
    pub end: Option<DateTime>,
}

impl Composite for Period {
    fn type_info(&self) -> &'static TypeInfo {
        &PERIOD_TYPE
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::attribute("id", &self.id),
            Field::composites("extension", &self.extension),
            Field::primitive("start", &self.start),
            Field::primitive("end", &self.end),
        ]
    }

    fn slot(&mut self, name: &str) -> Result<Slot<'_>, SlotError> {
        Ok(match name {
            "id" => Slot::attribute(&mut self.id),
            "extension" => Slot::composites(&mut self.extension),
            "start" => Slot::primitive(&mut self.start),
            "end" => Slot::primitive(&mut self.end),
            _ => return Err(SlotError::Unknown),
        })
    }

    any_accessors!();
}

impl ScalarConversion for Period {
    fn fhir_type_name(&self) -> &'static str {
        "Period"
    }
}
