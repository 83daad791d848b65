use crate::base::DOMAIN_RESOURCE_TYPE;
use crate::datatypes::{CodeableConcept, Extension, Identifier, Meta, Period, Quantity, Reference};
use crate::element::{
    Composite, Field, Slot, SlotError, any_accessors, choice_slot, choice_type,
};
use crate::primitive::{Boolean, Code, DateTime, FhirString, Id, Instant, Integer, Time, Uri};
use crate::resource::{Resource, ResourceEnvelope};
use helios_fhirpath_support::type_info::FHIR_TYPE_NAMESPACE;
use helios_fhirpath_support::{ElementInfo, ScalarConversion, TypeInfo, TypeKind};

pub static OBSERVATION_TYPE: TypeInfo = TypeInfo {
    namespace: FHIR_TYPE_NAMESPACE,
    name: "Observation",
    kind: TypeKind::Resource,
    base: Some(&DOMAIN_RESOURCE_TYPE),
    elements: &[
        ElementInfo::single("id", &["id"]),
        ElementInfo::single("meta", &["Meta"]),
        ElementInfo::single("implicitRules", &["uri"]),
        ElementInfo::single("language", &["code"]),
        ElementInfo::list("contained", &["Resource"]),
        ElementInfo::list("extension", &["Extension"]),
        ElementInfo::list("modifierExtension", &["Extension"]),
        ElementInfo::list("identifier", &["Identifier"]),
        ElementInfo::required("status", &["code"]),
        ElementInfo::list("category", &["CodeableConcept"]),
        ElementInfo::required("code", &["CodeableConcept"]),
        ElementInfo::single("subject", &["Reference"]),
        ElementInfo::single("effective", &["dateTime", "Period", "instant"]),
        ElementInfo::single("issued", &["instant"]),
        ElementInfo::single(
            "value",
            &[
                "Quantity",
                "CodeableConcept",
                "string",
                "boolean",
                "integer",
                "time",
                "dateTime",
                "Period",
            ],
        ),
        ElementInfo::list("interpretation", &["CodeableConcept"]),
    ],
};

choice_type! {
    /// `Observation.effective[x]`.
    pub enum ObservationEffective {
        DateTime(DateTime) => primitive,
        Period(Period) => composite,
        Instant(Instant) => primitive,
    }
}

choice_type! {
    /// `Observation.value[x]`.
    pub enum ObservationValue {
        Quantity(Quantity) => composite,
        CodeableConcept(CodeableConcept) => composite,
        String(FhirString) => primitive,
        Boolean(Boolean) => primitive,
        Integer(Integer) => primitive,
        Time(Time) => primitive,
        DateTime(DateTime) => primitive,
        Period(Period) => composite,
    }
}

/// Measurements and simple assertions made about a subject.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Observation {
    pub id: Option<Id>,
    pub meta: Option<Meta>,
    pub implicit_rules: Option<Uri>,
    pub language: Option<Code>,
    pub contained: Vec<ResourceEnvelope>,
    pub extension: Vec<Extension>,
    pub modifier_extension: Vec<Extension>,
    pub identifier: Vec<Identifier>,
    pub status: Option<Code>,
    pub category: Vec<CodeableConcept>,
    pub code: Option<CodeableConcept>,
    pub subject: Option<Reference>,
    pub effective: Option<ObservationEffective>,
    pub issued: Option<Instant>,
    pub value: Option<ObservationValue>,
    pub interpretation: Vec<CodeableConcept>,
}

impl Composite for Observation {
    fn type_info(&self) -> &'static TypeInfo {
        &OBSERVATION_TYPE
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::primitive("id", &self.id),
            Field::composite("meta", &self.meta),
            Field::primitive("implicitRules", &self.implicit_rules),
            Field::primitive("language", &self.language),
            Field::resources("contained", &self.contained),
            Field::composites("extension", &self.extension),
            Field::composites("modifierExtension", &self.modifier_extension),
            Field::composites("identifier", &self.identifier),
            Field::primitive("status", &self.status),
            Field::composites("category", &self.category),
            Field::composite("code", &self.code),
            Field::composite("subject", &self.subject),
            Field::choice("effective", &self.effective),
            Field::primitive("issued", &self.issued),
            Field::choice("value", &self.value),
            Field::composites("interpretation", &self.interpretation),
        ]
    }

    fn slot(&mut self, name: &str) -> Result<Slot<'_>, SlotError> {
        Ok(match name {
            "id" => Slot::primitive(&mut self.id),
            "meta" => Slot::composite(&mut self.meta),
            "implicitRules" => Slot::primitive(&mut self.implicit_rules),
            "language" => Slot::primitive(&mut self.language),
            "contained" => Slot::ResourceList(&mut self.contained),
            "extension" => Slot::composites(&mut self.extension),
            "modifierExtension" => Slot::composites(&mut self.modifier_extension),
            "identifier" => Slot::composites(&mut self.identifier),
            "status" => Slot::primitive(&mut self.status),
            "category" => Slot::composites(&mut self.category),
            "code" => Slot::composite(&mut self.code),
            "subject" => Slot::composite(&mut self.subject),
            "issued" => Slot::primitive(&mut self.issued),
            "interpretation" => Slot::composites(&mut self.interpretation),
            _ => {
                if let Some(suffix) = name.strip_prefix("effective") {
                    return choice_slot(&mut self.effective, suffix);
                }
                if let Some(suffix) = name.strip_prefix("value") {
                    return choice_slot(&mut self.value, suffix);
                }
                return Err(SlotError::Unknown);
            }
        })
    }

    any_accessors!();
}

impl Resource for Observation {
    fn resource_id(&self) -> Option<&str> {
        self.id.as_ref().and_then(|id| id.value.as_deref())
    }

    fn clone_resource(&self) -> Box<dyn Resource> {
        Box::new(self.clone())
    }
}

impl ScalarConversion for Observation {
    fn fhir_type_name(&self) -> &'static str {
        "Observation"
    }
}
