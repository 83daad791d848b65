use crate::base::DOMAIN_RESOURCE_TYPE;
use crate::datatypes::{Address, Extension, HumanName, Identifier, Meta, Reference};
use crate::element::{
    Composite, Field, Slot, SlotError, any_accessors, choice_slot, choice_type,
};
use crate::primitive::{Boolean, Code, Date, DateTime, Id, Integer, Uri};
use crate::resource::{Resource, ResourceEnvelope};
use helios_fhirpath_support::type_info::FHIR_TYPE_NAMESPACE;
use helios_fhirpath_support::{ElementInfo, ScalarConversion, TypeInfo, TypeKind};

pub static PATIENT_TYPE: TypeInfo = TypeInfo {
    namespace: FHIR_TYPE_NAMESPACE,
    name: "Patient",
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
        ElementInfo::single("active", &["boolean"]),
        ElementInfo::list("name", &["HumanName"]),
        ElementInfo::single("gender", &["code"]),
        ElementInfo::single("birthDate", &["date"]),
        ElementInfo::single("deceased", &["boolean", "dateTime"]),
        ElementInfo::list("address", &["Address"]),
        ElementInfo::single("multipleBirth", &["boolean", "integer"]),
        ElementInfo::single("managingOrganization", &["Reference"]),
    ],
};

choice_type! {
    /// `Patient.deceased[x]`.
    pub enum PatientDeceased {
        Boolean(Boolean) => primitive,
        DateTime(DateTime) => primitive,
    }
}

choice_type! {
    /// `Patient.multipleBirth[x]`.
    pub enum PatientMultipleBirth {
        Boolean(Boolean) => primitive,
        Integer(Integer) => primitive,
    }
}

/// Demographics of a person receiving care.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Patient {
    pub id: Option<Id>,
    pub meta: Option<Meta>,
    pub implicit_rules: Option<Uri>,
    pub language: Option<Code>,
    pub contained: Vec<ResourceEnvelope>,
    pub extension: Vec<Extension>,
    pub modifier_extension: Vec<Extension>,
    pub identifier: Vec<Identifier>,
    pub active: Option<Boolean>,
    pub name: Vec<HumanName>,
    pub gender: Option<Code>,
    pub birth_date: Option<Date>,
    pub deceased: Option<PatientDeceased>,
    pub address: Vec<Address>,
    pub multiple_birth: Option<PatientMultipleBirth>,
    pub managing_organization: Option<Reference>,
}

impl Composite for Patient {
    fn type_info(&self) -> &'static TypeInfo {
        &PATIENT_TYPE
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
            Field::primitive("active", &self.active),
            Field::composites("name", &self.name),
            Field::primitive("gender", &self.gender),
            Field::primitive("birthDate", &self.birth_date),
            Field::choice("deceased", &self.deceased),
            Field::composites("address", &self.address),
            Field::choice("multipleBirth", &self.multiple_birth),
            Field::composite("managingOrganization", &self.managing_organization),
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
            "active" => Slot::primitive(&mut self.active),
            "name" => Slot::composites(&mut self.name),
            "gender" => Slot::primitive(&mut self.gender),
            "birthDate" => Slot::primitive(&mut self.birth_date),
            "address" => Slot::composites(&mut self.address),
            "managingOrganization" => Slot::composite(&mut self.managing_organization),
            _ => {
                if let Some(suffix) = name.strip_prefix("deceased") {
                    return choice_slot(&mut self.deceased, suffix);
                }
                if let Some(suffix) = name.strip_prefix("multipleBirth") {
                    return choice_slot(&mut self.multiple_birth, suffix);
                }
                return Err(SlotError::Unknown);
            }
        })
    }

    any_accessors!();
}

impl Resource for Patient {
    fn resource_id(&self) -> Option<&str> {
        self.id.as_ref().and_then(|id| id.value.as_deref())
    }

    fn clone_resource(&self) -> Box<dyn Resource> {
        Box::new(self.clone())
    }
}

impl ScalarConversion for Patient {
    fn fhir_type_name(&self) -> &'static str {
        "Patient"
    }
}
