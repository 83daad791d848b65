use crate::base::DOMAIN_RESOURCE_TYPE;
use crate::datatypes::{Address, CodeableConcept, Extension, Identifier, Meta, Reference};
use crate::element::{Composite, Field, Slot, SlotError, any_accessors};
use crate::primitive::{Boolean, Code, FhirString, Id, Uri};
use crate::resource::{Resource, ResourceEnvelope};
use helios_fhirpath_support::type_info::FHIR_TYPE_NAMESPACE;
use helios_fhirpath_support::{ElementInfo, ScalarConversion, TypeInfo, TypeKind};

pub static ORGANIZATION_TYPE: TypeInfo = TypeInfo {
    namespace: FHIR_TYPE_NAMESPACE,
    name: "Organization",
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
        ElementInfo::list("type", &["CodeableConcept"]),
        ElementInfo::single("name", &["string"]),
        ElementInfo::list("alias", &["string"]),
        ElementInfo::list("address", &["Address"]),
        ElementInfo::single("partOf", &["Reference"]),
    ],
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Organization {
    pub id: Option<Id>,
    pub meta: Option<Meta>,
    pub implicit_rules: Option<Uri>,
    pub language: Option<Code>,
    pub contained: Vec<ResourceEnvelope>,
    pub extension: Vec<Extension>,
    pub modifier_extension: Vec<Extension>,
    pub identifier: Vec<Identifier>,
    pub active: Option<Boolean>,
    pub r#type: Vec<CodeableConcept>,
    pub name: Option<FhirString>,
    pub alias: Vec<FhirString>,
    pub address: Vec<Address>,
    pub part_of: Option<Reference>,
}

impl Composite for Organization {
    fn type_info(&self) -> &'static TypeInfo {
        &ORGANIZATION_TYPE
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
            Field::composites("type", &self.r#type),
            Field::primitive("name", &self.name),
            Field::primitives("alias", &self.alias),
            Field::composites("address", &self.address),
            Field::composite("partOf", &self.part_of),
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
            "type" => Slot::composites(&mut self.r#type),
            "name" => Slot::primitive(&mut self.name),
            "alias" => Slot::primitives(&mut self.alias),
            "address" => Slot::composites(&mut self.address),
            "partOf" => Slot::composite(&mut self.part_of),
            _ => return Err(SlotError::Unknown),
        })
    }

    any_accessors!();
}

impl Resource for Organization {
    fn resource_id(&self) -> Option<&str> {
        self.id.as_ref().and_then(|id| id.value.as_deref())
    }

    fn clone_resource(&self) -> Box<dyn Resource> {
        Box::new(self.clone())
    }
}

impl ScalarConversion for Organization {
    fn fhir_type_name(&self) -> &'static str {
        "Organization"
    }
}
