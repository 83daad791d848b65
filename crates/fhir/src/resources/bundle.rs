use crate::base::{BACKBONE_ELEMENT_TYPE, RESOURCE_TYPE};
use crate::datatypes::{Extension, Identifier, Meta};
use crate::element::{Composite, Field, Slot, SlotError, any_accessors};
use crate::primitive::{Code, Id, Instant, UnsignedInt, Uri};
use crate::resource::{Resource, ResourceEnvelope};
use helios_fhirpath_support::type_info::FHIR_TYPE_NAMESPACE;
use helios_fhirpath_support::{ElementInfo, ScalarConversion, TypeInfo, TypeKind};

pub static BUNDLE_TYPE: TypeInfo = TypeInfo {
    namespace: FHIR_TYPE_NAMESPACE,
    name: "Bundle",
    kind: TypeKind::Resource,
    base: Some(&RESOURCE_TYPE),
    elements: &[
        ElementInfo::single("id", &["id"]),
        ElementInfo::single("meta", &["Meta"]),
        ElementInfo::single("implicitRules", &["uri"]),
        ElementInfo::single("language", &["code"]),
        ElementInfo::single("identifier", &["Identifier"]),
        ElementInfo::required("type", &["code"]),
        ElementInfo::single("timestamp", &["instant"]),
        ElementInfo::single("total", &["unsignedInt"]),
        ElementInfo::list("entry", &["BundleEntry"]),
    ],
};

pub static BUNDLE_ENTRY_TYPE: TypeInfo = TypeInfo {
    namespace: FHIR_TYPE_NAMESPACE,
    name: "BundleEntry",
    kind: TypeKind::Complex,
    base: Some(&BACKBONE_ELEMENT_TYPE),
    elements: &[
        ElementInfo::attribute("id", 0),
        ElementInfo::list("extension", &["Extension"]),
        ElementInfo::list("modifierExtension", &["Extension"]),
        ElementInfo::single("fullUrl", &["uri"]),
        ElementInfo::single("resource", &["Resource"]),
    ],
};

/// A container for a collection of resources.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bundle {
    pub id: Option<Id>,
    pub meta: Option<Meta>,
    pub implicit_rules: Option<Uri>,
    pub language: Option<Code>,
    pub identifier: Option<Identifier>,
    pub r#type: Option<Code>,
    pub timestamp: Option<Instant>,
    pub total: Option<UnsignedInt>,
    pub entry: Vec<BundleEntry>,
}

impl Composite for Bundle {
    fn type_info(&self) -> &'static TypeInfo {
        &BUNDLE_TYPE
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::primitive("id", &self.id),
            Field::composite("meta", &self.meta),
            Field::primitive("implicitRules", &self.implicit_rules),
            Field::primitive("language", &self.language),
            Field::composite("identifier", &self.identifier),
            Field::primitive("type", &self.r#type),
            Field::primitive("timestamp", &self.timestamp),
            Field::primitive("total", &self.total),
            Field::composites("entry", &self.entry),
        ]
    }

    fn slot(&mut self, name: &str) -> Result<Slot<'_>, SlotError> {
        Ok(match name {
            "id" => Slot::primitive(&mut self.id),
            "meta" => Slot::composite(&mut self.meta),
            "implicitRules" => Slot::primitive(&mut self.implicit_rules),
            "language" => Slot::primitive(&mut self.language),
            "identifier" => Slot::composite(&mut self.identifier),
            "type" => Slot::primitive(&mut self.r#type),
            "timestamp" => Slot::primitive(&mut self.timestamp),
            "total" => Slot::primitive(&mut self.total),
            "entry" => Slot::composites(&mut self.entry),
            _ => return Err(SlotError::Unknown),
        })
    }

    any_accessors!();
}

impl Resource for Bundle {
    fn resource_id(&self) -> Option<&str> {
        self.id.as_ref().and_then(|id| id.value.as_deref())
    }

    fn clone_resource(&self) -> Box<dyn Resource> {
        Box::new(self.clone())
    }
}

impl ScalarConversion for Bundle {
    fn fhir_type_name(&self) -> &'static str {
        "Bundle"
    }
}

/// `Bundle.entry`: one resource in the bundle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BundleEntry {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub modifier_extension: Vec<Extension>,
    pub full_url: Option<Uri>,
    pub resource: Option<ResourceEnvelope>,
}

impl Composite for BundleEntry {
    fn type_info(&self) -> &'static TypeInfo {
        &BUNDLE_ENTRY_TYPE
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::attribute("id", &self.id),
            Field::composites("extension", &self.extension),
            Field::composites("modifierExtension", &self.modifier_extension),
            Field::primitive("fullUrl", &self.full_url),
            Field::resource("resource", &self.resource),
        ]
    }

    fn slot(&mut self, name: &str) -> Result<Slot<'_>, SlotError> {
        Ok(match name {
            "id" => Slot::attribute(&mut self.id),
            "extension" => Slot::composites(&mut self.extension),
            "modifierExtension" => Slot::composites(&mut self.modifier_extension),
            "fullUrl" => Slot::primitive(&mut self.full_url),
            "resource" => Slot::Resource(&mut self.resource),
            _ => return Err(SlotError::Unknown),
        })
    }

    any_accessors!();
}

impl ScalarConversion for BundleEntry {
    fn fhir_type_name(&self) -> &'static str {
        "BundleEntry"
    }
}
