use crate::base::ELEMENT_TYPE;
use crate::datatypes::{Coding, Extension};
use crate::element::{Composite, Field, Slot, SlotError, any_accessors};
use crate::primitive::{Id, Instant, Uri};
use helios_fhirpath_support::type_info::FHIR_TYPE_NAMESPACE;
use helios_fhirpath_support::{ElementInfo, ScalarConversion, TypeInfo, TypeKind};

pub static META_TYPE: TypeInfo = TypeInfo {
    namespace: FHIR_TYPE_NAMESPACE,
    name: "Meta",
    kind: TypeKind::Complex,
    base: Some(&ELEMENT_TYPE),
    elements: &[
        ElementInfo::attribute("id", 0),
        ElementInfo::list("extension", &["Extension"]),
        ElementInfo::single("versionId", &["id"]),
        ElementInfo::single("lastUpdated", &["instant"]),
        ElementInfo::single("source", &["uri"]),
        ElementInfo::list("profile", &["uri"]),
        ElementInfo::list("security", &["Coding"]),
        ElementInfo::list("tag", &["Coding"]),
    ],
};

/// Resource metadata maintained by the server.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Meta {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub version_id: Option<Id>,
    pub last_updated: Option<Instant>,
    pub source: Option<Uri>,
    pub profile: Vec<Uri>,
    pub security: Vec<Coding>,
    pub tag: Vec<Coding>,
}

impl Composite for Meta {
    fn type_info(&self) -> &'static TypeInfo {
        &META_TYPE
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::attribute("id", &self.id),
            Field::composites("extension", &self.extension),
            Field::primitive("versionId", &self.version_id),
            Field::primitive("lastUpdated", &self.last_updated),
            Field::primitive("source", &self.source),
            Field::primitives("profile", &self.profile),
            Field::composites("security", &self.security),
            Field::composites("tag", &self.tag),
        ]
    }

    fn slot(&mut self, name: &str) -> Result<Slot<'_>, SlotError> {
        Ok(match name {
            "id" => Slot::attribute(&mut self.id),
            "extension" => Slot::composites(&mut self.extension),
            "versionId" => Slot::primitive(&mut self.version_id),
            "lastUpdated" => Slot::primitive(&mut self.last_updated),
            "source" => Slot::primitive(&mut self.source),
            "profile" => Slot::primitives(&mut self.profile),
            "security" => Slot::composites(&mut self.security),
            "tag" => Slot::composites(&mut self.tag),
            _ => return Err(SlotError::Unknown),
        })
    }

    any_accessors!();
}

impl ScalarConversion for Meta {
    fn fhir_type_name(&self) -> &'static str {
        "Meta"
    }
}
