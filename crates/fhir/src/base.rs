//! Abstract types at the root of the FHIR type hierarchy.

use helios_fhirpath_support::type_info::FHIR_TYPE_NAMESPACE;
use helios_fhirpath_support::{ElementInfo, TypeInfo, TypeKind};

pub static BASE_TYPE: TypeInfo = TypeInfo {
    namespace: FHIR_TYPE_NAMESPACE,
    name: "Base",
    kind: TypeKind::Complex,
    base: None,
    elements: &[],
};

pub static ELEMENT_TYPE: TypeInfo = TypeInfo {
    namespace: FHIR_TYPE_NAMESPACE,
    name: "Element",
    kind: TypeKind::Complex,
    base: Some(&BASE_TYPE),
    elements: &[
        ElementInfo::attribute("id", 0),
        ElementInfo::list("extension", &["Extension"]),
    ],
};

pub static BACKBONE_ELEMENT_TYPE: TypeInfo = TypeInfo {
    namespace: FHIR_TYPE_NAMESPACE,
    name: "BackboneElement",
    kind: TypeKind::Complex,
    base: Some(&ELEMENT_TYPE),
    elements: &[
        ElementInfo::attribute("id", 0),
        ElementInfo::list("extension", &["Extension"]),
        ElementInfo::list("modifierExtension", &["Extension"]),
    ],
};

pub static RESOURCE_TYPE: TypeInfo = TypeInfo {
    namespace: FHIR_TYPE_NAMESPACE,
    name: "Resource",
    kind: TypeKind::Resource,
    base: Some(&BASE_TYPE),
    elements: &[
        ElementInfo::single("id", &["id"]),
        ElementInfo::single("meta", &["Meta"]),
        ElementInfo::single("implicitRules", &["uri"]),
        ElementInfo::single("language", &["code"]),
    ],
};

pub static DOMAIN_RESOURCE_TYPE: TypeInfo = TypeInfo {
    namespace: FHIR_TYPE_NAMESPACE,
    name: "DomainResource",
    kind: TypeKind::Resource,
    base: Some(&RESOURCE_TYPE),
    elements: &[
        ElementInfo::single("id", &["id"]),
        ElementInfo::single("meta", &["Meta"]),
        ElementInfo::single("implicitRules", &["uri"]),
        ElementInfo::single("language", &["code"]),
        ElementInfo::list("contained", &["Resource"]),
        ElementInfo::list("extension", &["Extension"]),
        ElementInfo::list("modifierExtension", &["Extension"]),
    ],
};
