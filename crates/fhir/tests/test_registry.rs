use helios_fhir::prelude::*;
use helios_fhir::registry;

#[test]
fn test_registry_lists_shipped_resources() {
    assert_eq!(
        registry::resource_types(),
        vec!["Bundle", "Observation", "Organization", "Patient"]
    );
    assert!(registry::is_known("Patient"));
    assert!(!registry::is_known("patient"));
    assert!(!registry::is_known("Narrative"));
}

#[test]
fn test_instantiate_creates_empty_resource() {
    let resource = registry::instantiate("Observation").unwrap();
    assert_eq!(resource.resource_type(), "Observation");
    assert_eq!(resource.resource_id(), None);
    assert!(resource.as_any().downcast_ref::<Observation>().is_some());
    assert!(registry::instantiate("Unknown").is_none());
}

#[test]
fn test_instantiated_resource_fills_through_slots() {
    let mut envelope = ResourceEnvelope::from_boxed(registry::instantiate("Patient").unwrap());
    match envelope.as_composite_mut().slot("id").unwrap() {
        helios_fhir::Slot::Primitive(id) => id.set_lexical("abc").unwrap(),
        _ => panic!("resource id should be a primitive slot"),
    }
    let patient = envelope.downcast_ref::<Patient>().unwrap();
    assert_eq!(patient.resource_id(), Some("abc"));
    assert_eq!(envelope.into_inner().resource_type(), "Patient");
}
