//! FHIR XML codec tests: round trips, agreement with JSON, namespace and
//! attribute strictness, contained resource wrappers.
#![cfg(feature = "xml")]

use helios_fhir::prelude::*;
use helios_serde::json::{from_json_str, to_json_string};
use helios_serde::xml::{
    from_xml_reader, from_xml_slice, from_xml_str, resource_from_xml_str, to_xml_string,
    to_xml_string_pretty, to_xml_vec, to_xml_writer,
};
use helios_serde::{DecodeErrorKind, Format, SerdeError};

const PATIENT_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    r#"<Patient xmlns="http://hl7.org/fhir"><id value="example"/>"#,
    r#"<meta><versionId value="1"/><lastUpdated value="2023-05-01T10:00:00Z"/><profile value="http://example.org/StructureDefinition/p"/></meta>"#,
    r#"<contained><Organization><id value="org1"/><name value="ACME Health"/></Organization></contained>"#,
    r#"<extension url="http://example.org/ext/nickname"><valueString value="Jimmy"/></extension>"#,
    r#"<identifier><use value="usual"/><system value="urn:oid:1.2.36.146.595.217.0.1"/><value value="12345"/></identifier>"#,
    r#"<active value="true"/>"#,
    r#"<name><use value="official"/><family value="Chalmers"/><given value="Peter"/>"#,
    r#"<given id="g2"><extension url="http://example.org/ext/absent"><valueCode value="unknown"/></extension></given>"#,
    r#"<given value="James"/></name>"#,
    r#"<gender value="male"/>"#,
    r#"<birthDate value="1974-12-25"><extension url="http://hl7.org/fhir/StructureDefinition/patient-birthTime"><valueDateTime value="1974-12-25T14:35:45-05:00"/></extension></birthDate>"#,
    r#"<deceasedBoolean value="false"/>"#,
    r#"<address><use value="home"/><line value="534 Erewhon St"/><city value="PleasantVille"/><postalCode value="3999"/></address>"#,
    r##"<multipleBirthInteger value="2"/><managingOrganization><reference value="#org1"/></managingOrganization>"##,
    r#"</Patient>"#
);

const PATIENT_JSON: &str = concat!(
    r#"{"resourceType":"Patient","id":"example","#,
    r#""meta":{"versionId":"1","lastUpdated":"2023-05-01T10:00:00Z","profile":["http://example.org/StructureDefinition/p"]},"#,
    r#""contained":[{"resourceType":"Organization","id":"org1","name":"ACME Health"}],"#,
    r#""extension":[{"url":"http://example.org/ext/nickname","valueString":"Jimmy"}],"#,
    r#""identifier":[{"use":"usual","system":"urn:oid:1.2.36.146.595.217.0.1","value":"12345"}],"#,
    r#""active":true,"#,
    r#""name":[{"use":"official","family":"Chalmers","given":["Peter",null,"James"],"#,
    r#""_given":[null,{"id":"g2","extension":[{"url":"http://example.org/ext/absent","valueCode":"unknown"}]},null]}],"#,
    r#""gender":"male","birthDate":"1974-12-25","#,
    r#""_birthDate":{"extension":[{"url":"http://hl7.org/fhir/StructureDefinition/patient-birthTime","valueDateTime":"1974-12-25T14:35:45-05:00"}]},"#,
    r#""deceasedBoolean":false,"#,
    r#""address":[{"use":"home","line":["534 Erewhon St"],"city":"PleasantVille","postalCode":"3999"}],"#,
    r##""multipleBirthInteger":2,"managingOrganization":{"reference":"#org1"}}"##
);

fn patient_xml(body: &str) -> String {
    format!(r#"<Patient xmlns="http://hl7.org/fhir">{}</Patient>"#, body)
}

fn decode_kind(err: &SerdeError) -> &DecodeErrorKind {
    err.decode_kind()
        .unwrap_or_else(|| panic!("expected a decode error, got {:?}", err))
}

// =============================================================================
// Round trips
// =============================================================================

#[test]
fn test_patient_round_trip_is_byte_identical() {
    let patient: Patient = from_xml_str(PATIENT_XML).unwrap();
    assert_eq!(to_xml_string(&patient).unwrap(), PATIENT_XML);
}

#[test]
fn test_xml_and_json_describe_the_same_value() {
    let from_xml: Patient = from_xml_str(PATIENT_XML).unwrap();
    let from_json: Patient = from_json_str(PATIENT_JSON).unwrap();
    assert_eq!(from_xml, from_json);
    assert_eq!(to_json_string(&from_xml).unwrap(), PATIENT_JSON);
    assert_eq!(to_xml_string(&from_json).unwrap(), PATIENT_XML);
}

#[test]
fn test_pretty_output_decodes_to_the_same_value() {
    let patient: Patient = from_xml_str(PATIENT_XML).unwrap();
    let pretty = to_xml_string_pretty(&patient).unwrap();
    assert!(pretty.contains("\n  <id value=\"example\"/>"));
    let again: Patient = from_xml_str(&pretty).unwrap();
    assert_eq!(again, patient);
}

#[test]
fn test_entry_points_agree() {
    let patient: Patient = from_xml_str(PATIENT_XML).unwrap();
    assert_eq!(from_xml_slice::<Patient>(PATIENT_XML.as_bytes()).unwrap(), patient);
    assert_eq!(from_xml_reader::<_, Patient>(PATIENT_XML.as_bytes()).unwrap(), patient);

    let mut written = Vec::new();
    to_xml_writer(&mut written, &patient).unwrap();
    assert_eq!(written, to_xml_vec(&patient).unwrap());
}

#[test]
fn test_attribute_text_is_escaped() {
    let name = HumanName {
        family: Some(FhirString::from(r#"O'Brien & "Sons" <Ltd>"#)),
        ..Default::default()
    };
    let xml = to_xml_string(&name).unwrap();
    assert!(!xml.contains("<Ltd>"));
    assert_eq!(from_xml_str::<HumanName>(&xml).unwrap(), name);
}

#[test]
fn test_decoration_only_primitive() {
    let patient: Patient = from_xml_str(&patient_xml(r#"<active id="a1"/>"#)).unwrap();
    let active = patient.active.as_ref().unwrap();
    assert_eq!(active.value, None);
    assert_eq!(active.id.as_deref(), Some("a1"));
    assert_eq!(
        to_json_string(&patient).unwrap(),
        r#"{"resourceType":"Patient","_active":{"id":"a1"}}"#
    );
}

#[test]
fn test_element_id_and_url_are_attributes() {
    let extension = Extension {
        id: Some("e1".to_string()),
        ..Extension::new("http://e", ExtensionValue::Boolean(Boolean::from(true)))
    };
    let xml = to_xml_string(&extension).unwrap();
    assert!(xml.contains(r#"<Extension xmlns="http://hl7.org/fhir" id="e1" url="http://e">"#));
    assert_eq!(from_xml_str::<Extension>(&xml).unwrap(), extension);
}

#[test]
fn test_comments_and_whitespace_are_ignored() {
    let xml = r#"<?xml version="1.0"?>
<!-- exported -->
<Patient xmlns="http://hl7.org/fhir">
  <!-- identity -->
  <id value="p1"/>
  <active value="true"/>
</Patient>
"#;
    let patient: Patient = from_xml_str(xml).unwrap();
    assert_eq!(patient.resource_id(), Some("p1"));
    assert_eq!(patient.active, Some(Boolean::from(true)));
}

#[test]
fn test_prefixed_fhir_namespace_is_accepted() {
    let xml = r#"<f:Patient xmlns:f="http://hl7.org/fhir"><f:active value="false"/></f:Patient>"#;
    let patient: Patient = from_xml_str(xml).unwrap();
    assert_eq!(patient.active, Some(Boolean::from(false)));
}

// =============================================================================
// Strictness
// =============================================================================

#[test]
fn test_foreign_namespaces_are_rejected() {
    let err = from_xml_str::<Patient>(r#"<Patient xmlns="urn:not-fhir"/>"#).unwrap_err();
    assert_eq!(
        decode_kind(&err),
        &DecodeErrorKind::WrongNamespace(Some("urn:not-fhir".to_string()))
    );

    let err = from_xml_str::<Patient>(&patient_xml(
        r#"<x:active xmlns:x="urn:other" value="true"/>"#,
    ))
    .unwrap_err();
    assert!(matches!(decode_kind(&err), DecodeErrorKind::WrongNamespace(_)));
}

#[test]
fn test_unknown_attributes_are_rejected() {
    let err = from_xml_str::<Patient>(&patient_xml(r#"<active value="true" foo="bar"/>"#))
        .unwrap_err();
    assert_eq!(err.to_string(), "XML decode error: boolean.foo: unknown attribute");

    let err = from_xml_str::<Patient>(&patient_xml(
        r#"<active xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="boolean" value="true"/>"#,
    ))
    .unwrap_err();
    assert_eq!(decode_kind(&err), &DecodeErrorKind::UnknownAttribute);

    let err = from_xml_str::<Patient>(&patient_xml(r#"<name lang="en"/>"#)).unwrap_err();
    assert_eq!(err.to_string(), "XML decode error: HumanName.lang: unknown attribute");

    // a resource id is an element, not an attribute
    let err = from_xml_str::<Patient>(r#"<Patient xmlns="http://hl7.org/fhir" id="p1"/>"#)
        .unwrap_err();
    assert_eq!(decode_kind(&err), &DecodeErrorKind::UnknownAttribute);
}

#[test]
fn test_unknown_elements_are_rejected() {
    let err = from_xml_str::<Patient>(&patient_xml(r#"<nickname value="J"/>"#)).unwrap_err();
    assert_eq!(err.to_string(), "XML decode error: Patient.nickname: unknown field");

    let err = from_xml_str::<Extension>(
        r#"<Extension xmlns="http://hl7.org/fhir"><url value="http://e"/></Extension>"#,
    )
    .unwrap_err();
    assert_eq!(decode_kind(&err), &DecodeErrorKind::UnknownField);

    let err = from_xml_str::<Patient>(&patient_xml(
        r#"<active value="true"><id value="x"/></active>"#,
    ))
    .unwrap_err();
    assert_eq!(err.to_string(), "XML decode error: boolean.id: unknown field");
}

#[test]
fn test_text_content_is_rejected() {
    let err = from_xml_str::<Patient>(&patient_xml("hello")).unwrap_err();
    assert!(matches!(decode_kind(&err), DecodeErrorKind::UnexpectedContent(_)));

    let err = from_xml_str::<Patient>(&patient_xml(r#"<active value="true">yes</active>"#))
        .unwrap_err();
    assert!(matches!(decode_kind(&err), DecodeErrorKind::UnexpectedContent(_)));
}

#[test]
fn test_invalid_values_are_rejected() {
    let err = from_xml_str::<Patient>(&patient_xml(r#"<active value="maybe"/>"#)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "XML decode error: boolean.value: invalid boolean value `maybe`"
    );

    let err = from_xml_str::<Patient>(&patient_xml(r#"<birthDate value="25/12/1974"/>"#))
        .unwrap_err();
    assert!(matches!(decode_kind(&err), DecodeErrorKind::InvalidValue(_)));
}

#[test]
fn test_conflicting_choice_types_are_rejected() {
    let err = from_xml_str::<Observation>(concat!(
        r#"<Observation xmlns="http://hl7.org/fhir"><status value="final"/>"#,
        r#"<valueString value="high"/><valueBoolean value="true"/></Observation>"#
    ))
    .unwrap_err();
    assert_eq!(
        decode_kind(&err),
        &DecodeErrorKind::ChoiceConflict {
            existing: "String",
            incoming: "Boolean".to_string()
        }
    );
}

#[test]
fn test_root_must_match_requested_type() {
    let err = from_xml_str::<Observation>(PATIENT_XML).unwrap_err();
    assert_eq!(
        decode_kind(&err),
        &DecodeErrorKind::ResourceTypeMismatch {
            expected: "Observation",
            found: "Patient".to_string()
        }
    );
}

#[test]
fn test_trailing_content_is_rejected() {
    let xml = format!("{}{}", patient_xml(""), patient_xml(""));
    assert!(from_xml_str::<Patient>(&xml).is_err());

    let xml = format!("{} trailing", patient_xml(""));
    assert!(from_xml_str::<Patient>(&xml).is_err());
}

#[test]
fn test_empty_document_is_rejected() {
    assert!(from_xml_str::<Patient>("").is_err());
    assert!(resource_from_xml_str(r#"<?xml version="1.0"?>"#).is_err());
}

// =============================================================================
// Resources
// =============================================================================

#[test]
fn test_polymorphic_decode_dispatches_on_root_name() {
    let resource = resource_from_xml_str(PATIENT_XML).unwrap();
    assert_eq!(resource.resource_type(), "Patient");
    let patient = resource.downcast_ref::<Patient>().unwrap();
    assert_eq!(patient.contained[0].resource_type(), "Organization");

    let err = resource_from_xml_str(r#"<Unicorn xmlns="http://hl7.org/fhir"/>"#).unwrap_err();
    assert_eq!(
        decode_kind(&err),
        &DecodeErrorKind::UnknownResourceType("Unicorn".to_string())
    );
    assert_eq!(err.decode_error().unwrap().format, Format::Xml);
}

#[test]
fn test_contained_wrapper_rules() {
    let err = from_xml_str::<Patient>(&patient_xml("<contained><Unicorn/></contained>"))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "XML decode error: Patient.contained: unknown resource type `Unicorn`"
    );

    let err = from_xml_str::<Patient>(&patient_xml(
        "<contained><Organization/><Organization/></contained>",
    ))
    .unwrap_err();
    assert!(matches!(decode_kind(&err), DecodeErrorKind::UnexpectedContent(_)));

    let err = from_xml_str::<Patient>(&patient_xml("<contained/>")).unwrap_err();
    assert_eq!(decode_kind(&err), &DecodeErrorKind::MissingResourceType);

    let err = from_xml_str::<Patient>(&patient_xml("<contained></contained>")).unwrap_err();
    assert_eq!(decode_kind(&err), &DecodeErrorKind::MissingResourceType);

    let err = from_xml_str::<Patient>(&patient_xml(
        r#"<contained id="c1"><Organization/></contained>"#,
    ))
    .unwrap_err();
    assert_eq!(decode_kind(&err), &DecodeErrorKind::UnknownAttribute);

    let err = from_xml_str::<Patient>(&patient_xml("<contained><name/></contained>")).unwrap_err();
    assert!(matches!(decode_kind(&err), DecodeErrorKind::UnexpectedContent(_)));
}

#[test]
fn test_bundle_entry_resources() {
    let xml = concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        r#"<Bundle xmlns="http://hl7.org/fhir"><type value="collection"/>"#,
        r#"<entry><fullUrl value="urn:uuid:1"/><resource><Patient><id value="p1"/></Patient></resource></entry>"#,
        r#"<entry><fullUrl value="urn:uuid:2"/><resource><Observation><status value="final"/></Observation></resource></entry>"#,
        r#"</Bundle>"#
    );
    let resource = resource_from_xml_str(xml).unwrap();
    let bundle = resource.downcast_ref::<Bundle>().unwrap();
    assert_eq!(bundle.entry.len(), 2);
    assert_eq!(
        bundle.entry[1].resource.as_ref().map(|r| r.resource_type()),
        Some("Observation")
    );
    assert_eq!(to_xml_string(bundle).unwrap(), xml);

    let err = from_xml_str::<Bundle>(concat!(
        r#"<Bundle xmlns="http://hl7.org/fhir"><entry>"#,
        r#"<resource><Patient/></resource><resource><Patient/></resource>"#,
        r#"</entry></Bundle>"#
    ))
    .unwrap_err();
    assert_eq!(err.to_string(), "XML decode error: BundleEntry.resource: duplicate field");
}

#[test]
fn test_absent_list_entries_survive_round_trip_as_equal() {
    let name = HumanName {
        given: vec![FhirString::from("A"), FhirString::default(), FhirString::from("B")],
        ..Default::default()
    };
    let decoded: HumanName = from_xml_str(&to_xml_string(&name).unwrap()).unwrap();
    assert_eq!(decoded.given.len(), 2);
    assert_eq!(decoded.equal(&name), Some(true));
    assert_eq!(decoded.children(Some(&["given"])).len(), name.children(Some(&["given"])).len());
}

#[test]
fn test_extension_url_is_required() {
    let err = from_xml_str::<Patient>(&patient_xml(
        r#"<extension><valueString value="x"/></extension>"#,
    ))
    .unwrap_err();
    assert_eq!(err.to_string(), "XML decode error: Extension.url: missing required field");

    let err = from_xml_str::<Patient>(&patient_xml(r#"<extension url=""/>"#)).unwrap_err();
    assert!(matches!(decode_kind(&err), DecodeErrorKind::InvalidValue(_)));

    let err = from_xml_str::<Patient>(&patient_xml(
        r#"<birthDate value="1974-12-25"><extension/></birthDate>"#,
    ))
    .unwrap_err();
    assert_eq!(decode_kind(&err), &DecodeErrorKind::MissingField);
}
