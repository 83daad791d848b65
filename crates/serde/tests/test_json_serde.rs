//! FHIR JSON codec tests: round trips, primitive shadows, positional alignment,
//! choice fields, resource dispatch and strict rejection.

use helios_fhir::PreciseDecimal;
use helios_fhir::prelude::*;
use helios_serde::json::{
    from_json_reader, from_json_slice, from_json_str, resource_from_json_reader,
    resource_from_json_str, to_json_string, to_json_string_pretty, to_json_vec, to_json_writer,
};
use helios_serde::{DecodeErrorKind, Format, SerdeError};
use rust_decimal_macros::dec;

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

const OBSERVATION_JSON: &str = concat!(
    r#"{"resourceType":"Observation","id":"bw","status":"final","#,
    r#""code":{"coding":[{"system":"http://loinc.org","code":"29463-7","display":"Body Weight"}]},"#,
    r#""subject":{"reference":"Patient/example"},"effectiveDateTime":"2023-05-01T10:00:00Z","#,
    r#""valueQuantity":{"value":85.50,"unit":"kg","system":"http://unitsofmeasure.org","code":"kg"}}"#
);

fn decode_kind(err: &SerdeError) -> &DecodeErrorKind {
    err.decode_kind()
        .unwrap_or_else(|| panic!("expected a decode error, got {:?}", err))
}

// =============================================================================
// Round trips
// =============================================================================

#[test]
fn test_patient_round_trip_is_byte_identical() {
    let patient: Patient = from_json_str(PATIENT_JSON).unwrap();
    assert_eq!(to_json_string(&patient).unwrap(), PATIENT_JSON);
}

#[test]
fn test_observation_round_trip_keeps_decimal_text() {
    let observation: Observation = from_json_str(OBSERVATION_JSON).unwrap();
    assert_eq!(to_json_string(&observation).unwrap(), OBSERVATION_JSON);

    let Some(ObservationValue::Quantity(quantity)) = &observation.value else {
        panic!("expected valueQuantity");
    };
    let value = quantity.value.as_ref().and_then(|v| v.value.as_ref()).unwrap();
    assert_eq!(value.original(), "85.50");
    assert_eq!(value.value(), dec!(85.5));
}

#[test]
fn test_decoded_patient_content() {
    let patient: Patient = from_json_str(PATIENT_JSON).unwrap();

    let name = &patient.name[0];
    assert_eq!(name.given.len(), 3);
    assert_eq!(name.given[0].value.as_deref(), Some("Peter"));
    assert_eq!(name.given[1].value, None);
    assert_eq!(name.given[1].id.as_deref(), Some("g2"));
    assert_eq!(name.given[1].extension.len(), 1);
    assert_eq!(name.given[2].value.as_deref(), Some("James"));

    let birth_date = patient.birth_date.as_ref().unwrap();
    assert_eq!(birth_date, &Date::parse("1974-12-25").unwrap().with_extension(birth_date.extension[0].clone()));
    assert!(matches!(
        birth_date.extension[0].value,
        Some(ExtensionValue::DateTime(_))
    ));

    assert_eq!(
        patient.deceased,
        Some(PatientDeceased::Boolean(Boolean::from(false)))
    );
    assert_eq!(
        patient.multiple_birth,
        Some(PatientMultipleBirth::Integer(Integer::from(2)))
    );

    let organization = patient.contained[0].downcast_ref::<Organization>().unwrap();
    assert_eq!(organization.resource_id(), Some("org1"));
}

#[test]
fn test_pretty_output_decodes_to_the_same_value() {
    let patient: Patient = from_json_str(PATIENT_JSON).unwrap();
    let pretty = to_json_string_pretty(&patient).unwrap();
    assert!(pretty.contains("\n  \"resourceType\": \"Patient\""));
    let again: Patient = from_json_str(&pretty).unwrap();
    assert_eq!(again, patient);
}

#[test]
fn test_built_value_encodes_in_schema_order() {
    let observation = Observation {
        value: Some(ObservationValue::Quantity(Quantity {
            value: Some(Decimal::new(PreciseDecimal::from(dec!(72)))),
            unit: Some(FhirString::from("beats/min")),
            ..Default::default()
        })),
        status: Some(Code::from("final")),
        id: Some(Id::from("hr")),
        ..Default::default()
    };
    assert_eq!(
        to_json_string(&observation).unwrap(),
        r#"{"resourceType":"Observation","id":"hr","status":"final","valueQuantity":{"value":72,"unit":"beats/min"}}"#
    );
}

#[test]
fn test_empty_composites_are_kept() {
    let json = r#"{"resourceType":"Patient","meta":{},"name":[{}]}"#;
    let patient: Patient = from_json_str(json).unwrap();
    assert_eq!(patient.meta, Some(Meta::default()));
    assert_eq!(patient.name, vec![HumanName::default()]);
    assert_eq!(to_json_string(&patient).unwrap(), json);
}

#[test]
fn test_entry_points_agree() {
    let patient: Patient = from_json_str(PATIENT_JSON).unwrap();

    let from_slice: Patient = from_json_slice(PATIENT_JSON.as_bytes()).unwrap();
    let from_reader: Patient = from_json_reader(PATIENT_JSON.as_bytes()).unwrap();
    assert_eq!(from_slice, patient);
    assert_eq!(from_reader, patient);

    let mut written = Vec::new();
    to_json_writer(&mut written, &patient).unwrap();
    assert_eq!(written, to_json_vec(&patient).unwrap());
    assert_eq!(written, PATIENT_JSON.as_bytes());
}

// =============================================================================
// Primitive shadows and alignment
// =============================================================================

#[test]
fn test_decoration_only_primitive_round_trip() {
    let json = r#"{"resourceType":"Patient","_active":{"id":"a1"}}"#;
    let patient: Patient = from_json_str(json).unwrap();
    let active = patient.active.as_ref().unwrap();
    assert_eq!(active.value, None);
    assert_eq!(active.id.as_deref(), Some("a1"));
    assert_eq!(to_json_string(&patient).unwrap(), json);
}

#[test]
fn test_shadow_only_list_has_no_value_array() {
    let name = HumanName {
        given: vec![
            FhirString::default().with_id("g1"),
            FhirString::default().with_id("g2"),
        ],
        ..Default::default()
    };
    let json = to_json_string(&name).unwrap();
    assert_eq!(json, r#"{"_given":[{"id":"g1"},{"id":"g2"}]}"#);
    assert_eq!(from_json_str::<HumanName>(&json).unwrap(), name);
}

#[test]
fn test_middle_position_alignment() {
    let json = r#"{"given":[null,"B",null],"_given":[{"id":"a"},null,{"id":"c"}]}"#;
    let name: HumanName = from_json_str(json).unwrap();
    assert_eq!(name.given.len(), 3);
    assert_eq!(name.given[0].id.as_deref(), Some("a"));
    assert_eq!(name.given[1].value.as_deref(), Some("B"));
    assert_eq!(name.given[1].id, None);
    assert_eq!(name.given[2].id.as_deref(), Some("c"));
    assert_eq!(to_json_string(&name).unwrap(), json);
}

#[test]
fn test_shadow_array_first_and_longer() {
    let name: HumanName =
        from_json_str(r#"{"_given":[null,{"id":"x"}],"given":["A"]}"#).unwrap();
    assert_eq!(name.given.len(), 2);
    assert_eq!(name.given[0].value.as_deref(), Some("A"));
    assert_eq!(name.given[1].id.as_deref(), Some("x"));
}

#[test]
fn test_primitive_id_on_resource_id() {
    let json = r#"{"resourceType":"Patient","id":"p1","_id":{"id":"meta-id"}}"#;
    let patient: Patient = from_json_str(json).unwrap();
    assert_eq!(patient.id.as_ref().and_then(|id| id.id.as_deref()), Some("meta-id"));
    assert_eq!(to_json_string(&patient).unwrap(), json);
}

// =============================================================================
// Choice fields
// =============================================================================

#[test]
fn test_choice_value_and_shadow_merge_in_either_order() {
    let value_first: Extension =
        from_json_str(r#"{"url":"http://e","valueBoolean":true,"_valueBoolean":{"id":"b"}}"#)
            .unwrap();
    let shadow_first: Extension =
        from_json_str(r#"{"url":"http://e","_valueBoolean":{"id":"b"},"valueBoolean":true}"#)
            .unwrap();
    let expected = Extension::new(
        "http://e",
        ExtensionValue::Boolean(Boolean::from(true).with_id("b")),
    );
    assert_eq!(value_first, expected);
    assert_eq!(shadow_first, expected);
}

#[test]
fn test_conflicting_choice_types_are_rejected() {
    let err = from_json_str::<Observation>(
        r#"{"resourceType":"Observation","valueQuantity":{"value":1},"valueString":"high"}"#,
    )
    .unwrap_err();
    assert_eq!(
        decode_kind(&err),
        &DecodeErrorKind::ChoiceConflict {
            existing: "Quantity",
            incoming: "String".to_string()
        }
    );

    let err = from_json_str::<Patient>(
        r#"{"resourceType":"Patient","_deceasedDateTime":{"id":"d"},"deceasedBoolean":true}"#,
    )
    .unwrap_err();
    assert!(matches!(decode_kind(&err), DecodeErrorKind::ChoiceConflict { .. }));
}

#[test]
fn test_unknown_choice_suffix_is_unknown_field() {
    let err = from_json_str::<Observation>(
        r#"{"resourceType":"Observation","status":"final","valueFoo":1}"#,
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "JSON decode error: Observation.valueFoo: unknown field"
    );
    let decode = err.decode_error().unwrap();
    assert_eq!(decode.format, Format::Json);
    assert_eq!(decode.type_name, "Observation");
    assert_eq!(decode.field.as_deref(), Some("valueFoo"));
}

// =============================================================================
// Strictness
// =============================================================================

#[test]
fn test_unknown_keys_are_rejected_at_every_level() {
    let err = from_json_str::<Patient>(r#"{"resourceType":"Patient","foo":1}"#).unwrap_err();
    assert_eq!(decode_kind(&err), &DecodeErrorKind::UnknownField);

    let err = from_json_str::<Patient>(r#"{"resourceType":"Patient","name":[{"nickname":"J"}]}"#)
        .unwrap_err();
    assert_eq!(err.to_string(), "JSON decode error: HumanName.nickname: unknown field");

    let err = from_json_str::<Patient>(
        r#"{"resourceType":"Patient","birthDate":"1974-12-25","_birthDate":{"foo":true}}"#,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "JSON decode error: date.foo: unknown field");
}

#[test]
fn test_shadow_of_non_primitive_is_rejected() {
    let err = from_json_str::<Patient>(r#"{"resourceType":"Patient","_name":[{"id":"n"}]}"#)
        .unwrap_err();
    assert_eq!(err.to_string(), "JSON decode error: Patient._name: unknown field");
}

#[test]
fn test_duplicate_keys_are_rejected() {
    let err = from_json_str::<Patient>(
        r#"{"resourceType":"Patient","active":true,"active":false}"#,
    )
    .unwrap_err();
    assert_eq!(decode_kind(&err), &DecodeErrorKind::DuplicateField);

    let err = from_json_str::<Patient>(
        r#"{"resourceType":"Patient","resourceType":"Patient"}"#,
    )
    .unwrap_err();
    assert_eq!(decode_kind(&err), &DecodeErrorKind::DuplicateField);
}

#[test]
fn test_null_outside_aligned_arrays_is_rejected() {
    for json in [
        r#"{"resourceType":"Patient","active":null}"#,
        r#"{"resourceType":"Patient","name":null}"#,
        r#"{"resourceType":"Patient","name":[null]}"#,
        r#"{"resourceType":"Patient","meta":null}"#,
        r#"{"resourceType":"Patient","_active":null}"#,
    ] {
        let err = from_json_str::<Patient>(json).unwrap_err();
        assert!(
            matches!(decode_kind(&err), DecodeErrorKind::InvalidValue(_)),
            "{} gave {}",
            json,
            err
        );
    }
}

#[test]
fn test_invalid_primitive_values_are_rejected() {
    let err = from_json_str::<Patient>(r#"{"resourceType":"Patient","active":"yes"}"#).unwrap_err();
    assert_eq!(
        err.to_string(),
        "JSON decode error: Patient.active: invalid boolean value `\"yes\"`"
    );

    let err = from_json_str::<Patient>(r#"{"resourceType":"Patient","birthDate":"1974-13-01"}"#)
        .unwrap_err();
    assert!(matches!(decode_kind(&err), DecodeErrorKind::InvalidValue(_)));

    let err = from_json_str::<Quantity>(r#"{"value":"85.5"}"#).unwrap_err();
    assert!(matches!(decode_kind(&err), DecodeErrorKind::InvalidValue(_)));
}

#[test]
fn test_syntax_errors_are_json_errors() {
    assert!(matches!(
        from_json_str::<Patient>(r#"{"resourceType":"Patient""#).unwrap_err(),
        SerdeError::Json(_)
    ));
    assert!(matches!(
        from_json_str::<Patient>(r#"{"resourceType":"Patient"} trailing"#).unwrap_err(),
        SerdeError::Json(_)
    ));
}

// =============================================================================
// resourceType
// =============================================================================

#[test]
fn test_resource_type_must_come_first() {
    let err = from_json_str::<Patient>(r#"{"id":"x","resourceType":"Patient"}"#).unwrap_err();
    assert_eq!(decode_kind(&err), &DecodeErrorKind::MissingResourceType);

    let err = resource_from_json_str(r#"{"id":"x"}"#).unwrap_err();
    assert_eq!(decode_kind(&err), &DecodeErrorKind::MissingResourceType);

    let err = resource_from_json_str("{}").unwrap_err();
    assert_eq!(decode_kind(&err), &DecodeErrorKind::MissingResourceType);
}

#[test]
fn test_typed_decode_checks_resource_type() {
    let err = from_json_str::<Patient>(OBSERVATION_JSON).unwrap_err();
    assert_eq!(
        decode_kind(&err),
        &DecodeErrorKind::ResourceTypeMismatch {
            expected: "Patient",
            found: "Observation".to_string()
        }
    );
}

#[test]
fn test_data_types_carry_no_resource_type() {
    let err = from_json_str::<HumanName>(r#"{"resourceType":"HumanName"}"#).unwrap_err();
    assert_eq!(decode_kind(&err), &DecodeErrorKind::UnknownField);
}

#[test]
fn test_unknown_discriminants_are_rejected() {
    let err = resource_from_json_str(r#"{"resourceType":"Unicorn"}"#).unwrap_err();
    assert_eq!(
        decode_kind(&err),
        &DecodeErrorKind::UnknownResourceType("Unicorn".to_string())
    );

    let err = from_json_str::<Patient>(
        r#"{"resourceType":"Patient","contained":[{"resourceType":"Unicorn","id":"u"}]}"#,
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "JSON decode error: Patient.contained: unknown resource type `Unicorn`"
    );
}

#[test]
fn test_polymorphic_decode_dispatches_on_resource_type() {
    let resource = resource_from_json_str(OBSERVATION_JSON).unwrap();
    assert_eq!(resource.resource_type(), "Observation");
    assert!(resource.downcast_ref::<Patient>().is_none());
    let observation = resource.downcast_ref::<Observation>().unwrap();
    assert_eq!(observation.status.as_ref().and_then(|s| s.value.as_deref()), Some("final"));

    let from_reader = resource_from_json_reader(PATIENT_JSON.as_bytes()).unwrap();
    assert_eq!(from_reader.resource_type(), "Patient");
    assert_eq!(to_json_string(from_reader.as_composite()).unwrap(), PATIENT_JSON);
}

#[test]
fn test_bundle_entries_hold_any_resource() {
    let json = concat!(
        r#"{"resourceType":"Bundle","type":"collection","entry":["#,
        r#"{"fullUrl":"urn:uuid:1","resource":{"resourceType":"Patient","id":"p1"}},"#,
        r#"{"fullUrl":"urn:uuid:2","resource":{"resourceType":"Observation","status":"final"}}"#,
        r#"]}"#
    );
    let bundle: Bundle = from_json_str(json).unwrap();
    assert_eq!(bundle.entry.len(), 2);
    let first = bundle.entry[0].resource.as_ref().unwrap();
    assert_eq!(first.downcast_ref::<Patient>().unwrap().resource_id(), Some("p1"));
    assert_eq!(
        bundle.entry[1].resource.as_ref().map(|r| r.resource_type()),
        Some("Observation")
    );
    assert_eq!(to_json_string(&bundle).unwrap(), json);
}

#[test]
fn test_id_only_differences_are_equivalent_but_not_equal() {
    let original: Patient = from_json_str(PATIENT_JSON).unwrap();
    let renumbered: Patient = from_json_str(
        &PATIENT_JSON
            .replace(r#""id":"g2""#, r#""id":"given-2""#)
            .replace(r#""id":"org1""#, r#""id":"org-1""#),
    )
    .unwrap();

    assert_ne!(original, renumbered);
    assert_eq!(original.equal(&renumbered), Some(false));
    assert_eq!(original.equivalent(&renumbered), Some(true));
    assert_eq!(original.equal(&original.clone()), Some(true));

    let observation: Observation = from_json_str(OBSERVATION_JSON).unwrap();
    assert_eq!(original.equivalent(&observation), None);
}

#[test]
fn test_absent_list_entries_survive_round_trip_as_equal() {
    let name = HumanName {
        given: vec![FhirString::default()],
        ..Default::default()
    };
    let json = to_json_string(&name).unwrap();
    assert_eq!(json, "{}");
    let decoded: HumanName = from_json_str(&json).unwrap();
    assert!(decoded.given.is_empty());
    assert_eq!(decoded.equal(&name), Some(true));
    assert_eq!(decoded.equivalent(&name), Some(true));
}

#[test]
fn test_extension_url_is_required() {
    let err = from_json_str::<Extension>(r#"{"valueBoolean":true}"#).unwrap_err();
    assert_eq!(err.to_string(), "JSON decode error: Extension.url: missing required field");

    let err = from_json_str::<Patient>(
        r#"{"resourceType":"Patient","active":true,"_active":{"extension":[{"valueCode":"x"}]}}"#,
    )
    .unwrap_err();
    assert_eq!(decode_kind(&err), &DecodeErrorKind::MissingField);

    let err = from_json_str::<Extension>(r#"{"url":"","valueBoolean":true}"#).unwrap_err();
    assert!(matches!(decode_kind(&err), DecodeErrorKind::InvalidValue(_)));
}
