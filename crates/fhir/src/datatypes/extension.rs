use crate::base::ELEMENT_TYPE;
use crate::datatypes::{
    Address, CodeableConcept, Coding, HumanName, Identifier, Meta, Period, Quantity, Reference,
};
use crate::element::{
    Composite, Field, Slot, SlotError, any_accessors, choice_slot, choice_type,
};
use crate::primitive::{
    Base64Binary, Boolean, Code, Date, DateTime, Decimal, FhirString, Id, Instant, Integer, Time,
    UnsignedInt, Uri,
};
use helios_fhirpath_support::type_info::FHIR_TYPE_NAMESPACE;
use helios_fhirpath_support::{ElementInfo, ScalarConversion, TypeInfo, TypeKind};

pub static EXTENSION_TYPE: TypeInfo = TypeInfo {
    namespace: FHIR_TYPE_NAMESPACE,
    name: "Extension",
    kind: TypeKind::Complex,
    base: Some(&ELEMENT_TYPE),
    elements: &[
        ElementInfo::attribute("id", 0),
        ElementInfo::list("extension", &["Extension"]),
        ElementInfo::attribute("url", 1),
        ElementInfo::single(
            "value",
            &[
                "base64Binary",
                "boolean",
                "code",
                "date",
                "dateTime",
                "decimal",
                "id",
                "instant",
                "integer",
                "string",
                "time",
                "unsignedInt",
                "uri",
                "Address",
                "CodeableConcept",
                "Coding",
                "HumanName",
                "Identifier",
                "Meta",
                "Period",
                "Quantity",
                "Reference",
            ],
        ),
    ],
};

choice_type! {
    /// `Extension.value[x]`.
    pub enum ExtensionValue {
        Base64Binary(Base64Binary) => primitive,
        Boolean(Boolean) => primitive,
        Code(Code) => primitive,
        Date(Date) => primitive,
        DateTime(DateTime) => primitive,
        Decimal(Decimal) => primitive,
        Id(Id) => primitive,
        Instant(Instant) => primitive,
        Integer(Integer) => primitive,
        String(FhirString) => primitive,
        Time(Time) => primitive,
        UnsignedInt(UnsignedInt) => primitive,
        Uri(Uri) => primitive,
        Address(Address) => composite,
        CodeableConcept(CodeableConcept) => composite,
        Coding(Coding) => composite,
        HumanName(HumanName) => composite,
        Identifier(Identifier) => composite,
        Meta(Meta) => composite,
        Period(Period) => composite,
        Quantity(Quantity) => composite,
        Reference(Reference) => composite,
    }
}

/// Additional content defined by an implementation, keyed by `url`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extension {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub url: String,
    pub value: Option<ExtensionValue>,
}

impl Extension {
    pub fn new(url: impl Into<String>, value: ExtensionValue) -> Self {
        Self {
            url: url.into(),
            value: Some(value),
            ..Default::default()
        }
    }
}

impl Composite for Extension {
    fn type_info(&self) -> &'static TypeInfo {
        &EXTENSION_TYPE
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::attribute("id", &self.id),
            Field::composites("extension", &self.extension),
            Field::required_attribute("url", &self.url),
            Field::choice("value", &self.value),
        ]
    }

    fn slot(&mut self, name: &str) -> Result<Slot<'_>, SlotError> {
        Ok(match name {
            "id" => Slot::attribute(&mut self.id),
            "extension" => Slot::composites(&mut self.extension),
            "url" => Slot::required_attribute(&mut self.url),
            _ => match name.strip_prefix("value") {
                Some(suffix) => return choice_slot(&mut self.value, suffix),
                None => return Err(SlotError::Unknown),
            },
        })
    }

    any_accessors!();
}

impl ScalarConversion for Extension {
    fn fhir_type_name(&self) -> &'static str {
        "Extension"
    }
}
