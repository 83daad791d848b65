use crate::base::ELEMENT_TYPE;
use crate::datatypes::Extension;
use crate::element::{Composite, Field, Slot, SlotError, any_accessors};
use crate::primitive::{Code, Decimal, FhirString, Uri};
use helios_fhirpath_support::type_info::FHIR_TYPE_NAMESPACE;
use helios_fhirpath_support::{
    ConversionError, ConversionResult, ElementInfo, QuantityValue, ScalarConversion, ScalarType,
    TypeInfo, TypeKind,
};

pub static QUANTITY_TYPE: TypeInfo = TypeInfo {
    namespace: FHIR_TYPE_NAMESPACE,
    name: "Quantity",
    kind: TypeKind::Complex,
    base: Some(&ELEMENT_TYPE),
    elements: &[
        ElementInfo::attribute("id", 0),
        ElementInfo::list("extension", &["Extension"]),
        ElementInfo::single("value", &["decimal"]),
        ElementInfo::single("comparator", &["code"]),
        ElementInfo::single("unit", &["string"]),
        ElementInfo::single("system", &["uri"]),
        ElementInfo::single("code", &["code"]),
    ],
};

/// A measured amount.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Quantity {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub value: Option<Decimal>,
    pub comparator: Option<Code>,
    pub unit: Option<FhirString>,
    pub system: Option<Uri>,
    pub code: Option<Code>,
}

impl Composite for Quantity {
    fn type_info(&self) -> &'static TypeInfo {
        &QUANTITY_TYPE
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::attribute("id", &self.id),
            Field::composites("extension", &self.extension),
            Field::primitive("value", &self.value),
            Field::primitive("comparator", &self.comparator),
            Field::primitive("unit", &self.unit),
            Field::primitive("system", &self.system),
            Field::primitive("code", &self.code),
        ]
    }

    fn slot(&mut self, name: &str) -> Result<Slot<'_>, SlotError> {
        Ok(match name {
            "id" => Slot::attribute(&mut self.id),
            "extension" => Slot::composites(&mut self.extension),
            "value" => Slot::primitive(&mut self.value),
            "comparator" => Slot::primitive(&mut self.comparator),
            "unit" => Slot::primitive(&mut self.unit),
            "system" => Slot::primitive(&mut self.system),
            "code" => Slot::primitive(&mut self.code),
            _ => return Err(SlotError::Unknown),
        })
    }

    any_accessors!();
}

impl ScalarConversion for Quantity {
    fn fhir_type_name(&self) -> &'static str {
        "Quantity"
    }

    /// The coded unit wins over the human-readable one.
    fn to_quantity(&self) -> ConversionResult<QuantityValue> {
        let value = self
            .value
            .as_ref()
            .and_then(|v| v.value.as_ref())
            .ok_or(ConversionError::Empty {
                from: "Quantity",
                to: ScalarType::Quantity,
            })?;
        let unit = self
            .code
            .as_ref()
            .and_then(|code| code.value.clone())
            .or_else(|| self.unit.as_ref().and_then(|unit| unit.value.clone()));
        Ok(QuantityValue {
            value: value.value(),
            unit,
        })
    }

    fn to_string_value(&self) -> ConversionResult<String> {
        self.to_quantity()
            .map(|q| q.to_string())
            .map_err(|_| ConversionError::Empty {
                from: "Quantity",
                to: ScalarType::String,
            })
    }
}
