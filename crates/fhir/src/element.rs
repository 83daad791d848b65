//! The structural element model.
//!
//! Every FHIR data type and resource implements [`Composite`]. A composite describes
//! itself twice:
//!
//! - read side: [`Composite::fields`] lists its fields in schema order as borrowed
//!   [`Field`] views. Encoders and the reflective layer walk these.
//! - write side: [`Composite::slot`] hands out a mutable [`Slot`] for a wire name.
//!   Decoders fill values through slots without knowing the concrete type.
//!
//! Choice fields (`value[x]`) are closed enums implementing [`Choice`]; the wire name
//! is the base name followed by the concrete type's suffix.

use crate::primitive::{Primitive, PrimitiveKind, PrimitiveMut, PrimitiveNode};
use crate::reflect::{self, Comparison};
use crate::resource::{Resource, ResourceEnvelope};
use helios_fhirpath_support::{ScalarConversion, TypeInfo};
use std::any::Any;
use std::fmt;
use thiserror::Error;

/// A borrowed view of one value in the element tree.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// An attribute-like string (`Element.id`, `Extension.url`).
    Text(&'a str),
    Primitive(&'a dyn PrimitiveNode),
    Composite(&'a dyn Composite),
    Resource(&'a dyn Resource),
}

impl<'a> Node<'a> {
    /// FHIR type name of the value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Text(_) => "string",
            Node::Primitive(p) => p.type_info().name,
            Node::Composite(c) => c.type_info().name,
            Node::Resource(r) => r.type_info().name,
        }
    }

    /// False only for primitives with neither value nor decoration.
    pub fn is_present(&self) -> bool {
        match self {
            Node::Primitive(p) => p.is_present(),
            _ => true,
        }
    }

    /// The composite behind this node, resources included.
    pub fn as_composite(&self) -> Option<&'a dyn Composite> {
        match *self {
            Node::Composite(c) => Some(c),
            Node::Resource(r) => Some(r as &dyn Composite),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<&'a dyn PrimitiveNode> {
        match *self {
            Node::Primitive(p) => Some(p),
            _ => None,
        }
    }
}

/// One field of a composite as seen by encoders and the reflective layer.
#[derive(Debug, Clone)]
pub struct Field<'a> {
    /// Base name (`value` for `value[x]`).
    pub name: &'static str,
    pub value: FieldValue<'a>,
}

#[derive(Debug, Clone)]
pub enum FieldValue<'a> {
    /// Carried as an XML attribute; a bare string in JSON.
    Attribute(Option<&'a str>),
    Single(Option<Node<'a>>),
    List(Vec<Node<'a>>),
    /// Populated choice: the concrete type suffix and its value.
    Choice(Option<(&'static str, Node<'a>)>),
}

impl<'a> Field<'a> {
    pub fn attribute(name: &'static str, value: &'a Option<String>) -> Self {
        Self {
            name,
            value: FieldValue::Attribute(value.as_deref()),
        }
    }

    pub fn required_attribute(name: &'static str, value: &'a str) -> Self {
        Self {
            name,
            value: FieldValue::Attribute(Some(value)),
        }
    }

    pub fn primitive<K: PrimitiveKind>(name: &'static str, value: &'a Option<Primitive<K>>) -> Self {
        Self {
            name,
            value: FieldValue::Single(value.as_ref().map(|p| Node::Primitive(p))),
        }
    }

    pub fn primitives<K: PrimitiveKind>(name: &'static str, values: &'a [Primitive<K>]) -> Self {
        Self {
            name,
            value: FieldValue::List(values.iter().map(|p| Node::Primitive(p)).collect()),
        }
    }

    pub fn composite<T: Composite>(name: &'static str, value: &'a Option<T>) -> Self {
        Self {
            name,
            value: FieldValue::Single(value.as_ref().map(|c| Node::Composite(c))),
        }
    }

    pub fn boxed<T: Composite>(name: &'static str, value: &'a Option<Box<T>>) -> Self {
        Self {
            name,
            value: FieldValue::Single(value.as_deref().map(|c| Node::Composite(c))),
        }
    }

    pub fn composites<T: Composite>(name: &'static str, values: &'a [T]) -> Self {
        Self {
            name,
            value: FieldValue::List(values.iter().map(|c| Node::Composite(c)).collect()),
        }
    }

    pub fn choice<C: Choice>(name: &'static str, value: &'a Option<C>) -> Self {
        Self {
            name,
            value: FieldValue::Choice(value.as_ref().map(|c| (c.type_suffix(), c.node()))),
        }
    }

    pub fn resource(name: &'static str, value: &'a Option<ResourceEnvelope>) -> Self {
        Self {
            name,
            value: FieldValue::Single(value.as_ref().map(|r| Node::Resource(r.as_resource()))),
        }
    }

    pub fn resources(name: &'static str, values: &'a [ResourceEnvelope]) -> Self {
        Self {
            name,
            value: FieldValue::List(
                values
                    .iter()
                    .map(|r| Node::Resource(r.as_resource()))
                    .collect(),
            ),
        }
    }

    /// Wire name of the field as currently populated (`valueQuantity`).
    pub fn wire_name(&self) -> String {
        match &self.value {
            FieldValue::Choice(Some((suffix, _))) => format!("{}{}", self.name, suffix),
            _ => self.name.to_string(),
        }
    }

    /// True when `name` selects this field, either by base name or by the
    /// suffixed name of the populated choice.
    pub fn matches(&self, name: &str) -> bool {
        if self.name == name {
            return true;
        }
        match &self.value {
            FieldValue::Choice(Some((suffix, _))) => name.strip_prefix(self.name) == Some(*suffix),
            _ => false,
        }
    }

    /// The present values of the field, lists flattened.
    pub fn into_nodes(self) -> Vec<Node<'a>> {
        match self.value {
            FieldValue::Attribute(value) => value.map(Node::Text).into_iter().collect(),
            FieldValue::Single(node) => node.into_iter().filter(Node::is_present).collect(),
            FieldValue::List(nodes) => nodes.into_iter().filter(Node::is_present).collect(),
            FieldValue::Choice(choice) => choice
                .map(|(_, node)| node)
                .into_iter()
                .filter(Node::is_present)
                .collect(),
        }
    }
}

/// Mutable access to an attribute-like string.
pub enum AttributeSlot<'a> {
    Optional(&'a mut Option<String>),
    Required(&'a mut String),
}

impl AttributeSlot<'_> {
    pub fn set(&mut self, value: String) {
        match self {
            AttributeSlot::Optional(slot) => **slot = Some(value),
            AttributeSlot::Required(slot) => **slot = value,
        }
    }
}

/// Mutable access to a field, handed to decoders.
///
/// Single-valued slots are created eagerly: asking for a slot allocates a default
/// value in the field when it is empty.
pub enum Slot<'a> {
    Attribute(AttributeSlot<'a>),
    Primitive(&'a mut dyn PrimitiveMut),
    PrimitiveList(&'a mut dyn PrimitiveListSlot),
    Composite(&'a mut dyn Composite),
    CompositeList(&'a mut dyn CompositeListSlot),
    Resource(&'a mut Option<ResourceEnvelope>),
    ResourceList(&'a mut Vec<ResourceEnvelope>),
}

impl<'a> Slot<'a> {
    pub fn attribute(value: &'a mut Option<String>) -> Self {
        Slot::Attribute(AttributeSlot::Optional(value))
    }

    pub fn required_attribute(value: &'a mut String) -> Self {
        Slot::Attribute(AttributeSlot::Required(value))
    }

    pub fn primitive<K: PrimitiveKind>(value: &'a mut Option<Primitive<K>>) -> Self {
        Slot::Primitive(value.get_or_insert_with(Primitive::default))
    }

    pub fn primitives<K: PrimitiveKind>(values: &'a mut Vec<Primitive<K>>) -> Self {
        Slot::PrimitiveList(values)
    }

    pub fn composite<T: Composite + Default>(value: &'a mut Option<T>) -> Self {
        Slot::Composite(value.get_or_insert_with(T::default))
    }

    pub fn boxed<T: Composite + Default>(value: &'a mut Option<Box<T>>) -> Self {
        Slot::Composite(&mut **value.get_or_insert_with(Box::default))
    }

    pub fn composites<T: Composite + Default>(values: &'a mut Vec<T>) -> Self {
        Slot::CompositeList(values)
    }

    /// Short description used in decode error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Slot::Attribute(_) => "attribute",
            Slot::Primitive(_) => "primitive",
            Slot::PrimitiveList(_) => "primitive list",
            Slot::Composite(_) => "element",
            Slot::CompositeList(_) => "element list",
            Slot::Resource(_) => "resource",
            Slot::ResourceList(_) => "resource list",
        }
    }
}

/// Failure to hand out a slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("unknown field")]
    Unknown,

    #[error("choice already holds `{existing}`, cannot also hold `{incoming}`")]
    ChoiceConflict {
        existing: &'static str,
        incoming: String,
    },
}

/// A repeating primitive field, addressed by position.
pub trait PrimitiveListSlot {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grows the list with empty primitives up to `len`.
    fn ensure_len(&mut self, len: usize);

    fn item_mut(&mut self, index: usize) -> Option<&mut dyn PrimitiveMut>;

    /// Appends an empty primitive and returns it.
    fn push_default(&mut self) -> &mut dyn PrimitiveMut;
}

impl<K: PrimitiveKind> PrimitiveListSlot for Vec<Primitive<K>> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn ensure_len(&mut self, len: usize) {
        if Vec::len(self) < len {
            self.resize_with(len, Primitive::default);
        }
    }

    fn item_mut(&mut self, index: usize) -> Option<&mut dyn PrimitiveMut> {
        self.get_mut(index).map(|p| p as &mut dyn PrimitiveMut)
    }

    fn push_default(&mut self) -> &mut dyn PrimitiveMut {
        self.push(Primitive::default());
        let last = Vec::len(self) - 1;
        &mut self[last]
    }
}

/// A repeating composite field.
pub trait CompositeListSlot {
    /// Appends a default composite and returns it.
    fn push_default(&mut self) -> &mut dyn Composite;
}

impl<T: Composite + Default> CompositeListSlot for Vec<T> {
    fn push_default(&mut self) -> &mut dyn Composite {
        self.push(T::default());
        let last = self.len() - 1;
        &mut self[last]
    }
}

/// A FHIR data type or resource.
pub trait Composite: ScalarConversion + fmt::Debug + Send + Sync + 'static {
    /// Static descriptor of the type.
    fn type_info(&self) -> &'static TypeInfo;

    /// Fields in schema order.
    fn fields(&self) -> Vec<Field<'_>>;

    /// Mutable access by wire name. Choice fields are addressed by their suffixed
    /// name; `_`-prefixed JSON names are never passed here.
    fn slot(&mut self, name: &str) -> Result<Slot<'_>, SlotError>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Immediate children in schema order, lists flattened. With `names`, only the
    /// fields matching one of the names (base or suffixed choice name).
    fn children(&self, names: Option<&[&str]>) -> Vec<Node<'_>> {
        reflect::children(self.fields(), names)
    }

    /// First attribute the schema requires that holds no text.
    fn missing_attribute(&self) -> Option<&'static str> {
        let info = self.type_info();
        self.fields().into_iter().find_map(|field| match field.value {
            FieldValue::Attribute(value)
                if value.is_none_or(str::is_empty)
                    && info.element(field.name).is_some_and(|e| e.min > 0) =>
            {
                Some(field.name)
            }
            _ => None,
        })
    }

    /// Strict deep equality. `None` when `other` is a different type.
    fn equal(&self, other: &dyn Composite) -> Option<bool> {
        reflect::compare_fields(self.type_info(), self.fields(), other, Comparison::Equal)
    }

    /// Deep equality ignoring every `id`. `None` when `other` is a different type.
    fn equivalent(&self, other: &dyn Composite) -> Option<bool> {
        reflect::compare_fields(
            self.type_info(),
            self.fields(),
            other,
            Comparison::Equivalent,
        )
    }
}

/// A closed set of concrete types for one `[x]` field.
pub trait Choice: Sized {
    /// A default value of the concrete type named by `suffix` (`Quantity`,
    /// `DateTime`), or `None` when the suffix is not allowed.
    fn from_suffix(suffix: &str) -> Option<Self>;

    /// Suffix of the populated type.
    fn type_suffix(&self) -> &'static str;

    fn node(&self) -> Node<'_>;

    fn slot_mut(&mut self) -> Slot<'_>;
}

/// Slot for a choice field addressed by `suffix`.
///
/// An empty field is populated with the requested type. A field already holding
/// the same type is returned for merging; a different type is a conflict.
pub fn choice_slot<'a, C: Choice>(
    field: &'a mut Option<C>,
    suffix: &str,
) -> Result<Slot<'a>, SlotError> {
    match field.as_ref() {
        Some(existing) if existing.type_suffix() == suffix => {}
        Some(existing) => {
            return Err(match C::from_suffix(suffix) {
                Some(_) => SlotError::ChoiceConflict {
                    existing: existing.type_suffix(),
                    incoming: suffix.to_string(),
                },
                None => SlotError::Unknown,
            });
        }
        None => *field = Some(C::from_suffix(suffix).ok_or(SlotError::Unknown)?),
    }
    match field {
        Some(choice) => Ok(choice.slot_mut()),
        None => Err(SlotError::Unknown),
    }
}

/// Declares a choice enum and its [`Choice`] impl.
///
/// Variant names double as wire suffixes, so they must be the capitalized FHIR type
/// name (`DateTime`, `Quantity`). Each variant is tagged `primitive` or `composite`.
macro_rules! choice_type {
    (@node primitive $v:ident) => {
        $crate::element::Node::Primitive($v)
    };
    (@node composite $v:ident) => {
        $crate::element::Node::Composite($v)
    };
    (@slot primitive $v:ident) => {
        $crate::element::Slot::Primitive($v)
    };
    (@slot composite $v:ident) => {
        $crate::element::Slot::Composite($v)
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $variant:ident($ty:ty) => $kind:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $( $variant($ty), )+
        }

        impl $crate::element::Choice for $name {
            fn from_suffix(suffix: &str) -> Option<Self> {
                $(
                    if suffix == stringify!($variant) {
                        return Some($name::$variant(<$ty>::default()));
                    }
                )+
                None
            }

            fn type_suffix(&self) -> &'static str {
                match self {
                    $( $name::$variant(_) => stringify!($variant), )+
                }
            }

            fn node(&self) -> $crate::element::Node<'_> {
                match self {
                    $( $name::$variant(value) => choice_type!(@node $kind value), )+
                }
            }

            fn slot_mut(&mut self) -> $crate::element::Slot<'_> {
                match self {
                    $( $name::$variant(value) => choice_type!(@slot $kind value), )+
                }
            }
        }
    };
}

pub(crate) use choice_type;

/// Expands to the `as_any` / `as_any_mut` pair of a [`Composite`] impl.
macro_rules! any_accessors {
    () => {
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    };
}

pub(crate) use any_accessors;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::{Extension, ExtensionValue, Period, Quantity};
    use crate::primitive::{Boolean, FhirString};

    #[test]
    fn test_choice_slot_creates_then_merges() {
        let mut value: Option<ExtensionValue> = None;
        match choice_slot(&mut value, "Boolean").unwrap() {
            Slot::Primitive(p) => p.set_lexical("true").unwrap(),
            _ => panic!("expected primitive slot"),
        }
        match choice_slot(&mut value, "Boolean").unwrap() {
            Slot::Primitive(p) => p.set_element_id("flag".to_string()),
            _ => panic!("expected primitive slot"),
        }
        let expected = Boolean::new(true).with_id("flag");
        assert_eq!(value, Some(ExtensionValue::Boolean(expected)));
    }

    #[test]
    fn test_choice_slot_conflict_and_unknown() {
        let mut value = Some(ExtensionValue::Period(Period::default()));
        assert_eq!(
            choice_slot(&mut value, "Quantity").err(),
            Some(SlotError::ChoiceConflict {
                existing: "Period",
                incoming: "Quantity".to_string()
            })
        );
        assert_eq!(choice_slot(&mut value, "Narrative").err(), Some(SlotError::Unknown));
        let mut empty: Option<ExtensionValue> = None;
        assert_eq!(choice_slot(&mut empty, "quantity").err(), Some(SlotError::Unknown));
        assert!(empty.is_none());
    }

    #[test]
    fn test_missing_required_attribute() {
        let mut extension = Extension::default();
        assert_eq!(extension.missing_attribute(), Some("url"));
        extension.url = "http://example.org/flag".to_string();
        assert_eq!(extension.missing_attribute(), None);
        // `id` is optional
        assert_eq!(Period::default().missing_attribute(), None);
    }

    #[test]
    fn test_field_matches_suffixed_choice_name() {
        let extension = Extension {
            url: "http://example.org/weight".to_string(),
            value: Some(ExtensionValue::Quantity(Quantity::default())),
            ..Default::default()
        };
        let fields = extension.fields();
        let value = fields.iter().find(|f| f.name == "value").unwrap();
        assert!(value.matches("value"));
        assert!(value.matches("valueQuantity"));
        assert!(!value.matches("valueString"));
        assert_eq!(value.wire_name(), "valueQuantity");
    }

    #[test]
    fn test_primitive_list_slot_grows() {
        let mut given: Vec<FhirString> = vec![FhirString::from("Jim")];
        let slot: &mut dyn PrimitiveListSlot = &mut given;
        slot.ensure_len(3);
        assert_eq!(slot.len(), 3);
        slot.ensure_len(2);
        assert_eq!(slot.len(), 3);
        slot.item_mut(2).unwrap().set_lexical("Peter").unwrap();
        assert_eq!(given[0].value.as_deref(), Some("Jim"));
        assert!(!given[1].is_present());
        assert_eq!(given[2].value.as_deref(), Some("Peter"));
    }
}
