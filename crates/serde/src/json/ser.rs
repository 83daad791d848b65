//! FHIR JSON encoding.
//!
//! [`CompositeJson`] implements `Serialize` by walking [`Composite::fields`], so any
//! serde serializer can write it in a single pass without an intermediate tree.

use crate::error::Result;
use helios_fhir::{Composite, FieldValue, Node, PrimitiveNode, TypeKind};
use serde::Serialize;
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde_json::Value as JsonValue;
use std::io::Write;

/// Serialize a FHIR value to a JSON string.
///
/// # Examples
///
/// ```rust
/// use helios_fhir::prelude::*;
/// use helios_serde::json::to_json_string;
///
/// let patient = Patient {
///     active: Some(Boolean::from(true)),
///     ..Default::default()
/// };
/// assert_eq!(
///     to_json_string(&patient).unwrap(),
///     r#"{"resourceType":"Patient","active":true}"#
/// );
/// ```
pub fn to_json_string(value: &dyn Composite) -> Result<String> {
    Ok(serde_json::to_string(&CompositeJson(value))?)
}

/// Serialize a FHIR value to a pretty-printed JSON string.
pub fn to_json_string_pretty(value: &dyn Composite) -> Result<String> {
    Ok(serde_json::to_string_pretty(&CompositeJson(value))?)
}

/// Serialize a FHIR value to JSON bytes.
pub fn to_json_vec(value: &dyn Composite) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&CompositeJson(value))?)
}

/// Serialize a FHIR value as JSON into a writer.
pub fn to_json_writer<W: Write>(writer: W, value: &dyn Composite) -> Result<()> {
    serde_json::to_writer(writer, &CompositeJson(value))?;
    Ok(())
}

/// `Serialize` view of a composite. Resources lead with `resourceType`.
#[derive(Clone, Copy)]
pub struct CompositeJson<'a>(pub &'a dyn Composite);

impl Serialize for CompositeJson<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let info = self.0.type_info();
        let mut map = serializer.serialize_map(None)?;
        if info.kind == TypeKind::Resource {
            map.serialize_entry("resourceType", info.name)?;
        }
        for field in self.0.fields() {
            match field.value {
                FieldValue::Attribute(Some(text)) => map.serialize_entry(field.name, text)?,
                FieldValue::Attribute(None) => {}
                FieldValue::Single(Some(node)) => write_node(&mut map, field.name, node)?,
                FieldValue::Single(None) => {}
                FieldValue::Choice(Some((suffix, node))) => {
                    write_node(&mut map, &format!("{}{}", field.name, suffix), node)?
                }
                FieldValue::Choice(None) => {}
                FieldValue::List(nodes) => write_list(&mut map, field.name, &nodes)?,
            }
        }
        map.end()
    }
}

fn write_node<M: SerializeMap>(
    map: &mut M,
    key: &str,
    node: Node<'_>,
) -> std::result::Result<(), M::Error> {
    match node {
        Node::Text(text) => map.serialize_entry(key, text),
        Node::Primitive(p) => {
            if let Some(value) = p.json_value() {
                map.serialize_entry(key, &value)?;
            }
            if p.has_decoration() {
                map.serialize_entry(&format!("_{}", key), &PrimitiveMetaJson(p))?;
            }
            Ok(())
        }
        Node::Composite(c) => map.serialize_entry(key, &CompositeJson(c)),
        Node::Resource(r) => map.serialize_entry(key, &CompositeJson(r)),
    }
}

/// Writes a repeating field. Primitive lists become the value array and the
/// `_` array, aligned by position; either is left out when it would hold only nulls.
fn write_list<M: SerializeMap>(
    map: &mut M,
    key: &str,
    nodes: &[Node<'_>],
) -> std::result::Result<(), M::Error> {
    let primitives: Vec<&dyn PrimitiveNode> =
        nodes.iter().filter_map(Node::as_primitive).collect();
    if !primitives.is_empty() {
        let values: Vec<Option<JsonValue>> = primitives.iter().map(|p| p.json_value()).collect();
        if values.iter().any(Option::is_some) {
            map.serialize_entry(key, &values)?;
        }
        if primitives.iter().any(|p| p.has_decoration()) {
            let metas: Vec<Option<PrimitiveMetaJson<'_>>> = primitives
                .iter()
                .map(|p| p.has_decoration().then_some(PrimitiveMetaJson(*p)))
                .collect();
            map.serialize_entry(&format!("_{}", key), &metas)?;
        }
        return Ok(());
    }

    let composites: Vec<CompositeJson<'_>> = nodes
        .iter()
        .filter_map(Node::as_composite)
        .map(CompositeJson)
        .collect();
    if !composites.is_empty() {
        map.serialize_entry(key, &composites)?;
    }
    Ok(())
}

/// The `_field` shadow of a primitive: `{"id": .., "extension": [..]}`.
struct PrimitiveMetaJson<'a>(&'a dyn PrimitiveNode);

impl Serialize for PrimitiveMetaJson<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(id) = self.0.element_id() {
            map.serialize_entry("id", id)?;
        }
        let extensions = self.0.extensions();
        if !extensions.is_empty() {
            map.serialize_entry("extension", &ExtensionsJson(extensions))?;
        }
        map.end()
    }
}

struct ExtensionsJson<'a>(&'a [helios_fhir::datatypes::Extension]);

impl Serialize for ExtensionsJson<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for extension in self.0 {
            seq.serialize_element(&CompositeJson(extension))?;
        }
        seq.end()
    }
}
