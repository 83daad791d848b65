//! FHIR XML encoding.
//!
//! The encoder walks [`Composite::fields`] and writes quick-xml events as it goes.

use super::utils::{self, FHIR_NAMESPACE};
use crate::error::{Result, SerdeError};
use helios_fhir::{Composite, Field, FieldValue, Node, PrimitiveNode};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use std::io::Write;

/// Serialize a FHIR value to an XML string.
///
/// # Examples
///
/// ```rust
/// use helios_fhir::prelude::*;
/// use helios_serde::xml::to_xml_string;
///
/// let patient = Patient {
///     id: Some(Id::from("example")),
///     ..Default::default()
/// };
/// assert_eq!(
///     to_xml_string(&patient).unwrap(),
///     r#"<?xml version="1.0" encoding="UTF-8"?><Patient xmlns="http://hl7.org/fhir"><id value="example"/></Patient>"#
/// );
/// ```
pub fn to_xml_string(value: &dyn Composite) -> Result<String> {
    into_string(to_xml_vec(value)?)
}

/// Serialize a FHIR value to an XML string indented by two spaces.
pub fn to_xml_string_pretty(value: &dyn Composite) -> Result<String> {
    let mut out = Vec::new();
    XmlEncoder::new(Writer::new_with_indent(&mut out, b' ', 2)).write_document(value)?;
    into_string(out)
}

/// Serialize a FHIR value to XML bytes.
pub fn to_xml_vec(value: &dyn Composite) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    to_xml_writer(&mut out, value)?;
    Ok(out)
}

/// Serialize a FHIR value as XML into a writer.
pub fn to_xml_writer<W: Write>(writer: W, value: &dyn Composite) -> Result<()> {
    XmlEncoder::new(Writer::new(writer)).write_document(value)
}

fn into_string(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| SerdeError::Custom(format!("Invalid UTF-8: {}", e)))
}

struct XmlEncoder<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> XmlEncoder<W> {
    fn new(writer: Writer<W>) -> Self {
        Self { writer }
    }

    fn write_document(mut self, value: &dyn Composite) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write_composite(value.type_info().name, value, true)
    }

    /// Writes `value` as element `name`. Attribute fields go on the start tag, the
    /// rest become child elements in schema order.
    fn write_composite(&mut self, name: &str, value: &dyn Composite, root: bool) -> Result<()> {
        let fields = value.fields();
        let mut element = BytesStart::new(name);
        if root {
            element.push_attribute(("xmlns", FHIR_NAMESPACE));
        }
        for field in &fields {
            if let FieldValue::Attribute(Some(text)) = &field.value {
                element.push_attribute((field.name, *text));
            }
        }

        if !fields.iter().any(has_element_content) {
            self.writer.write_event(Event::Empty(element))?;
            return Ok(());
        }

        self.writer.write_event(Event::Start(element))?;
        for field in fields {
            self.write_field(field)?;
        }
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_field(&mut self, field: Field<'_>) -> Result<()> {
        match field.value {
            FieldValue::Single(Some(node)) => self.write_node(field.name, node),
            FieldValue::Choice(Some((suffix, node))) => {
                self.write_node(&utils::choice_element_name(field.name, suffix), node)
            }
            FieldValue::List(nodes) => {
                for node in nodes {
                    self.write_node(field.name, node)?;
                }
                Ok(())
            }
            FieldValue::Attribute(_) | FieldValue::Single(None) | FieldValue::Choice(None) => {
                Ok(())
            }
        }
    }

    fn write_node(&mut self, name: &str, node: Node<'_>) -> Result<()> {
        match node {
            Node::Text(text) => {
                let mut element = BytesStart::new(name);
                element.push_attribute(("value", text));
                self.writer.write_event(Event::Empty(element))?;
                Ok(())
            }
            Node::Primitive(value) => self.write_primitive(name, value),
            Node::Composite(value) => self.write_composite(name, value, false),
            // the field element wraps the resource element
            Node::Resource(resource) => {
                self.writer.write_event(Event::Start(BytesStart::new(name)))?;
                self.write_composite(resource.type_info().name, resource, false)?;
                self.writer.write_event(Event::End(BytesEnd::new(name)))?;
                Ok(())
            }
        }
    }

    /// `<name id=".." value="..">` with extensions as children.
    fn write_primitive(&mut self, name: &str, value: &dyn PrimitiveNode) -> Result<()> {
        if !value.is_present() {
            return Ok(());
        }
        let lexical = value.lexical_value();
        let mut element = BytesStart::new(name);
        if let Some(id) = value.element_id() {
            element.push_attribute(("id", id));
        }
        if let Some(lexical) = &lexical {
            element.push_attribute(("value", lexical.as_str()));
        }

        let extensions = value.extensions();
        if extensions.is_empty() {
            self.writer.write_event(Event::Empty(element))?;
            return Ok(());
        }
        self.writer.write_event(Event::Start(element))?;
        for extension in extensions {
            self.write_composite("extension", extension, false)?;
        }
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }
}

fn has_element_content(field: &Field<'_>) -> bool {
    match &field.value {
        FieldValue::Attribute(_) => false,
        FieldValue::Single(node) => node.is_some_and(|n| n.is_present()),
        FieldValue::Choice(choice) => choice.is_some_and(|(_, n)| n.is_present()),
        FieldValue::List(nodes) => nodes.iter().any(Node::is_present),
    }
}
