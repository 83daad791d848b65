//! FHIR XML decoding.
//!
//! A recursive reader over `quick_xml::NsReader` events that fills the target
//! through [`Composite::slot`]. Every element must resolve to the FHIR namespace.

use super::utils::{FHIR_NAMESPACE, is_resource_name};
use crate::convert::Format;
use crate::error::{DecodeError, DecodeErrorKind, Result, SerdeError};
use helios_fhir::{
    Composite, CompositeListSlot, PrimitiveMut, Resource, ResourceEnvelope, Slot,
    registry,
};
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use std::collections::HashSet;
use std::io::BufRead;
use tracing::trace;

/// Deserialize a FHIR value from an XML string.
///
/// # Examples
///
/// ```rust
/// use helios_fhir::prelude::*;
/// use helios_serde::xml::from_xml_str;
///
/// let xml = r#"<?xml version="1.0"?>
/// <Patient xmlns="http://hl7.org/fhir">
///   <id value="example"/>
/// </Patient>"#;
/// let patient: Patient = from_xml_str(xml).unwrap();
/// assert_eq!(patient.resource_id(), Some("example"));
/// ```
pub fn from_xml_str<T: Composite + Default>(xml: &str) -> Result<T> {
    from_xml_reader(xml.as_bytes())
}

/// Deserialize a FHIR value from XML bytes.
pub fn from_xml_slice<T: Composite + Default>(xml: &[u8]) -> Result<T> {
    from_xml_reader(xml)
}

/// Deserialize a FHIR value from an XML reader.
pub fn from_xml_reader<R: BufRead, T: Composite + Default>(reader: R) -> Result<T> {
    let mut decoder = XmlDecoder::new(reader);
    let mut value = T::default();
    let expected = value.type_info().name;
    let root = decoder.root()?;
    if root.name != expected {
        return Err(decode_error(
            expected,
            None,
            DecodeErrorKind::ResourceTypeMismatch {
                expected,
                found: root.name,
            },
        ));
    }
    decoder.read_composite(&mut value, root)?;
    decoder.finish()?;
    Ok(value)
}

/// Deserialize whichever resource the root element names.
pub fn resource_from_xml_str(xml: &str) -> Result<ResourceEnvelope> {
    resource_from_xml_reader(xml.as_bytes())
}

pub fn resource_from_xml_slice(xml: &[u8]) -> Result<ResourceEnvelope> {
    resource_from_xml_reader(xml)
}

pub fn resource_from_xml_reader<R: BufRead>(reader: R) -> Result<ResourceEnvelope> {
    let mut decoder = XmlDecoder::new(reader);
    let root = decoder.root()?;
    let mut resource = instantiate("Resource", None, &root.name)?;
    decoder.read_composite(&mut *resource, root)?;
    decoder.finish()?;
    Ok(ResourceEnvelope::from_boxed(resource))
}

fn decode_error(type_name: &str, field: Option<&str>, kind: DecodeErrorKind) -> SerdeError {
    let err = DecodeError::new(Format::Xml, type_name, kind);
    SerdeError::Decode(match field {
        Some(field) => err.at(field),
        None => err,
    })
}

fn unexpected(type_name: &str, field: Option<&str>, message: impl Into<String>) -> SerdeError {
    decode_error(
        type_name,
        field,
        DecodeErrorKind::UnexpectedContent(message.into()),
    )
}

fn instantiate(owner: &str, field: Option<&str>, name: &str) -> Result<Box<dyn Resource>> {
    registry::instantiate(name).ok_or_else(|| {
        decode_error(
            owner,
            field,
            DecodeErrorKind::UnknownResourceType(name.to_string()),
        )
    })
}

fn check_required(target: &dyn Composite) -> Result<()> {
    match target.missing_attribute() {
        Some(name) => Err(decode_error(
            target.type_info().name,
            Some(name),
            DecodeErrorKind::MissingField,
        )),
        None => Ok(()),
    }
}

/// An element start with everything the decoder needs, detached from the buffer.
#[derive(Debug)]
struct StartTag {
    /// Local name.
    name: String,
    /// Resolved namespace, `None` when unbound.
    namespace: Option<String>,
    /// Attributes in document order, namespace declarations excluded.
    attributes: Vec<(String, String)>,
    /// Written as `<name/>`.
    empty: bool,
}

impl StartTag {
    fn read(start: &BytesStart<'_>, namespace: Option<String>, empty: bool) -> Result<Self> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| SerdeError::Custom(format!("invalid attribute value: {}", e)))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            namespace,
            attributes,
            empty,
        })
    }

    /// Errors unless the element is in the FHIR namespace. `owner` is the type
    /// the element was found in.
    fn check_namespace(&self, owner: &str) -> Result<()> {
        if self.namespace.as_deref() == Some(FHIR_NAMESPACE) {
            return Ok(());
        }
        Err(decode_error(
            owner,
            Some(self.name.as_str()),
            DecodeErrorKind::WrongNamespace(self.namespace.clone()),
        ))
    }
}

enum XmlEvent {
    Start(StartTag),
    End,
    /// Character data or markup that may not appear in FHIR XML.
    Text(String),
    Eof,
}

struct XmlDecoder<R: BufRead> {
    reader: NsReader<R>,
    buf: Vec<u8>,
}

impl<R: BufRead> XmlDecoder<R> {
    fn new(reader: R) -> Self {
        let mut reader = NsReader::from_reader(reader);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
        }
    }

    /// Next significant event. Declarations, comments and processing
    /// instructions are skipped, as is whitespace between elements.
    fn next(&mut self) -> Result<XmlEvent> {
        loop {
            self.buf.clear();
            let (resolved, event) = self.reader.read_resolved_event_into(&mut self.buf)?;
            let namespace = match resolved {
                ResolveResult::Bound(Namespace(ns)) => {
                    Some(String::from_utf8_lossy(ns).into_owned())
                }
                _ => None,
            };
            return Ok(match event {
                Event::Start(start) => XmlEvent::Start(StartTag::read(&start, namespace, false)?),
                Event::Empty(start) => XmlEvent::Start(StartTag::read(&start, namespace, true)?),
                Event::End(_) => XmlEvent::End,
                Event::Text(text) => {
                    let text = String::from_utf8_lossy(&text);
                    if text.trim().is_empty() {
                        continue;
                    }
                    XmlEvent::Text(text.trim().to_string())
                }
                Event::CData(data) => XmlEvent::Text(String::from_utf8_lossy(&data).into_owned()),
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => continue,
                Event::Eof => XmlEvent::Eof,
                _ => XmlEvent::Text("unexpected markup".to_string()),
            });
        }
    }

    /// The root element, which must be in the FHIR namespace.
    fn root(&mut self) -> Result<StartTag> {
        match self.next()? {
            XmlEvent::Start(tag) => {
                tag.check_namespace(&tag.name)?;
                Ok(tag)
            }
            XmlEvent::Text(text) => Err(unexpected(
                "Resource",
                None,
                format!("unexpected text `{}` before the root element", text),
            )),
            XmlEvent::End | XmlEvent::Eof => {
                Err(unexpected("Resource", None, "document has no root element"))
            }
        }
    }

    /// Errors on anything but the end of input after the root element.
    fn finish(&mut self) -> Result<()> {
        match self.next()? {
            XmlEvent::Eof => Ok(()),
            _ => Err(unexpected(
                "Resource",
                None,
                "trailing content after the root element",
            )),
        }
    }

    fn read_composite(&mut self, target: &mut dyn Composite, tag: StartTag) -> Result<()> {
        let type_name = target.type_info().name;
        for (name, value) in tag.attributes {
            match target.slot(&name) {
                Ok(Slot::Attribute(_)) if value.is_empty() => {
                    return Err(decode_error(
                        type_name,
                        Some(name.as_str()),
                        DecodeErrorKind::InvalidValue(
                            "empty string is not a valid value".to_string(),
                        ),
                    ));
                }
                Ok(Slot::Attribute(mut slot)) => slot.set(value),
                _ => {
                    return Err(decode_error(
                        type_name,
                        Some(name.as_str()),
                        DecodeErrorKind::UnknownAttribute,
                    ));
                }
            }
        }
        if tag.empty {
            return check_required(target);
        }

        let mut seen = HashSet::new();
        loop {
            match self.next()? {
                XmlEvent::End => return check_required(target),
                XmlEvent::Start(child) => {
                    child.check_namespace(type_name)?;
                    self.read_field(target, child, &mut seen)?;
                }
                XmlEvent::Text(text) => {
                    return Err(unexpected(type_name, None, format!("unexpected text `{}`", text)));
                }
                XmlEvent::Eof => return Err(unexpected(type_name, None, "unexpected end of document")),
            }
        }
    }

    /// Reads one child element of `target`. Single-valued fields may appear once.
    fn read_field(
        &mut self,
        target: &mut dyn Composite,
        tag: StartTag,
        seen: &mut HashSet<String>,
    ) -> Result<()> {
        let type_name = target.type_info().name;
        let name = tag.name.clone();
        let slot = target
            .slot(&name)
            .map_err(|err| DecodeError::from_slot(Format::Xml, type_name, &name, err))?;
        let single = matches!(slot, Slot::Primitive(_) | Slot::Composite(_) | Slot::Resource(_));
        if single && !seen.insert(name.clone()) {
            return Err(decode_error(
                type_name,
                Some(name.as_str()),
                DecodeErrorKind::DuplicateField,
            ));
        }

        match slot {
            Slot::Attribute(_) => Err(decode_error(
                type_name,
                Some(name.as_str()),
                DecodeErrorKind::UnknownField,
            )),
            Slot::Primitive(value) => self.read_primitive(value, tag),
            Slot::PrimitiveList(list) => self.read_primitive(list.push_default(), tag),
            Slot::Composite(value) => self.read_composite(value, tag),
            Slot::CompositeList(list) => self.read_composite(list.push_default(), tag),
            Slot::Resource(slot) => {
                *slot = Some(self.read_wrapped_resource(type_name, tag)?);
                Ok(())
            }
            Slot::ResourceList(list) => {
                let resource = self.read_wrapped_resource(type_name, tag)?;
                list.push(resource);
                Ok(())
            }
        }
    }

    /// `value` and `id` attributes, `extension` children, nothing else.
    fn read_primitive(&mut self, target: &mut dyn PrimitiveMut, tag: StartTag) -> Result<()> {
        let type_name = target.type_info().name;
        for (name, value) in tag.attributes {
            match name.as_str() {
                "value" => target.set_lexical(&value).map_err(|e| {
                    decode_error(
                        type_name,
                        Some("value"),
                        DecodeErrorKind::InvalidValue(e.to_string()),
                    )
                })?,
                "id" => target.set_element_id(value),
                _ => {
                    return Err(decode_error(
                        type_name,
                        Some(name.as_str()),
                        DecodeErrorKind::UnknownAttribute,
                    ));
                }
            }
        }
        if tag.empty {
            return Ok(());
        }

        loop {
            match self.next()? {
                XmlEvent::End => return Ok(()),
                XmlEvent::Start(child) => {
                    child.check_namespace(type_name)?;
                    if child.name != "extension" {
                        return Err(decode_error(
                            type_name,
                            Some(child.name.as_str()),
                            DecodeErrorKind::UnknownField,
                        ));
                    }
                    let extension = target.extensions_mut().push_default();
                    self.read_composite(extension, child)?;
                }
                XmlEvent::Text(text) => {
                    return Err(unexpected(type_name, None, format!("unexpected text `{}`", text)));
                }
                XmlEvent::Eof => return Err(unexpected(type_name, None, "unexpected end of document")),
            }
        }
    }

    /// `<contained><Patient>..</Patient></contained>`: a bare wrapper around exactly
    /// one resource element named by its type.
    fn read_wrapped_resource(&mut self, owner: &str, wrapper: StartTag) -> Result<ResourceEnvelope> {
        let field = wrapper.name.as_str();
        if let Some((name, _)) = wrapper.attributes.first() {
            return Err(decode_error(
                owner,
                Some(format!("{}@{}", field, name).as_str()),
                DecodeErrorKind::UnknownAttribute,
            ));
        }
        if wrapper.empty {
            return Err(decode_error(owner, Some(field), DecodeErrorKind::MissingResourceType));
        }

        let inner = match self.next()? {
            XmlEvent::Start(inner) => inner,
            XmlEvent::End => {
                return Err(decode_error(owner, Some(field), DecodeErrorKind::MissingResourceType));
            }
            XmlEvent::Text(text) => {
                return Err(unexpected(owner, Some(field), format!("unexpected text `{}`", text)));
            }
            XmlEvent::Eof => {
                return Err(unexpected(owner, Some(field), "unexpected end of document"));
            }
        };
        inner.check_namespace(owner)?;
        if !is_resource_name(&inner.name) {
            return Err(unexpected(
                owner,
                Some(field),
                format!("expected a resource element, found `{}`", inner.name),
            ));
        }
        let mut resource = instantiate(owner, Some(field), &inner.name)?;
        trace!(resource_type = %inner.name, owner, "Decoding resource");
        self.read_composite(&mut *resource, inner)?;

        match self.next()? {
            XmlEvent::End => Ok(ResourceEnvelope::from_boxed(resource)),
            _ => Err(unexpected(
                owner,
                Some(field),
                "a resource wrapper holds exactly one resource",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helios_fhir::prelude::*;

    #[test]
    fn test_value_and_id_attributes() {
        let name: HumanName = from_xml_str(
            r#"<HumanName xmlns="http://hl7.org/fhir"><family id="f1" value="Chalmers"/><given value="Peter"/><given id="g2"/></HumanName>"#,
        )
        .unwrap();
        let family = name.family.unwrap();
        assert_eq!(family.id.as_deref(), Some("f1"));
        assert_eq!(family.value.as_deref(), Some("Chalmers"));
        assert_eq!(name.given.len(), 2);
        assert!(name.given[1].value.is_none());
        assert_eq!(name.given[1].id.as_deref(), Some("g2"));
    }

    #[test]
    fn test_namespace_is_required() {
        let err = from_xml_str::<Patient>(r#"<Patient><id value="x"/></Patient>"#).unwrap_err();
        assert_eq!(err.decode_kind(), Some(&DecodeErrorKind::WrongNamespace(None)));

        let err = from_xml_str::<Patient>(
            r#"<Patient xmlns="http://hl7.org/fhir"><id xmlns="urn:other" value="x"/></Patient>"#,
        )
        .unwrap_err();
        assert_eq!(
            err.decode_kind(),
            Some(&DecodeErrorKind::WrongNamespace(Some("urn:other".to_string())))
        );
    }

    #[test]
    fn test_repeated_single_field_is_rejected() {
        let err = from_xml_str::<Patient>(
            r#"<Patient xmlns="http://hl7.org/fhir"><active value="true"/><active value="false"/></Patient>"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "XML decode error: Patient.active: duplicate field");
    }

    #[test]
    fn test_text_content_is_rejected() {
        let err = from_xml_str::<Patient>(
            r#"<Patient xmlns="http://hl7.org/fhir"><active value="true"/>stray</Patient>"#,
        )
        .unwrap_err();
        assert!(matches!(
            err.decode_kind(),
            Some(DecodeErrorKind::UnexpectedContent(_))
        ));
    }
}
