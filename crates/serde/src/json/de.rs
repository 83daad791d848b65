//! FHIR JSON decoding.
//!
//! Decoding drives `serde_json::Deserializer` with `DeserializeSeed`s that write
//! straight into the target through [`Composite::slot`]. Nothing is buffered
//! beyond a single primitive value.
//!
//! Structural failures raised inside serde are recorded in a `DecodeContext` so
//! the caller gets a [`DecodeError`] rather than serde_json's message text.

use crate::convert::Format;
use crate::error::{DecodeError, DecodeErrorKind, Result, SerdeError};
use helios_fhir::{
    Composite, CompositeListSlot, PrimitiveListSlot, PrimitiveMut, Resource,
    ResourceEnvelope, Slot, TypeKind, registry,
};
use serde::Deserialize;
use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::Value as JsonValue;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use tracing::trace;

/// Deserialize a FHIR value from a JSON string.
///
/// # Examples
///
/// ```rust
/// use helios_fhir::prelude::*;
/// use helios_serde::json::from_json_str;
///
/// let json = r#"{"resourceType": "Patient", "id": "example", "active": true}"#;
/// let patient: Patient = from_json_str(json).unwrap();
/// assert_eq!(patient.resource_id(), Some("example"));
/// ```
pub fn from_json_str<T: Composite + Default>(s: &str) -> Result<T> {
    decode_into(&mut serde_json::Deserializer::from_str(s))
}

/// Deserialize a FHIR value from JSON bytes.
pub fn from_json_slice<T: Composite + Default>(v: &[u8]) -> Result<T> {
    decode_into(&mut serde_json::Deserializer::from_slice(v))
}

/// Deserialize a FHIR value from a JSON reader.
pub fn from_json_reader<R: Read, T: Composite + Default>(reader: R) -> Result<T> {
    decode_into(&mut serde_json::Deserializer::from_reader(reader))
}

/// Deserialize whichever resource the `resourceType` key names.
///
/// # Examples
///
/// ```rust
/// use helios_fhir::prelude::*;
/// use helios_serde::json::resource_from_json_str;
///
/// let resource = resource_from_json_str(r#"{"resourceType": "Organization", "name": "ACME"}"#)
///     .unwrap();
/// assert_eq!(resource.resource_type(), "Organization");
/// let organization = resource.downcast_ref::<Organization>().unwrap();
/// assert_eq!(organization.name.as_ref().and_then(|n| n.value.as_deref()), Some("ACME"));
/// ```
pub fn resource_from_json_str(s: &str) -> Result<ResourceEnvelope> {
    decode_resource(&mut serde_json::Deserializer::from_str(s))
}

pub fn resource_from_json_slice(v: &[u8]) -> Result<ResourceEnvelope> {
    decode_resource(&mut serde_json::Deserializer::from_slice(v))
}

pub fn resource_from_json_reader<R: Read>(reader: R) -> Result<ResourceEnvelope> {
    decode_resource(&mut serde_json::Deserializer::from_reader(reader))
}

fn decode_into<'de, R, T>(de: &mut serde_json::Deserializer<R>) -> Result<T>
where
    R: serde_json::de::Read<'de>,
    T: Composite + Default,
{
    let ctx = DecodeContext::default();
    let mut value = T::default();
    let site = Site::root(value.type_info().name);
    let result = CompositeSeed {
        target: &mut value,
        ctx: &ctx,
        site,
    }
    .deserialize(&mut *de)
    .and_then(|()| de.end());
    ctx.finish(result)?;
    Ok(value)
}

fn decode_resource<'de, R>(de: &mut serde_json::Deserializer<R>) -> Result<ResourceEnvelope>
where
    R: serde_json::de::Read<'de>,
{
    let ctx = DecodeContext::default();
    let result = ResourceSeed {
        ctx: &ctx,
        site: Site::root("Resource"),
    }
    .deserialize(&mut *de)
    .and_then(|resource| {
        de.end()?;
        Ok(resource)
    });
    Ok(ResourceEnvelope::from_boxed(ctx.finish(result)?))
}

/// Holds the first structural error of a decode.
#[derive(Default)]
struct DecodeContext {
    error: RefCell<Option<DecodeError>>,
}

impl DecodeContext {
    /// Records `err` and returns the serde error that aborts the decode.
    fn fail<E: de::Error>(&self, err: DecodeError) -> E {
        let message = err.to_string();
        let mut slot = self.error.borrow_mut();
        if slot.is_none() {
            *slot = Some(err);
        }
        E::custom(message)
    }

    fn finish<T>(&self, result: serde_json::Result<T>) -> Result<T> {
        result.map_err(|e| match self.error.borrow_mut().take() {
            Some(decode) => SerdeError::Decode(decode),
            None => SerdeError::Json(e),
        })
    }
}

/// Where in the document a seed is reading: the owning type and the wire key.
#[derive(Debug, Clone, Copy)]
struct Site<'a> {
    type_name: &'static str,
    field: Option<&'a str>,
}

impl<'a> Site<'a> {
    fn root(type_name: &'static str) -> Self {
        Self {
            type_name,
            field: None,
        }
    }

    fn new(type_name: &'static str, field: &'a str) -> Self {
        Self {
            type_name,
            field: Some(field),
        }
    }

    fn error(&self, kind: DecodeErrorKind) -> DecodeError {
        let err = DecodeError::new(Format::Json, self.type_name, kind);
        match self.field {
            Some(field) => err.at(field),
            None => err,
        }
    }

    fn empty(&self) -> DecodeError {
        self.error(DecodeErrorKind::InvalidValue(
            "empty string is not a valid value".to_string(),
        ))
    }

    fn null(&self) -> DecodeError {
        self.error(DecodeErrorKind::InvalidValue(
            "null is not allowed here".to_string(),
        ))
    }
}

/// Reads the leading `resourceType` entry of a resource object.
fn read_resource_type<'de, A: MapAccess<'de>>(
    map: &mut A,
    ctx: &DecodeContext,
    site: Site<'_>,
) -> std::result::Result<String, A::Error> {
    match map.next_key::<String>()? {
        Some(key) if key == "resourceType" => {}
        _ => return Err(ctx.fail(site.error(DecodeErrorKind::MissingResourceType))),
    }
    match map.next_value::<Option<String>>()? {
        Some(name) => Ok(name),
        None => Err(ctx.fail(site.error(DecodeErrorKind::MissingResourceType))),
    }
}

/// Reads the remaining entries of an object into `target`.
fn read_fields<'de, A: MapAccess<'de>>(
    map: &mut A,
    target: &mut dyn Composite,
    ctx: &DecodeContext,
    mut seen: HashSet<String>,
) -> std::result::Result<(), A::Error> {
    let type_name = target.type_info().name;
    while let Some(key) = map.next_key::<String>()? {
        let site = Site::new(type_name, &key);
        if !seen.insert(key.clone()) {
            return Err(ctx.fail(site.error(DecodeErrorKind::DuplicateField)));
        }

        if let Some(base) = key.strip_prefix('_') {
            match target.slot(base) {
                Ok(Slot::Primitive(target)) => {
                    map.next_value_seed(PrimitiveMetaSeed { target, ctx, site })?
                }
                Ok(Slot::PrimitiveList(list)) => map.next_value_seed(PrimitiveListSeed {
                    list,
                    shadow: true,
                    ctx,
                    site,
                })?,
                // `_key` only ever shadows a primitive
                Ok(_) => return Err(ctx.fail(site.error(DecodeErrorKind::UnknownField))),
                Err(err) => {
                    return Err(ctx.fail(DecodeError::from_slot(Format::Json, type_name, &key, err)));
                }
            }
            continue;
        }

        match target.slot(&key) {
            Err(err) => {
                return Err(ctx.fail(DecodeError::from_slot(Format::Json, type_name, &key, err)));
            }
            Ok(Slot::Attribute(mut attribute)) => match map.next_value::<Option<String>>()? {
                Some(value) if value.is_empty() => return Err(ctx.fail(site.empty())),
                Some(value) => attribute.set(value),
                None => return Err(ctx.fail(site.null())),
            },
            Ok(Slot::Primitive(target)) => {
                map.next_value_seed(PrimitiveValueSeed { target, ctx, site })?
            }
            Ok(Slot::PrimitiveList(list)) => map.next_value_seed(PrimitiveListSeed {
                list,
                shadow: false,
                ctx,
                site,
            })?,
            Ok(Slot::Composite(target)) => {
                map.next_value_seed(CompositeSeed { target, ctx, site })?
            }
            Ok(Slot::CompositeList(list)) => {
                map.next_value_seed(CompositeListSeed { list, ctx, site })?
            }
            Ok(Slot::Resource(slot)) => {
                let resource = map.next_value_seed(ResourceSeed { ctx, site })?;
                *slot = Some(ResourceEnvelope::from_boxed(resource));
            }
            Ok(Slot::ResourceList(list)) => {
                map.next_value_seed(ResourceListSeed { list, ctx, site })?
            }
        }
    }
    if let Some(name) = target.missing_attribute() {
        return Err(ctx.fail(Site::new(type_name, name).error(DecodeErrorKind::MissingField)));
    }
    Ok(())
}

/// Decodes an object into an existing composite.
struct CompositeSeed<'a> {
    target: &'a mut dyn Composite,
    ctx: &'a DecodeContext,
    site: Site<'a>,
}

impl<'de> DeserializeSeed<'de> for CompositeSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for CompositeSeed<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a FHIR {} object", self.target.type_info().name)
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<(), E> {
        Err(self.ctx.fail(self.site.null()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<(), A::Error> {
        let info = self.target.type_info();
        let mut seen = HashSet::new();
        if info.kind == TypeKind::Resource {
            let found = read_resource_type(&mut map, self.ctx, Site::root(info.name))?;
            if found != info.name {
                return Err(self.ctx.fail(Site::root(info.name).error(
                    DecodeErrorKind::ResourceTypeMismatch {
                        expected: info.name,
                        found,
                    },
                )));
            }
            seen.insert("resourceType".to_string());
        }
        read_fields(&mut map, self.target, self.ctx, seen)
    }
}

/// Decodes a `resourceType`-tagged object into a freshly instantiated resource.
struct ResourceSeed<'a> {
    ctx: &'a DecodeContext,
    site: Site<'a>,
}

impl<'de> DeserializeSeed<'de> for ResourceSeed<'_> {
    type Value = Box<dyn Resource>;

    fn deserialize<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> std::result::Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for ResourceSeed<'_> {
    type Value = Box<dyn Resource>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a FHIR resource object")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Err(self.ctx.fail(self.site.null()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
        let found = read_resource_type(&mut map, self.ctx, self.site)?;
        let Some(mut resource) = registry::instantiate(&found) else {
            return Err(self
                .ctx
                .fail(self.site.error(DecodeErrorKind::UnknownResourceType(found))));
        };
        trace!(resource_type = %found, owner = self.site.type_name, "Decoding resource");
        let mut seen = HashSet::new();
        seen.insert("resourceType".to_string());
        read_fields(&mut map, &mut *resource, self.ctx, seen)?;
        Ok(resource)
    }
}

struct ResourceListSeed<'a> {
    list: &'a mut Vec<ResourceEnvelope>,
    ctx: &'a DecodeContext,
    site: Site<'a>,
}

impl<'de> DeserializeSeed<'de> for ResourceListSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for ResourceListSeed<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of FHIR resources")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<(), E> {
        Err(self.ctx.fail(self.site.null()))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<(), A::Error> {
        let ResourceListSeed { list, ctx, site } = self;
        while let Some(resource) = seq.next_element_seed(ResourceSeed { ctx, site })? {
            list.push(ResourceEnvelope::from_boxed(resource));
        }
        Ok(())
    }
}

struct CompositeListSeed<'a> {
    list: &'a mut dyn CompositeListSlot,
    ctx: &'a DecodeContext,
    site: Site<'a>,
}

impl<'de> DeserializeSeed<'de> for CompositeListSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for CompositeListSeed<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of FHIR objects")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<(), E> {
        Err(self.ctx.fail(self.site.null()))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<(), A::Error> {
        let list = self.list;
        while seq
            .next_element_seed(CompositeItemSeed {
                list: &mut *list,
                ctx: self.ctx,
                site: self.site,
            })?
            .is_some()
        {}
        Ok(())
    }
}

/// One array element: appended only once the element is known to exist.
struct CompositeItemSeed<'a> {
    list: &'a mut dyn CompositeListSlot,
    ctx: &'a DecodeContext,
    site: Site<'a>,
}

impl<'de> DeserializeSeed<'de> for CompositeItemSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<(), D::Error> {
        CompositeSeed {
            target: self.list.push_default(),
            ctx: self.ctx,
            site: self.site,
        }
        .deserialize(deserializer)
    }
}

/// The value of a single primitive key.
struct PrimitiveValueSeed<'a> {
    target: &'a mut dyn PrimitiveMut,
    ctx: &'a DecodeContext,
    site: Site<'a>,
}

impl<'de> DeserializeSeed<'de> for PrimitiveValueSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<(), D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        if value.is_null() {
            return Err(self.ctx.fail(self.site.null()));
        }
        self.target.set_json(&value).map_err(|e| {
            self.ctx
                .fail(self.site.error(DecodeErrorKind::InvalidValue(e.to_string())))
        })
    }
}

/// The `_key` object of a primitive: `id` and `extension` only.
struct PrimitiveMetaSeed<'a> {
    target: &'a mut dyn PrimitiveMut,
    ctx: &'a DecodeContext,
    site: Site<'a>,
}

impl<'de> DeserializeSeed<'de> for PrimitiveMetaSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for PrimitiveMetaSeed<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object with `id` and `extension`")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<(), E> {
        Err(self.ctx.fail(self.site.null()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<(), A::Error> {
        let type_name = self.target.type_info().name;
        let mut seen = HashSet::new();
        while let Some(key) = map.next_key::<String>()? {
            let site = Site::new(type_name, &key);
            if !seen.insert(key.clone()) {
                return Err(self.ctx.fail(site.error(DecodeErrorKind::DuplicateField)));
            }
            match key.as_str() {
                "id" => match map.next_value::<Option<String>>()? {
                    Some(id) => self.target.set_element_id(id),
                    None => return Err(self.ctx.fail(site.null())),
                },
                "extension" => map.next_value_seed(CompositeListSeed {
                    list: self.target.extensions_mut(),
                    ctx: self.ctx,
                    site,
                })?,
                _ => return Err(self.ctx.fail(site.error(DecodeErrorKind::UnknownField))),
            }
        }
        Ok(())
    }
}

/// One of the two parallel arrays of a primitive list.
struct PrimitiveListSeed<'a> {
    list: &'a mut dyn PrimitiveListSlot,
    /// The `_key` array rather than the value array.
    shadow: bool,
    ctx: &'a DecodeContext,
    site: Site<'a>,
}

impl<'de> DeserializeSeed<'de> for PrimitiveListSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for PrimitiveListSeed<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<(), E> {
        Err(self.ctx.fail(self.site.null()))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<(), A::Error> {
        let list = self.list;
        let mut index = 0;
        while seq
            .next_element_seed(AlignedSeed {
                list: &mut *list,
                index,
                shadow: self.shadow,
                ctx: self.ctx,
                site: self.site,
            })?
            .is_some()
        {
            index += 1;
        }
        Ok(())
    }
}

/// Position `index` of a primitive list. The list grows to cover the position,
/// so whichever of the two arrays is longer decides the final length.
struct AlignedSeed<'a> {
    list: &'a mut dyn PrimitiveListSlot,
    index: usize,
    shadow: bool,
    ctx: &'a DecodeContext,
    site: Site<'a>,
}

impl<'de> DeserializeSeed<'de> for AlignedSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<(), D::Error> {
        let AlignedSeed {
            list,
            index,
            shadow,
            ctx,
            site,
        } = self;
        list.ensure_len(index + 1);
        let Some(target) = list.item_mut(index) else {
            return Err(ctx.fail(site.error(DecodeErrorKind::UnexpectedContent(format!(
                "list position {} out of range",
                index
            )))));
        };

        if shadow {
            return deserializer.deserialize_option(OptionalMetaSeed { target, ctx, site });
        }
        let value = JsonValue::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(());
        }
        target
            .set_json(&value)
            .map_err(|e| ctx.fail(site.error(DecodeErrorKind::InvalidValue(e.to_string()))))
    }
}

/// A `_key` array entry: `null` or a shadow object.
struct OptionalMetaSeed<'a> {
    target: &'a mut dyn PrimitiveMut,
    ctx: &'a DecodeContext,
    site: Site<'a>,
}

impl<'de> Visitor<'de> for OptionalMetaSeed<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("null or an object with `id` and `extension`")
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<(), D::Error> {
        PrimitiveMetaSeed {
            target: self.target,
            ctx: self.ctx,
            site: self.site,
        }
        .deserialize(deserializer)
    }
}
