//! Static type descriptors.
//!
//! Every FHIR type in the model publishes a `static` [`TypeInfo`] describing its
//! elements. The FHIRPath evaluator uses these descriptors for schema introspection
//! (`ofType`, `is`, `as`, member resolution) without touching the host language's
//! type system.

/// Namespace used for all FHIR model types.
pub const FHIR_TYPE_NAMESPACE: &str = "FHIR";

/// Broad category of a FHIR type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A primitive (`string`, `boolean`, `date`, ...).
    Primitive,
    /// A complex data type or backbone element.
    Complex,
    /// A resource, carrying a `resourceType` discriminant on the wire.
    Resource,
}

/// Upper bound of an element's cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// At most one value (`0..1` or `1..1`).
    Single,
    /// Any number of values (`0..*` or `1..*`).
    Many,
}

/// How an element is represented in the XML wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    /// A child element named after the field.
    Element,
    /// An attribute on the owning element (`id`, `Extension.url`).
    Attribute,
}

/// Description of one element (field) of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementInfo {
    /// Base name as declared by the schema (`value` for `value[x]`).
    pub name: &'static str,
    /// Declared type names. More than one entry marks a choice element.
    pub types: &'static [&'static str],
    /// Lower bound of the cardinality.
    pub min: u32,
    /// Upper bound of the cardinality.
    pub max: Cardinality,
    /// XML representation.
    pub representation: Representation,
}

impl ElementInfo {
    /// An optional single-valued element.
    pub const fn single(name: &'static str, types: &'static [&'static str]) -> Self {
        Self {
            name,
            types,
            min: 0,
            max: Cardinality::Single,
            representation: Representation::Element,
        }
    }

    /// A mandatory single-valued element.
    pub const fn required(name: &'static str, types: &'static [&'static str]) -> Self {
        Self {
            name,
            types,
            min: 1,
            max: Cardinality::Single,
            representation: Representation::Element,
        }
    }

    /// A repeating element.
    pub const fn list(name: &'static str, types: &'static [&'static str]) -> Self {
        Self {
            name,
            types,
            min: 0,
            max: Cardinality::Many,
            representation: Representation::Element,
        }
    }

    /// A string carried as an XML attribute.
    pub const fn attribute(name: &'static str, min: u32) -> Self {
        Self {
            name,
            types: &["string"],
            min,
            max: Cardinality::Single,
            representation: Representation::Attribute,
        }
    }

    /// True for polymorphic `[x]` elements.
    pub fn is_choice(&self) -> bool {
        self.types.len() > 1
    }

    /// True for repeating elements.
    pub fn is_list(&self) -> bool {
        self.max == Cardinality::Many
    }

    /// Resolves a wire name (`valueQuantity`) against this element, returning the
    /// declared type it selects. Non-choice elements only match their own name.
    pub fn resolve_wire_name(&self, wire_name: &str) -> Option<&'static str> {
        if !self.is_choice() {
            return if wire_name == self.name {
                self.types.first().copied()
            } else {
                None
            };
        }
        let suffix = wire_name.strip_prefix(self.name)?;
        self.types
            .iter()
            .copied()
            .find(|ty| type_suffix_matches(ty, suffix))
    }
}

fn type_suffix_matches(type_name: &str, suffix: &str) -> bool {
    let mut expected = type_name.chars();
    let mut actual = suffix.chars();
    match (expected.next(), actual.next()) {
        (Some(e), Some(a)) if e.to_ascii_uppercase() == a => expected.eq(actual),
        _ => false,
    }
}

/// Static descriptor of a FHIR type.
#[derive(Debug, PartialEq, Eq)]
pub struct TypeInfo {
    /// Type namespace, always [`FHIR_TYPE_NAMESPACE`] for model types.
    pub namespace: &'static str,
    /// FHIR type name (`Patient`, `Quantity`, `dateTime`).
    pub name: &'static str,
    /// Broad category.
    pub kind: TypeKind,
    /// Parent type in the FHIR type hierarchy.
    pub base: Option<&'static TypeInfo>,
    /// Elements in schema order, inherited ones included.
    pub elements: &'static [ElementInfo],
}

impl TypeInfo {
    /// `FHIR.Patient` style qualified name.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    /// Looks up an element by its declared base name.
    pub fn element(&self, name: &str) -> Option<&'static ElementInfo> {
        self.elements.iter().find(|element| element.name == name)
    }

    /// Looks up an element by a wire name, resolving choice suffixes.
    /// Returns the element and the concrete type the name selects.
    pub fn element_for_wire_name(
        &self,
        wire_name: &str,
    ) -> Option<(&'static ElementInfo, &'static str)> {
        self.elements.iter().find_map(|element| {
            element
                .resolve_wire_name(wire_name)
                .map(|ty| (element, ty))
        })
    }

    /// True when this type is `name` or derives from it.
    pub fn is_subtype_of(&self, name: &str) -> bool {
        let mut current = Some(self);
        while let Some(info) = current {
            if info.name == name {
                return true;
            }
            current = info.base;
        }
        false
    }

    /// True for resource types.
    pub fn is_resource(&self) -> bool {
        self.kind == TypeKind::Resource
    }
}
