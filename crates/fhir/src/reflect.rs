//! Reflective traversal and comparison over [`Field`] views.
//!
//! Nothing here knows a concrete type: everything is driven by what
//! [`Composite::fields`] reports.

use crate::element::{Composite, Field, FieldValue, Node};
use crate::primitive::PrimitiveNode;
use helios_fhirpath_support::TypeInfo;

/// Comparison semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Everything, ids and extensions included.
    Equal,
    /// Every `id` is skipped, at every depth.
    Equivalent,
}

/// Present child values of the selected fields, in schema order.
pub fn children<'a>(fields: Vec<Field<'a>>, names: Option<&[&str]>) -> Vec<Node<'a>> {
    fields
        .into_iter()
        .filter(|field| names.is_none_or(|names| names.iter().any(|name| field.matches(name))))
        .flat_map(Field::into_nodes)
        .collect()
}

/// Compares two composites. `None` when their types differ.
pub fn compare(left: &dyn Composite, right: &dyn Composite, mode: Comparison) -> Option<bool> {
    compare_fields(left.type_info(), left.fields(), right, mode)
}

/// Compares a composite, given as its descriptor and fields, with `other`.
pub fn compare_fields(
    info: &TypeInfo,
    fields: Vec<Field<'_>>,
    other: &dyn Composite,
    mode: Comparison,
) -> Option<bool> {
    if info.name != other.type_info().name {
        return None;
    }
    Some(fields_match(&fields, &other.fields(), mode))
}

fn fields_match(left: &[Field<'_>], right: &[Field<'_>], mode: Comparison) -> bool {
    left.len() == right.len()
        && left.iter().zip(right).all(|(l, r)| {
            l.name == r.name
                && ((mode == Comparison::Equivalent && l.name == "id")
                    || values_match(&l.value, &r.value, mode))
        })
}

fn present<'a>(node: &Option<Node<'a>>) -> Option<Node<'a>> {
    node.filter(Node::is_present)
}

fn values_match(left: &FieldValue<'_>, right: &FieldValue<'_>, mode: Comparison) -> bool {
    match (left, right) {
        (FieldValue::Attribute(l), FieldValue::Attribute(r)) => l == r,
        (FieldValue::Single(l), FieldValue::Single(r)) => match (present(l), present(r)) {
            (None, None) => true,
            (Some(l), Some(r)) => nodes_match(l, r, mode),
            _ => false,
        },
        (FieldValue::List(l), FieldValue::List(r)) => {
            let l: Vec<_> = l.iter().copied().filter(Node::is_present).collect();
            let r: Vec<_> = r.iter().copied().filter(Node::is_present).collect();
            l.len() == r.len() && l.iter().zip(&r).all(|(l, r)| nodes_match(*l, *r, mode))
        }
        (FieldValue::Choice(l), FieldValue::Choice(r)) => {
            let l = l.filter(|(_, node)| node.is_present());
            let r = r.filter(|(_, node)| node.is_present());
            match (l, r) {
                (None, None) => true,
                (Some((ls, l)), Some((rs, r))) => ls == rs && nodes_match(l, r, mode),
                _ => false,
            }
        }
        _ => false,
    }
}

fn nodes_match(left: Node<'_>, right: Node<'_>, mode: Comparison) -> bool {
    match (left, right) {
        (Node::Text(l), Node::Text(r)) => l == r,
        (Node::Primitive(l), Node::Primitive(r)) => primitives_match(l, r, mode),
        (Node::Composite(l), Node::Composite(r)) => compare(l, r, mode) == Some(true),
        (Node::Resource(l), Node::Resource(r)) => compare(l, r, mode) == Some(true),
        _ => false,
    }
}

fn primitives_match(left: &dyn PrimitiveNode, right: &dyn PrimitiveNode, mode: Comparison) -> bool {
    let ids_match = mode == Comparison::Equivalent || left.element_id() == right.element_id();
    let extensions = (left.extensions(), right.extensions());
    ids_match
        && left.has_value() == right.has_value()
        && (!left.has_value() || left.value_equals(right))
        && extensions.0.len() == extensions.1.len()
        && extensions
            .0
            .iter()
            .zip(extensions.1)
            .all(|(l, r)| compare(l, r, mode) == Some(true))
}
