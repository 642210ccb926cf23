//! Translation of attribute-based value selection into guards
//!
//! XML parameter definitions select among several `<value>` elements by
//! attributes, e.g. `<value ice_grid="gx1v6" phys="cam6">`. Each alternative
//! becomes one guard in which every attribute condition must hold:
//! `$ice_grid == "gx1v6" and $phys == "cam6"`. An alternative without
//! attributes is the default and becomes `else`.

use tracing::trace;

use crate::expand::quote;
use crate::guard::ELSE;
use crate::tree::{Group, Node};

/// Build the guard for a set of attribute conditions
///
/// # Examples
///
/// ```
/// use paramgen_rs::attributes::attribute_guard;
///
/// assert_eq!(
///     attribute_guard(&[("ice_grid", "gx1v6"), ("phys", "cam6")]),
///     "$ice_grid == \"gx1v6\" and $phys == \"cam6\""
/// );
/// assert_eq!(attribute_guard(&[]), "else");
/// ```
pub fn attribute_guard(attributes: &[(&str, &str)]) -> String {
    if attributes.is_empty() {
        return ELSE.to_string();
    }

    attributes
        .iter()
        .map(|(attr, value)| format!("${} == {}", attr, quote(value)))
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Accumulates the alternative values of one parameter in document order
/// and produces the guard-typed group for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueAlternatives {
    alternatives: Group,
}

impl ValueAlternatives {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an alternative selected by attribute conditions
    pub fn add(&mut self, attributes: &[(&str, &str)], value: impl Into<Node>) -> &mut Self {
        self.add_guarded(&attribute_guard(attributes), value)
    }

    /// Add an alternative selected by an explicit guard expression.
    ///
    /// If the same guard was added before, its value is replaced in place.
    pub fn add_guarded(&mut self, guard: &str, value: impl Into<Node>) -> &mut Self {
        trace!(guard, "adding value alternative");
        self.alternatives.insert(guard.to_string(), value.into());
        self
    }

    /// Builder-style variant of [`ValueAlternatives::add`]
    pub fn with(mut self, attributes: &[(&str, &str)], value: impl Into<Node>) -> Self {
        self.add(attributes, value);
        self
    }

    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// The guard-typed group of all alternatives
    pub fn into_group(self) -> Group {
        self.alternatives
    }

    /// The alternatives as a tree node; no alternatives yields null
    pub fn into_node(self) -> Node {
        if self.alternatives.is_empty() {
            Node::null()
        } else {
            Node::Group(self.alternatives)
        }
    }
}
