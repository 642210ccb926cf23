//! Tree nodes and groups
//!
//! A [`Node`] is either a scalar leaf or a [`Group`], an insertion-ordered map
//! from keys to nodes. Keys are parameter names or guard expressions; which
//! one is decided per group during reduction (see [`crate::guard`]).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::scalar::Scalar;

/// An ordered mapping from keys to nodes
///
/// Insertion order is significant: it is the document order used to break
/// ties between guards and to lay out appended entries.
pub type Group = IndexMap<String, Node>;

/// The recursive unit of the parameter tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// A typed leaf value or formula
    Scalar(Scalar),

    /// A nested mapping
    Group(Group),
}

impl Node {
    /// The typed absence value
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    /// Check whether this node is the typed absence value
    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(Scalar::Null))
    }

    /// Get the scalar, if this node is a leaf
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(scalar) => Some(scalar),
            Node::Group(_) => None,
        }
    }

    /// Get the group, if this node is one
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Node::Group(group) => Some(group),
            Node::Scalar(_) => None,
        }
    }

    /// Get a mutable reference to the group, if this node is one
    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Node::Group(group) => Some(group),
            Node::Scalar(_) => None,
        }
    }

    /// Follow a `/`-separated path of keys from this node
    ///
    /// # Examples
    ///
    /// ```
    /// use paramgen_rs::tree::{Node, Scalar};
    ///
    /// let node: Node = serde_json::from_str(r#"{"ice": {"ice_ic": "b.nc"}}"#).unwrap();
    /// assert_eq!(
    ///     node.lookup("ice/ice_ic").and_then(Node::as_scalar),
    ///     Some(&Scalar::from("b.nc"))
    /// );
    /// assert!(node.lookup("ice/missing").is_none());
    /// ```
    pub fn lookup(&self, path: &str) -> Option<&Node> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| node.as_group()?.get(segment))
    }
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Node::Scalar(value)
    }
}

impl From<Group> for Node {
    fn from(value: Group) -> Self {
        Node::Group(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Scalar(value.into())
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Scalar(value.into())
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::Scalar(value.into())
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Scalar(value.into())
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Scalar(value.into())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Scalar(value.into())
    }
}
