//! Merging of parameter databases
//!
//! Appending is a shallow, top-level override: each top-level entry of the
//! incoming tree replaces the entry of the same name in the base tree, at the
//! base entry's position, and new names are added at the end in the incoming
//! tree's order. Nested guard structures are never merged.

use tracing::debug;

use crate::error::{ParamGenError, Result};
use crate::guard::{classify, GroupKind};
use crate::tree::Group;

fn require_names(tree: &Group, role: &str) -> Result<()> {
    match classify(tree).map_err(|e| e.at("/"))? {
        GroupKind::Names => Ok(()),
        GroupKind::Guards => Err(ParamGenError::structural(format!(
            "cannot append: the {} tree has guard-typed top-level keys",
            role
        ))
        .at("/")),
    }
}

/// Merge `incoming` into `base` in place.
///
/// Both trees must be name-typed at the top level; otherwise a structural
/// error is returned and `base` is left untouched.
///
/// # Examples
///
/// ```
/// use paramgen_rs::append::append;
/// use paramgen_rs::tree::Group;
///
/// let mut base: Group = serde_json::from_str(r#"{"a": 1, "b": 2}"#).unwrap();
/// let incoming: Group = serde_json::from_str(r#"{"b": 3, "c": 4}"#).unwrap();
/// append(&mut base, &incoming).unwrap();
///
/// assert_eq!(serde_json::to_string(&base).unwrap(), r#"{"a":1,"b":3,"c":4}"#);
/// ```
pub fn append(base: &mut Group, incoming: &Group) -> Result<()> {
    require_names(base, "base")?;
    require_names(incoming, "incoming")?;

    for (name, node) in incoming {
        if base.insert(name.clone(), node.clone()).is_some() {
            debug!(name = name.as_str(), "appended entry overrides existing entry");
        }
    }

    Ok(())
}

/// Merge two trees into a new one, leaving both inputs untouched
pub fn appended(base: &Group, incoming: &Group) -> Result<Group> {
    let mut merged = base.clone();
    append(&mut merged, incoming)?;
    Ok(merged)
}
