//! Tree reduction
//!
//! Reduction walks a canonical tree depth-first in document order and
//! produces a new tree in which every guard-typed group has been replaced by
//! its selected branch (or by [`Scalar::Null`] when nothing matched), every
//! key has been expanded, every string value has been expanded and every
//! formula has been evaluated. The input tree is never modified.

use tracing::{debug, trace};

use crate::config::MatchPolicy;
use crate::environment::Environment;
use crate::error::{ParamGenError, Result};
use crate::expand::{expand_text, expand_value};
use crate::formula::evaluate_formula;
use crate::guard::{classify, is_guard_key, join_path, select, GroupKind};
use crate::tree::{formula_body, Group, Node, Scalar};

/// Display form of a document path; the root is shown as `/`
fn location(path: &str) -> &str {
    if path.is_empty() {
        "/"
    } else {
        path
    }
}

/// Reduce a whole document.
///
/// The root must reduce to a group: a guard-typed root whose selected branch
/// is a scalar, or that selects nothing, is a structural error.
///
/// # Examples
///
/// ```
/// use paramgen_rs::config::MatchPolicy;
/// use paramgen_rs::environment::SimpleEnvironment;
/// use paramgen_rs::reduce::reduce;
/// use paramgen_rs::tree::{Group, Scalar};
///
/// let tree: Group = serde_json::from_str(
///     r#"{"ice_ic": {"$GRID == \"gx1v6\"": "gx1.nc", "else": "default.nc"}}"#,
/// ).unwrap();
/// let env = SimpleEnvironment::new().with("GRID", "gx1v6");
///
/// let reduced = reduce(&tree, &env, MatchPolicy::Last).unwrap();
/// assert_eq!(reduced["ice_ic"].as_scalar(), Some(&Scalar::from("gx1.nc")));
/// ```
pub fn reduce<E: Environment + ?Sized>(tree: &Group, env: &E, policy: MatchPolicy) -> Result<Group> {
    debug!(entries = tree.len(), %policy, "reducing tree");

    match reduce_group(tree, env, policy, "")? {
        Node::Group(reduced) => {
            debug!(entries = reduced.len(), "reduced tree");
            Ok(reduced)
        }
        Node::Scalar(scalar) => Err(ParamGenError::structural(format!(
            "root reduced to the scalar '{}', expected a group",
            scalar
        ))
        .at(location(""))),
    }
}

/// Reduce one node found at `path`
pub fn reduce_node<E: Environment + ?Sized>(
    node: &Node,
    env: &E,
    policy: MatchPolicy,
    path: &str,
) -> Result<Node> {
    match node {
        Node::Scalar(scalar) => reduce_scalar(scalar, env)
            .map(Node::Scalar)
            .map_err(|e| e.at(location(path))),
        Node::Group(group) => reduce_group(group, env, policy, path),
    }
}

/// Reduce a leaf value: formulas are evaluated, strings are expanded and all
/// other scalars are returned unchanged
pub fn reduce_scalar<E: Environment + ?Sized>(scalar: &Scalar, env: &E) -> Result<Scalar> {
    match scalar {
        Scalar::Formula(text) => match formula_body(text) {
            Some(body) => evaluate_formula(body, env),
            None => Ok(Scalar::String(text.clone())),
        },
        Scalar::String(text) => expand_value(text, env),
        other => Ok(other.clone()),
    }
}

fn reduce_group<E: Environment + ?Sized>(
    group: &Group,
    env: &E,
    policy: MatchPolicy,
    path: &str,
) -> Result<Node> {
    match classify(group).map_err(|e| e.at(location(path)))? {
        GroupKind::Names => {
            let mut reduced = Group::with_capacity(group.len());

            for (key, child) in group {
                let name = expand_text(key, env).map_err(|e| e.at(&join_path(path, key)))?;
                let child_path = join_path(path, &name);
                if is_guard_key(&name) {
                    return Err(ParamGenError::structural(format!(
                        "key '{}' expands to '{}', which is not a valid name",
                        key, name
                    ))
                    .at(&child_path));
                }
                if reduced.contains_key(&name) {
                    return Err(ParamGenError::structural(format!(
                        "key '{}' expands to '{}', which is already defined",
                        key, name
                    ))
                    .at(&child_path));
                }

                let value = reduce_node(child, env, policy, &child_path)?;
                reduced.insert(name, value);
            }

            Ok(Node::Group(reduced))
        }
        GroupKind::Guards => match select(group, env, policy, path)? {
            Some((guard, child)) => {
                debug!(path = location(path), guard, "selected branch");
                reduce_node(child, env, policy, path)
            }
            None => {
                trace!(path = location(path), "no guard matched");
                Ok(Node::null())
            }
        },
    }
}
