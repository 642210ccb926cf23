//! Guard classification and evaluation
//!
//! The keys of a group are either all parameter names or all guards. Which
//! one is decided lexically, per group, without expanding or evaluating
//! anything:
//!
//! - `else`, `True`, `False`, `true` and `false` are guards
//! - a key that is exactly one bare reference (`$FLAG`) is a guard, a key that
//!   is exactly one braced reference (`${COMP}`) is a name
//! - otherwise, once references are removed, a key made only of name
//!   characters (letters, digits, `_`, `-`, `.`, `%`) is a name and anything
//!   else is a guard
//!
//! For a guard-typed group, [`select`] picks at most one child according to
//! the [`MatchPolicy`]. The `else` branch is chosen only when no other guard
//! is true.

use tracing::trace;

use crate::config::MatchPolicy;
use crate::environment::Environment;
use crate::error::{ParamGenError, Result};
use crate::expand::{expand_text, sole_reference, strip_references};
use crate::expression::{evaluate_str, Value};
use crate::tree::{Group, Node};

/// The fallback guard, true when every sibling guard is false
pub const ELSE: &str = "else";

/// Whether a group's keys are parameter names or guards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// All keys are parameter or group names
    Names,

    /// All keys are guard expressions
    Guards,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '%')
}

/// Decide whether a single key is a guard expression
///
/// # Examples
///
/// ```
/// use paramgen_rs::guard::is_guard_key;
///
/// assert!(is_guard_key("$ICE_GRID == \"gx1v6\""));
/// assert!(is_guard_key("else"));
/// assert!(is_guard_key("$USE_ESMF"));
/// assert!(!is_guard_key("ice_ic"));
/// assert!(!is_guard_key("${COMP}_in"));
/// ```
pub fn is_guard_key(key: &str) -> bool {
    if matches!(key, ELSE | "True" | "False" | "true" | "false") {
        return true;
    }
    if let Some(reference) = sole_reference(key) {
        return !reference.braced;
    }
    !strip_references(key).chars().all(is_name_char)
}

/// Classify a group's keys; a mixture of guards and names is a structural error
pub fn classify(group: &Group) -> Result<GroupKind> {
    let (guards, names): (Vec<&str>, Vec<&str>) = group
        .keys()
        .map(String::as_str)
        .partition(|key| is_guard_key(key));

    match (guards.is_empty(), names.is_empty()) {
        (true, _) => Ok(GroupKind::Names),
        (false, true) => Ok(GroupKind::Guards),
        (false, false) => Err(ParamGenError::structural(format!(
            "group mixes guards {:?} with names {:?}",
            guards, names
        ))),
    }
}

/// Expand and evaluate one guard expression
///
/// Undefined variables propagate as [`ParamGenError::UndefinedVariable`];
/// anything that does not evaluate to a boolean is a structural error.
pub fn evaluate_guard<E: Environment + ?Sized>(guard: &str, env: &E) -> Result<bool> {
    let expanded = expand_text(guard, env)?;

    match evaluate_str(&expanded) {
        Ok(Value::Bool(truth)) => Ok(truth),
        Ok(other) => Err(ParamGenError::structural(format!(
            "guard '{}' evaluated to {} '{}', not a boolean",
            expanded,
            other.type_name(),
            other
        ))),
        Err(e) => Err(ParamGenError::structural(format!(
            "cannot evaluate guard '{}': {}",
            expanded, e
        ))),
    }
}

/// Select the surviving branch of a guard-typed group.
///
/// Guards are evaluated in document order. Under [`MatchPolicy::Last`] every
/// guard is evaluated and the last true one wins; under
/// [`MatchPolicy::First`] evaluation stops at the first true guard. `else` is
/// never evaluated and is returned only if no other guard was true. `None`
/// means nothing matched.
///
/// `path` is the document path of the group, used in error messages.
pub fn select<'g, E: Environment + ?Sized>(
    group: &'g Group,
    env: &E,
    policy: MatchPolicy,
    path: &str,
) -> Result<Option<(&'g str, &'g Node)>> {
    let mut chosen = None;
    let mut fallback = None;

    for (guard, node) in group {
        if guard == ELSE {
            fallback = Some((guard.as_str(), node));
            continue;
        }

        let truth = evaluate_guard(guard, env).map_err(|e| e.at(&join_path(path, guard)))?;
        trace!(path, guard = guard.as_str(), truth, "evaluated guard");

        if truth {
            chosen = Some((guard.as_str(), node));
            if policy == MatchPolicy::First {
                break;
            }
        }
    }

    Ok(chosen.or(fallback))
}

/// Append a key to a `/`-separated document path
pub(crate) fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}/{}", path, key)
    }
}
