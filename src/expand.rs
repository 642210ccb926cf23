//! Variable expansion for `$name` and `${name}` references
//!
//! The two reference syntaxes differ only in how string values are spliced
//! in. A bare `$name` that resolves to a string is replaced by a double-quoted
//! string literal, so guards can be written as `$GRID == "gx1v6"`. A braced
//! `${name}` is replaced by the raw text, so it can be used to build names and
//! paths such as `${DIN_LOC_ROOT}/ice/${ICE_GRID}.nc`. Non-string values are
//! replaced by their plain textual form under either syntax.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;
use tracing::trace;

use crate::environment::Environment;
use crate::error::{ParamGenError, Result};
use crate::tree::Scalar;

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z0-9_]+)\}|\$([A-Za-z0-9_]+)")
            .unwrap_or_else(|e| unreachable!("reference pattern is valid: {}", e))
    })
}

/// A single variable reference found in a string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference<'a> {
    /// The variable name
    pub name: &'a str,

    /// Whether the `${name}` syntax was used
    pub braced: bool,
}

impl<'a> Reference<'a> {
    fn from_captures(captures: &Captures<'a>) -> Option<Self> {
        if let Some(name) = captures.get(1) {
            Some(Self {
                name: name.as_str(),
                braced: true,
            })
        } else {
            captures.get(2).map(|name| Self {
                name: name.as_str(),
                braced: false,
            })
        }
    }
}

/// All variable references in `text`, left to right
///
/// # Examples
///
/// ```
/// use paramgen_rs::expand::references;
///
/// let names: Vec<&str> = references("${a}_$b == 1").iter().map(|r| r.name).collect();
/// assert_eq!(names, vec!["a", "b"]);
/// ```
pub fn references(text: &str) -> Vec<Reference<'_>> {
    reference_pattern()
        .captures_iter(text)
        .filter_map(|captures| Reference::from_captures(&captures))
        .collect()
}

/// Check whether `text` contains any variable reference
pub fn has_references(text: &str) -> bool {
    reference_pattern().is_match(text)
}

/// If `text` is exactly one reference and nothing else, return it
pub fn sole_reference(text: &str) -> Option<Reference<'_>> {
    let captures = reference_pattern().captures(text)?;
    let whole = captures.get(0)?;
    if whole.start() == 0 && whole.end() == text.len() {
        Reference::from_captures(&captures)
    } else {
        None
    }
}

/// `text` with every reference removed
pub fn strip_references(text: &str) -> Cow<'_, str> {
    reference_pattern().replace_all(text, "")
}

fn lookup<E: Environment + ?Sized>(env: &E, name: &str) -> Result<Scalar> {
    env.get_variable(name)
        .ok_or_else(|| ParamGenError::undefined_variable(name))
}

/// Write `value` as a double-quoted string literal
pub(crate) fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

fn replacement(reference: Reference<'_>, value: &Scalar) -> String {
    match value {
        Scalar::String(s) | Scalar::Formula(s) if !reference.braced => quote(s),
        other => other.to_text(),
    }
}

/// Replace every reference in `text`, returning the expanded text.
///
/// Fails with [`ParamGenError::UndefinedVariable`] on the first reference the
/// environment cannot resolve.
///
/// # Examples
///
/// ```
/// use paramgen_rs::environment::SimpleEnvironment;
/// use paramgen_rs::expand::expand_text;
///
/// let env = SimpleEnvironment::new().with("X", "gx1v6").with("N", 2);
/// assert_eq!(expand_text("$X == \"gx1v6\"", &env).unwrap(), "\"gx1v6\" == \"gx1v6\"");
/// assert_eq!(expand_text("ice.${X}.nc", &env).unwrap(), "ice.gx1v6.nc");
/// assert_eq!(expand_text("$N * ${N}", &env).unwrap(), "2 * 2");
/// ```
pub fn expand_text<E: Environment + ?Sized>(text: &str, env: &E) -> Result<String> {
    if !has_references(text) {
        return Ok(text.to_string());
    }

    let mut expanded = String::with_capacity(text.len());
    let mut last = 0;
    for captures in reference_pattern().captures_iter(text) {
        let (Some(whole), Some(reference)) = (captures.get(0), Reference::from_captures(&captures))
        else {
            continue;
        };

        let value = lookup(env, reference.name)?;
        trace!(variable = reference.name, value = %value, braced = reference.braced, "expanded variable");

        expanded.push_str(&text[last..whole.start()]);
        expanded.push_str(&replacement(reference, &value));
        last = whole.end();
    }
    expanded.push_str(&text[last..]);

    Ok(expanded)
}

/// Expand a scalar value.
///
/// When `text` is exactly one reference resolving to a non-string value, the
/// typed value itself is returned, so `"$NTASKS"` becomes an integer rather
/// than the text `"4"`. Everything else expands to a string.
pub fn expand_value<E: Environment + ?Sized>(text: &str, env: &E) -> Result<Scalar> {
    if let Some(reference) = sole_reference(text) {
        let value = lookup(env, reference.name)?;
        return Ok(match value {
            Scalar::String(_) | Scalar::Formula(_) => Scalar::String(replacement(reference, &value)),
            typed => typed,
        });
    }

    expand_text(text, env).map(Scalar::String)
}
