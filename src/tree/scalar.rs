//! Scalar leaf values of the parameter tree
//!
//! A scalar is a typed leaf: null, boolean, integer, float, string, or a
//! formula. Formulas are strings whose first non-blank character is `=`
//! followed by whitespace; they are evaluated during reduction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A typed leaf value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawScalar", into = "RawScalar")]
pub enum Scalar {
    /// Typed absence, produced when no guard selects a value
    Null,

    /// Boolean value
    Boolean(bool),

    /// Integer value
    Integer(i64),

    /// Floating point value
    Float(f64),

    /// Plain string value
    String(String),

    /// A string tagged as an expression, kept verbatim (including the `=`)
    Formula(String),
}

/// Untagged wire form used for serde, so scalars read and write as plain JSON.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<RawScalar> for Scalar {
    fn from(raw: RawScalar) -> Self {
        match raw {
            RawScalar::Null => Scalar::Null,
            RawScalar::Boolean(b) => Scalar::Boolean(b),
            RawScalar::Integer(i) => Scalar::Integer(i),
            RawScalar::Float(f) => Scalar::Float(f),
            RawScalar::Text(s) => Scalar::from(s),
        }
    }
}

impl From<Scalar> for RawScalar {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Null => RawScalar::Null,
            Scalar::Boolean(b) => RawScalar::Boolean(b),
            Scalar::Integer(i) => RawScalar::Integer(i),
            Scalar::Float(f) => RawScalar::Float(f),
            Scalar::String(s) | Scalar::Formula(s) => RawScalar::Text(s),
        }
    }
}

/// Return the expression part of `text` if it is written as a formula.
///
/// # Examples
///
/// ```
/// use paramgen_rs::tree::formula_body;
///
/// assert_eq!(formula_body("= 2+3").map(str::trim), Some("2+3"));
/// assert_eq!(formula_body("  =\t$x * 2").map(str::trim), Some("$x * 2"));
/// assert_eq!(formula_body("=5"), None);
/// assert_eq!(formula_body("== 5"), None);
/// ```
pub fn formula_body(text: &str) -> Option<&str> {
    let rest = text.trim_start().strip_prefix('=')?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}

impl Scalar {
    /// Build a scalar from text, tagging it as a formula when it is written as one
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if formula_body(&text).is_some() {
            Scalar::Formula(text)
        } else {
            Scalar::String(text)
        }
    }

    /// Check whether this is the typed absence value
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Check whether this scalar is a string (formulas are not)
    pub fn is_string(&self) -> bool {
        matches!(self, Scalar::String(_))
    }

    /// Check whether this scalar is a formula
    pub fn is_formula(&self) -> bool {
        matches!(self, Scalar::Formula(_))
    }

    /// The expression text of a formula, without the leading `=`
    pub fn formula_expression(&self) -> Option<&str> {
        match self {
            Scalar::Formula(text) => formula_body(text),
            _ => None,
        }
    }

    /// Get the value as a boolean, if it is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as an integer, if it is one
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a float; integers are widened
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get the text of a string or formula
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) | Scalar::Formula(s) => Some(s),
            _ => None,
        }
    }

    /// Plain textual representation of the value.
    ///
    /// Integers are written in decimal, floats in their shortest round-trip
    /// form (always with a fractional part or exponent), booleans as
    /// `True`/`False` and null as `None`. Strings are returned unquoted.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Null => "None".to_string(),
            Scalar::Boolean(true) => "True".to_string(),
            Scalar::Boolean(false) => "False".to_string(),
            Scalar::Integer(i) => i.to_string(),
            Scalar::Float(f) => format_float(*f),
            Scalar::String(s) | Scalar::Formula(s) => s.clone(),
        }
    }
}

/// Format a float so that it reads back as a float, e.g. `2.0` rather than `2`
pub(crate) fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Integer(i64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::from_text(value)
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::from_text(value)
    }
}
