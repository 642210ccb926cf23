//! Runtime values of the expression language

use std::cmp::Ordering;
use std::fmt;

use super::ExpressionError;
use crate::tree::scalar::format_float;
use crate::tree::Scalar;

/// A value produced while evaluating an expression
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `None`
    Null,

    /// `True` / `False`
    Bool(bool),

    /// 64-bit integer
    Int(i64),

    /// 64-bit float
    Float(f64),

    /// String
    Str(String),

    /// List literal, used for membership tests
    List(Vec<Value>),
}

/// A numeric view of a value; booleans count as integers
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub(crate) fn to_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub(crate) fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }
}

impl Value {
    /// Python-style truthiness
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
        }
    }

    /// Name of the value's type, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
        }
    }

    pub(crate) fn as_number(&self) -> Option<Number> {
        match self {
            Value::Bool(b) => Some(Number::Int(i64::from(*b))),
            Value::Int(i) => Some(Number::Int(*i)),
            Value::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    /// Equality across types: numbers compare by value, everything else by type and content
    pub(crate) fn loosely_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loosely_equals(y))
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Null, Value::Null) => true,
            _ => match (self.as_number(), other.as_number()) {
                (Some(Number::Int(a)), Some(Number::Int(b))) => a == b,
                (Some(a), Some(b)) => a.to_f64() == b.to_f64(),
                _ => false,
            },
        }
    }

    /// Ordering for `<`, `<=`, `>`, `>=`, `min` and `max`
    pub(crate) fn try_cmp(&self, other: &Value) -> Result<Ordering, ExpressionError> {
        let unordered = || ExpressionError::InvalidOperation {
            message: format!(
                "ordering not supported between '{}' and '{}'",
                self.type_name(),
                other.type_name()
            ),
        };

        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
            _ => match (self.as_number(), other.as_number()) {
                (Some(Number::Int(a)), Some(Number::Int(b))) => Ok(a.cmp(&b)),
                (Some(a), Some(b)) => a.to_f64().partial_cmp(&b.to_f64()).ok_or_else(unordered),
                _ => Err(unordered()),
            },
        }
    }

    /// Convert the result of an expression into a tree scalar
    pub fn into_scalar(self) -> Result<Scalar, ExpressionError> {
        match self {
            Value::Null => Ok(Scalar::Null),
            Value::Bool(b) => Ok(Scalar::Boolean(b)),
            Value::Int(i) => Ok(Scalar::Integer(i)),
            Value::Float(f) => Ok(Scalar::Float(f)),
            Value::Str(s) => Ok(Scalar::String(s)),
            Value::List(_) => Err(ExpressionError::InvalidOperation {
                message: "a list is not a parameter value".to_string(),
            }),
        }
    }

    /// The `repr`-style form used inside list displays
    fn write_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            other => write!(f, "{}", other),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => f.write_str(&format_float(*x)),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.write_repr(f)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&Scalar> for Value {
    fn from(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Null => Value::Null,
            Scalar::Boolean(b) => Value::Bool(*b),
            Scalar::Integer(i) => Value::Int(*i),
            Scalar::Float(f) => Value::Float(*f),
            Scalar::String(s) | Scalar::Formula(s) => Value::Str(s.clone()),
        }
    }
}
