//! Environments supplying variable values at reduction time
//!
//! An environment maps a variable name to a typed scalar. Returning `None`
//! means the name is undefined, which is distinct from a defined variable
//! whose value is [`Scalar::Null`].

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::tree::Scalar;

/// Source of variable values for `$name` and `${name}` references
pub trait Environment {
    /// Get the value of a variable, or `None` if it is not defined
    fn get_variable(&self, name: &str) -> Option<Scalar>;

    /// Check if a variable exists
    fn has_variable(&self, name: &str) -> bool {
        self.get_variable(name).is_some()
    }
}

/// Simple implementation of Environment using a HashMap
#[derive(Debug, Clone, Default)]
pub struct SimpleEnvironment {
    /// Map of variable names to values
    variables: HashMap<String, Scalar>,
}

impl SimpleEnvironment {
    /// Create a new empty environment
    pub fn new() -> Self {
        Self {
            variables: HashMap::new(),
        }
    }

    /// Set a variable value
    pub fn set_variable(&mut self, name: &str, value: impl Into<Scalar>) {
        self.variables.insert(name.to_string(), value.into());
    }

    /// Builder-style variant of [`SimpleEnvironment::set_variable`]
    pub fn with(mut self, name: &str, value: impl Into<Scalar>) -> Self {
        self.set_variable(name, value);
        self
    }

    /// Remove a variable
    pub fn remove_variable(&mut self, name: &str) -> Option<Scalar> {
        self.variables.remove(name)
    }

    /// Names of all defined variables
    pub fn variable_names(&self) -> Vec<String> {
        self.variables.keys().cloned().collect()
    }
}

impl Environment for SimpleEnvironment {
    fn get_variable(&self, name: &str) -> Option<Scalar> {
        self.variables.get(name).cloned()
    }

    fn has_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }
}

impl Environment for HashMap<String, Scalar> {
    fn get_variable(&self, name: &str) -> Option<Scalar> {
        self.get(name).cloned()
    }
}

impl Environment for IndexMap<String, Scalar> {
    fn get_variable(&self, name: &str) -> Option<Scalar> {
        self.get(name).cloned()
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn get_variable(&self, name: &str) -> Option<Scalar> {
        (**self).get_variable(name)
    }
}

/// Environment backed by a lookup function
///
/// # Examples
///
/// ```
/// use paramgen_rs::environment::{Environment, FnEnvironment};
/// use paramgen_rs::tree::Scalar;
///
/// let env = FnEnvironment::new(|name: &str| match name {
///     "NTASKS" => Some(Scalar::Integer(4)),
///     _ => None,
/// });
/// assert_eq!(env.get_variable("NTASKS"), Some(Scalar::Integer(4)));
/// assert!(!env.has_variable("NTHRDS"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnEnvironment<F>(F);

impl<F> FnEnvironment<F>
where
    F: Fn(&str) -> Option<Scalar>,
{
    /// Wrap a lookup function
    pub fn new(lookup: F) -> Self {
        Self(lookup)
    }
}

impl<F> Environment for FnEnvironment<F>
where
    F: Fn(&str) -> Option<Scalar>,
{
    fn get_variable(&self, name: &str) -> Option<Scalar> {
        (self.0)(name)
    }
}
