use thiserror::Error;

use crate::expression::ExpressionError;

/// Error types for the paramgen-rs library.
#[derive(Error, Debug)]
pub enum ParamGenError {
    /// The tree does not have the shape an operation requires: a group mixing
    /// guard and name keys, a guard that is not boolean, an append onto a
    /// guard-typed root, and similar.
    #[error("Structural error at '{path}': {message}")]
    Structural { path: String, message: String },

    /// The environment could not supply a referenced variable.
    #[error("Undefined variable '{name}' at '{path}'")]
    UndefinedVariable { name: String, path: String },

    /// A formula could not be parsed or evaluated after expansion.
    #[error("Cannot evaluate formula '{expression}' at '{path}': {source}")]
    FormulaEvaluation {
        path: String,
        expression: String,
        #[source]
        source: ExpressionError,
    },

    /// I/O error wrapper.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// The broad category of a [`ParamGenError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Structural,
    UndefinedVariable,
    FormulaEvaluation,
    Io,
    Json,
}

impl ParamGenError {
    /// Create a structural error with no document path attached yet.
    pub fn structural(message: impl Into<String>) -> Self {
        ParamGenError::Structural {
            path: String::new(),
            message: message.into(),
        }
    }

    /// Create an undefined-variable error with no document path attached yet.
    pub fn undefined_variable(name: impl Into<String>) -> Self {
        ParamGenError::UndefinedVariable {
            name: name.into(),
            path: String::new(),
        }
    }

    /// Create a formula error with no document path attached yet.
    pub fn formula(expression: impl Into<String>, source: ExpressionError) -> Self {
        ParamGenError::FormulaEvaluation {
            path: String::new(),
            expression: expression.into(),
            source,
        }
    }

    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParamGenError::Structural { .. } => ErrorKind::Structural,
            ParamGenError::UndefinedVariable { .. } => ErrorKind::UndefinedVariable,
            ParamGenError::FormulaEvaluation { .. } => ErrorKind::FormulaEvaluation,
            ParamGenError::IoError(_) => ErrorKind::Io,
            ParamGenError::JsonError(_) => ErrorKind::Json,
        }
    }

    /// The document path where the error was detected, if it carries one.
    pub fn path(&self) -> Option<&str> {
        match self {
            ParamGenError::Structural { path, .. }
            | ParamGenError::UndefinedVariable { path, .. }
            | ParamGenError::FormulaEvaluation { path, .. } => Some(path.as_str()),
            _ => None,
        }
    }

    /// Attach a document path, keeping any path that is already set.
    ///
    /// Errors are raised deep inside expansion and evaluation where the
    /// position in the tree is unknown; the reducer fills it in on the way out.
    pub(crate) fn at(mut self, location: &str) -> Self {
        match &mut self {
            ParamGenError::Structural { path, .. }
            | ParamGenError::UndefinedVariable { path, .. }
            | ParamGenError::FormulaEvaluation { path, .. } => {
                if path.is_empty() {
                    *path = location.to_string();
                }
            }
            _ => {}
        }
        self
    }
}

/// Result type alias for paramgen-rs operations.
pub type Result<T> = std::result::Result<T, ParamGenError>;
