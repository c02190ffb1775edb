//! Schema errors.

use thiserror::Error;

/// An annotation that cannot be turned into a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unhandled annotation '{annotation}' for {} of '{function}'", subject(.is_return, .name))]
pub struct SchemaError {
    /// Qualified name of the function being registered.
    pub function: String,
    /// Parameter or output name.
    pub name: String,
    /// Rendered annotation.
    pub annotation: String,
    /// Whether the annotation belongs to the return value.
    pub is_return: bool,
}

fn subject(is_return: &bool, name: &str) -> String {
    if *is_return {
        format!("return value '{}'", name)
    } else {
        format!("parameter '{}'", name)
    }
}

/// A value that does not conform to a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {message}")]
pub struct SchemaViolation {
    /// Location of the offending value, `$` being the root.
    pub path: String,
    pub message: String,
}

impl SchemaViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}
