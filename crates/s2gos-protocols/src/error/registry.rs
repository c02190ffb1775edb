//! Process registration errors.

use thiserror::Error;

use super::SchemaError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Invalid process: {0}")]
    InvalidProcess(String),

    #[error("Invalid input name(s): {}", .names.join(", "))]
    InvalidInput { names: Vec<String> },

    #[error("Invalid outputs: {0}")]
    InvalidOutput(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
