//! Errors raised by process function bodies.

use thiserror::Error;

use crate::job::FailureKind;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    /// The function observed a cancellation request and stopped.
    #[error("Job was cancelled")]
    Cancelled,

    #[error("{0}")]
    Failed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProcessError {
    /// Convenience constructor for ad-hoc failures.
    pub fn failed(message: impl std::fmt::Display) -> Self {
        ProcessError::Failed(message.to_string())
    }

    /// Classification recorded with a failed job.
    pub fn kind(&self) -> FailureKind {
        match self {
            ProcessError::MissingArgument(_) | ProcessError::InvalidArgument { .. } => {
                FailureKind::InvalidArgument
            }
            ProcessError::Serialization(_) => FailureKind::InvalidArgument,
            ProcessError::Cancelled | ProcessError::Failed(_) => FailureKind::Failed,
        }
    }
}
