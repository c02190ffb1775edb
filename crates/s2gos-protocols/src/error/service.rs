//! Scheduler errors.

use thiserror::Error;

use super::RegistryError;

/// Error returned by the operations of a [`crate::ProcessService`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Unknown process or job id.
    #[error("{0}")]
    NotFound(String),

    /// Submitted inputs are unknown, missing or malformed.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Operation not valid in the job's current state.
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ServiceError {
    pub fn process_not_found(process_id: &str) -> Self {
        ServiceError::NotFound(format!("Process '{}' not found", process_id))
    }

    pub fn job_not_found(job_id: &str) -> Self {
        ServiceError::NotFound(format!("Job '{}' does not exist", job_id))
    }

    /// HTTP status code an external binding would answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::NotFound(_) => 404,
            ServiceError::Validation(_) => 400,
            ServiceError::Conflict(_) => 409,
            ServiceError::Registry(_) => 400,
        }
    }
}
