//! Worker pool errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The pool was shut down and accepts no more jobs.
    #[error("Worker pool is shut down")]
    ShutDown,
}
