//! # S2GOS Protocols
//!
//! Data model and interface definitions for the S2GOS job engine.
//! Contains no engine logic, only the types an HTTP binding or a client
//! would exchange with it.
//!
//! ## Contents
//!
//! - [`Schema`] - OpenAPI style description of a value's shape
//! - [`Process`] - A registered unit of work with its inputs and outputs
//! - [`StatusInfo`] - Externally observable snapshot of a job
//! - [`ProcessService`] - The boundary trait implemented by job schedulers
//! - Error types for every layer of the engine

pub mod error;
pub mod job;
pub mod process;
pub mod schema;
pub mod service;

pub use error::{
    ProcessError, RegistryError, SchemaError, SchemaViolation, ServiceError,
};
pub use job::{FailureKind, JobFailure, JobResults, JobStatus, JobType, StatusInfo};
pub use process::{InputDescription, MaxOccurs, OutputDescription, Process, ProcessSummary};
pub use schema::{Items, Schema, SchemaKind, SchemaType};
pub use service::{
    CONFORMANCE_CLASSES, ConformanceClasses, ExecuteRequest, LandingPage, Link, ProcessService,
};
