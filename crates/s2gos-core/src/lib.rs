//! # S2GOS Core
//!
//! Everything needed to turn a plain function into a described,
//! executable process.
//!
//! ## Components
//!
//! - [`Annotation`] - Type annotation language and the [`TypeAnnotation`] trait
//! - [`SchemaFactory`] - Schema inference from annotations
//! - [`ProcessFunction`] - A callable body plus its [`Signature`]
//! - [`JobContext`] - Handle for progress reporting and cancellation
//! - [`ProcessRegistry`] - Ordered registry of processes

pub mod annotation;
pub mod context;
pub mod function;
pub mod registry;
pub mod schema_factory;

pub use annotation::{Annotation, TypeAnnotation};
pub use context::{CancellationToken, JobContext, ProgressSink};
pub use function::{Arguments, Parameter, ProcessFunction, ProcessFunctionBuilder, Signature};
pub use registry::{IntoProcess, ProcessRegistry, RegisterOptions, RegistryEntry};
pub use schema_factory::SchemaFactory;

#[doc(hidden)]
pub mod __private {
    pub use s2gos_protocols::ProcessError;
    pub use serde_json;
}
