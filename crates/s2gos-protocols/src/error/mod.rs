//! Error types for the S2GOS job engine.
//!
//! - [`SchemaError`] and [`RegistryError`] are raised while registering a
//!   process and are fatal to that registration.
//! - [`ServiceError`] is what every scheduler operation returns.
//! - [`ProcessError`] is raised by process function bodies and ends up as the
//!   failure detail of the job that ran them.

mod process;
mod registry;
mod schema;
mod service;

pub use process::*;
pub use registry::*;
pub use schema::*;
pub use service::*;
