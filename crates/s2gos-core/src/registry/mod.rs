//! Registries of processes.

mod base;
mod process;

pub use base::{BaseRegistry, Registerable};
pub use process::{IntoProcess, ProcessRegistry, RegisterOptions, RegistryEntry};
