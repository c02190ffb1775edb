//! Schema definitions.
//!
//! Schemas follow the OpenAPI 3.0 dialect used by OGC API - Processes:
//! nullability is a flag rather than a `null` type, and fixed-length tuples
//! carry one item schema per position.

mod check;
mod definition;

pub use definition::*;

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
