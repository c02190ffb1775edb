//! # S2GOS Jobs
//!
//! Asynchronous execution of registered processes.
//!
//! ## Components
//!
//! - [`Job`] - One execution of a process and its lifecycle state
//! - [`WorkerPool`] - Bounded pool running jobs on blocking threads
//! - [`JobTable`] - Insertion-ordered job records
//! - [`LocalService`] - The job scheduler, implementing `ProcessService`
//! - [`testing`] - Demo processes and a ready-made demo service

pub mod config;
pub mod error;
pub mod job;
pub mod service;
pub mod store;
pub mod testing;
pub mod worker;

pub use config::PoolConfig;
pub use error::PoolError;
pub use job::Job;
pub use service::LocalService;
pub use store::JobTable;
pub use worker::{PoolStats, WorkerPool};
