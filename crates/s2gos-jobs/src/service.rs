//! Local job scheduler.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{info, warn};

use s2gos_core::{Arguments, IntoProcess, ProcessFunction, ProcessRegistry, RegisterOptions};
use s2gos_protocols::{
    ExecuteRequest, InputDescription, JobResults, JobStatus, LandingPage, Link, Process,
    ProcessService, ProcessSummary, ServiceError, StatusInfo,
};

use crate::config::PoolConfig;
use crate::job::Job;
use crate::store::JobTable;
use crate::worker::{PoolStats, WorkerPool};

/// Runs registered processes as jobs on a local worker pool.
///
/// Each instance owns its registry, job table and pool; instances share
/// no state.
pub struct LocalService {
    title: String,
    description: Option<String>,
    registry: ProcessRegistry,
    jobs: JobTable,
    pool: WorkerPool,
    next_job_id: AtomicU64,
}

impl LocalService {
    /// Create a service with the default pool configuration.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_config(title, PoolConfig::default())
    }

    pub fn with_config(title: impl Into<String>, config: PoolConfig) -> Self {
        Self {
            title: title.into(),
            description: None,
            registry: ProcessRegistry::new(),
            jobs: JobTable::new(),
            pool: WorkerPool::new(config),
            next_job_id: AtomicU64::new(0),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Register a function as a process and return its process ID.
    pub fn register_process(
        &self,
        function: ProcessFunction,
        options: RegisterOptions,
    ) -> Result<String, ServiceError> {
        let entry = self.registry.register(function, options)?;
        Ok(entry.process.id.clone())
    }

    /// Register a definition generated by `#[process]`.
    pub fn register<D: IntoProcess>(&self, definition: D) -> Result<String, ServiceError> {
        let entry = self.registry.register_definition(definition)?;
        Ok(entry.process.id.clone())
    }

    /// Cancel all unfinished jobs and stop the pool.
    pub fn shutdown(&self) {
        for job in self.jobs.list() {
            job.cancel();
        }
        self.pool.shutdown();
        info!(title = %self.title, "Service shut down");
    }

    fn get_job(&self, job_id: &str) -> Result<Arc<Job>, ServiceError> {
        self.jobs
            .get(job_id)
            .ok_or_else(|| ServiceError::job_not_found(job_id))
    }

    fn resolve_inputs(
        &self,
        process: &Process,
        mut provided: IndexMap<String, Value>,
    ) -> Result<Arguments, ServiceError> {
        let unknown: Vec<&str> = provided
            .keys()
            .filter(|name| !process.inputs.contains_key(name.as_str()))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            return Err(ServiceError::Validation(format!(
                "Unknown input(s) for process '{}': {}",
                process.id,
                unknown.join(", ")
            )));
        }

        let mut values = IndexMap::with_capacity(process.inputs.len());
        let mut missing = Vec::new();
        for (name, input) in &process.inputs {
            match provided.shift_remove(name) {
                Some(value) => {
                    let value = check_input(name, input, value)?;
                    values.insert(name.clone(), value);
                }
                None => match &input.schema.default {
                    Some(default) => {
                        values.insert(name.clone(), default.clone());
                    }
                    None if input.is_required() => missing.push(name.as_str()),
                    None => {}
                },
            }
        }
        if !missing.is_empty() {
            return Err(ServiceError::Validation(format!(
                "Missing required input(s) for process '{}': {}",
                process.id,
                missing.join(", ")
            )));
        }
        Ok(Arguments::new(values))
    }
}

/// Check one provided input value against its description.
///
/// Inputs allowing several occurrences take an array of values, or a single
/// value counting as one occurrence.
fn check_input(name: &str, input: &InputDescription, value: Value) -> Result<Value, ServiceError> {
    let invalid = |message: String| {
        ServiceError::Validation(format!("Input '{}' is invalid: {}", name, message))
    };

    let Some(max_occurs) = input.max_occurs.filter(|m| m.is_multiple()) else {
        input.schema.check(&value).map_err(|v| invalid(v.to_string()))?;
        return Ok(value);
    };

    let values = match value {
        Value::Array(values) => values,
        single => vec![single],
    };
    let min_occurs = input.min_occurs.unwrap_or(1) as usize;
    if values.len() < min_occurs || !max_occurs.allows(values.len()) {
        return Err(invalid(format!(
            "{} value(s) given, outside the allowed number of occurrences",
            values.len()
        )));
    }
    for (i, element) in values.iter().enumerate() {
        input
            .schema
            .check(element)
            .map_err(|v| invalid(format!("occurrence {}: {}", i, v)))?;
    }
    Ok(Value::Array(values))
}

#[async_trait]
impl ProcessService for LocalService {
    async fn landing_page(&self) -> LandingPage {
        let link = |href: &str, rel: &str, title: &str| Link {
            href: href.to_string(),
            rel: Some(rel.to_string()),
            media_type: Some("application/json".to_string()),
            title: Some(title.to_string()),
        };
        LandingPage {
            title: self.title.clone(),
            description: self.description.clone(),
            links: vec![
                link("/", "self", "This document"),
                link(
                    "/conformance",
                    "http://www.opengis.net/def/rel/ogc/1.0/conformance",
                    "Conformance classes",
                ),
                link(
                    "/processes",
                    "http://www.opengis.net/def/rel/ogc/1.0/processes",
                    "Processes",
                ),
                link(
                    "/jobs",
                    "http://www.opengis.net/def/rel/ogc/1.0/job-list",
                    "Jobs",
                ),
            ],
        }
    }

    async fn list_processes(&self) -> Vec<ProcessSummary> {
        self.registry.list().iter().map(Process::summary).collect()
    }

    async fn describe_process(&self, process_id: &str) -> Result<Process, ServiceError> {
        self.registry
            .get_process(process_id)
            .ok_or_else(|| ServiceError::process_not_found(process_id))
    }

    async fn execute(
        &self,
        process_id: &str,
        request: ExecuteRequest,
    ) -> Result<StatusInfo, ServiceError> {
        let entry = self
            .registry
            .get(process_id)
            .ok_or_else(|| ServiceError::process_not_found(process_id))?;

        let arguments = match self.resolve_inputs(&entry.process, request.inputs) {
            Ok(arguments) => arguments,
            Err(e) => {
                warn!(process_id = %process_id, "Rejected execution request: {}", e);
                return Err(e);
            }
        };

        let job_id = format!("job_{}", self.next_job_id.fetch_add(1, Ordering::SeqCst));
        let job = Job::new(job_id.clone(), &entry, arguments);
        let status = job.status_info();

        self.jobs.insert(job.clone());
        if let Err(e) = self.pool.submit(job) {
            self.jobs.remove(&job_id);
            return Err(ServiceError::Conflict(e.to_string()));
        }

        info!(job_id = %job_id, process_id = %process_id, "Job accepted");
        Ok(status)
    }

    async fn list_jobs(&self) -> Vec<StatusInfo> {
        self.jobs.list().iter().map(|job| job.status_info()).collect()
    }

    async fn get_status(&self, job_id: &str) -> Result<StatusInfo, ServiceError> {
        Ok(self.get_job(job_id)?.status_info())
    }

    async fn dismiss(&self, job_id: &str) -> Result<StatusInfo, ServiceError> {
        let job = self.get_job(job_id)?;
        job.cancel();
        Ok(job.status_info())
    }

    async fn delete(&self, job_id: &str) -> Result<(), ServiceError> {
        let job = self.get_job(job_id)?;
        match job.status() {
            JobStatus::Accepted => Err(ServiceError::Conflict(format!(
                "Job '{}' is still accepted",
                job_id
            ))),
            JobStatus::Running => Err(ServiceError::Conflict(format!(
                "Job '{}' is still running",
                job_id
            ))),
            _ => {
                self.jobs.remove(job_id);
                info!(job_id = %job_id, "Job deleted");
                Ok(())
            }
        }
    }

    async fn get_result(&self, job_id: &str) -> Result<JobResults, ServiceError> {
        let job = self.get_job(job_id)?;
        let conflict =
            |reason: String| ServiceError::Conflict(format!("Job '{}' {}", job_id, reason));
        match job.status() {
            JobStatus::Accepted => Err(conflict("has not started yet".to_string())),
            JobStatus::Running => Err(conflict("is still running".to_string())),
            JobStatus::Dismissed => Err(conflict("has been cancelled".to_string())),
            JobStatus::Failed => Err(conflict(match job.failure() {
                Some(failure) => format!("has failed: {}", failure.message),
                None => "has failed".to_string(),
            })),
            JobStatus::Successful => job
                .results()
                .ok_or_else(|| conflict("has no results".to_string())),
        }
    }
}

impl Drop for LocalService {
    fn drop(&mut self) {
        self.pool.shutdown();
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
