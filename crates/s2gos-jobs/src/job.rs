//! Job record and lifecycle.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, error, info};

use s2gos_core::{Arguments, CancellationToken, JobContext, ProcessFunction, ProgressSink, RegistryEntry};
use s2gos_protocols::{
    FailureKind, JobFailure, JobResults, JobStatus, JobType, ProcessError, StatusInfo,
};

/// Mutable part of a job, guarded by one lock per job.
#[derive(Debug)]
struct JobState {
    status: JobStatus,
    message: Option<String>,
    created: DateTime<Utc>,
    started: Option<DateTime<Utc>>,
    finished: Option<DateTime<Utc>>,
    updated: DateTime<Utc>,
    progress: Option<u8>,
    progress_reported: bool,
    results: Option<JobResults>,
    failure: Option<JobFailure>,
}

impl JobState {
    fn finish(&mut self, status: JobStatus) {
        let now = Utc::now();
        self.status = status;
        self.finished = Some(now);
        self.updated = now;
    }
}

/// One execution of a process.
///
/// ```text
/// accepted -> running -> successful | failed | dismissed
/// accepted -> dismissed
/// ```
pub struct Job {
    job_id: String,
    process_id: String,
    function: Arc<ProcessFunction>,
    output_names: Vec<String>,
    arguments: Mutex<Option<Arguments>>,
    token: Arc<CancellationToken>,
    state: Mutex<JobState>,
}

impl Job {
    /// Create an `accepted` job for a registered process.
    pub fn new(job_id: impl Into<String>, entry: &RegistryEntry, arguments: Arguments) -> Arc<Self> {
        let now = Utc::now();
        Arc::new(Self {
            job_id: job_id.into(),
            process_id: entry.process.id.clone(),
            function: entry.function.clone(),
            output_names: entry.process.outputs.keys().cloned().collect(),
            arguments: Mutex::new(Some(arguments)),
            token: Arc::new(CancellationToken::new()),
            state: Mutex::new(JobState {
                status: JobStatus::Accepted,
                message: None,
                created: now,
                started: None,
                finished: None,
                updated: now,
                progress: None,
                progress_reported: false,
                results: None,
                failure: None,
            }),
        })
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn process_id(&self) -> &str {
        &self.process_id
    }

    pub fn status(&self) -> JobStatus {
        self.state.lock().status
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Snapshot of the job's current state.
    pub fn status_info(&self) -> StatusInfo {
        let state = self.state.lock();
        StatusInfo {
            process_id: self.process_id.clone(),
            job_id: self.job_id.clone(),
            job_type: JobType::Process,
            status: state.status,
            message: state.message.clone(),
            created: Some(state.created),
            started: state.started,
            finished: state.finished,
            updated: Some(state.updated),
            progress: state.progress,
        }
    }

    /// Results, present once the job is `successful`.
    pub fn results(&self) -> Option<JobResults> {
        self.state.lock().results.clone()
    }

    /// Failure detail, present once the job is `failed`.
    pub fn failure(&self) -> Option<JobFailure> {
        self.state.lock().failure.clone()
    }

    /// Request cooperative cancellation.
    ///
    /// A job that has not started yet is dismissed immediately. A running
    /// job is dismissed only if its function observes the request. Has no
    /// effect on terminal jobs.
    pub fn cancel(&self) {
        let mut state = self.state.lock();
        if state.status.is_terminal() {
            return;
        }
        self.token.cancel();
        if state.status == JobStatus::Accepted {
            state.finish(JobStatus::Dismissed);
            info!(job_id = %self.job_id, "Job dismissed before it started");
        } else {
            debug!(job_id = %self.job_id, "Cancellation requested for running job");
        }
    }

    /// Execute the function on the current thread.
    ///
    /// Does nothing unless the job is still `accepted`.
    pub fn run(self: &Arc<Self>) {
        let arguments = {
            let mut state = self.state.lock();
            if state.status != JobStatus::Accepted {
                debug!(job_id = %self.job_id, status = %state.status, "Skipping job");
                return;
            }
            let now = Utc::now();
            state.status = JobStatus::Running;
            state.started = Some(now);
            state.updated = now;
            state.progress = Some(0);
            self.arguments.lock().take().unwrap_or_default()
        };
        info!(job_id = %self.job_id, process_id = %self.process_id, "Job started");

        let sink: Arc<dyn ProgressSink> = self.clone();
        let ctx = JobContext::new(
            self.job_id.clone(),
            self.process_id.clone(),
            self.token.clone(),
            sink,
        );
        let outcome = catch_unwind(AssertUnwindSafe(|| self.function.call(&ctx, arguments)));

        match outcome {
            Ok(Ok(value)) => match map_results(&self.output_names, value) {
                Ok(results) => self.succeed(results),
                Err(message) => self.fail(JobFailure::new(FailureKind::OutputMismatch, message)),
            },
            Ok(Err(ProcessError::Cancelled)) => self.dismiss_running(),
            Ok(Err(e)) => self.fail(JobFailure::new(e.kind(), e.to_string())),
            Err(payload) => self.fail(JobFailure::new(
                FailureKind::Panicked,
                panic_message(payload.as_ref()),
            )),
        }
    }

    fn succeed(&self, results: JobResults) {
        let mut state = self.state.lock();
        if state.status.is_terminal() {
            return;
        }
        if !state.progress_reported {
            state.progress = Some(100);
        }
        state.results = Some(results);
        state.finish(JobStatus::Successful);
        info!(job_id = %self.job_id, process_id = %self.process_id, "Job successful");
    }

    fn fail(&self, failure: JobFailure) {
        let mut state = self.state.lock();
        if state.status.is_terminal() {
            return;
        }
        error!(
            job_id = %self.job_id,
            process_id = %self.process_id,
            kind = ?failure.kind,
            "Job failed: {}",
            failure.message
        );
        state.message = Some(failure.message.clone());
        state.failure = Some(failure);
        state.finish(JobStatus::Failed);
    }

    fn dismiss_running(&self) {
        let mut state = self.state.lock();
        if state.status.is_terminal() {
            return;
        }
        state.finish(JobStatus::Dismissed);
        info!(job_id = %self.job_id, "Job dismissed");
    }
}

impl ProgressSink for Job {
    fn report(&self, progress: Option<u8>, message: Option<String>) {
        let mut state = self.state.lock();
        if state.status.is_terminal() {
            return;
        }
        if let Some(progress) = progress {
            state.progress = Some(progress);
            state.progress_reported = true;
        }
        if message.is_some() {
            state.message = message;
        }
        state.updated = Utc::now();
        debug!(job_id = %self.job_id, progress = ?state.progress, "Progress reported");
    }
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job")
            .field("job_id", &self.job_id)
            .field("process_id", &self.process_id)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

/// Map a function's return value onto the declared outputs.
///
/// A single output receives the value as is. Several outputs require an
/// array of matching length, mapped by position.
pub fn map_results(output_names: &[String], value: Value) -> Result<JobResults, String> {
    match output_names {
        [] => Ok(JobResults::new()),
        [name] => {
            let mut results = JobResults::new();
            results.insert(name.clone(), value);
            Ok(results)
        }
        names => match value {
            Value::Array(values) if values.len() == names.len() => {
                Ok(names.iter().cloned().zip(values).collect())
            }
            Value::Array(values) => Err(format!(
                "expected {} output values, got {}",
                names.len(),
                values.len()
            )),
            _ => Err(format!(
                "expected an array of {} output values, got a single value",
                names.len()
            )),
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {}", message)
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
