//! Job context handed to executing process functions.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use s2gos_protocols::ProcessError;

/// Cooperative cancellation flag shared by a job and its context.
#[derive(Debug)]
pub struct CancellationToken {
    cancelled: AtomicBool,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver of progress updates, implemented by the job record.
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: Option<u8>, message: Option<String>);
}

/// Handle through which a running function talks to its job.
#[derive(Clone)]
pub struct JobContext {
    job_id: String,
    process_id: String,
    token: Arc<CancellationToken>,
    sink: Option<Arc<dyn ProgressSink>>,
}

impl JobContext {
    pub fn new(
        job_id: impl Into<String>,
        process_id: impl Into<String>,
        token: Arc<CancellationToken>,
        sink: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            process_id: process_id.into(),
            token,
            sink: Some(sink),
        }
    }

    /// Context for calling a process function outside of any job.
    ///
    /// Progress reports are discarded and cancellation is never requested.
    pub fn detached(process_id: impl Into<String>) -> Self {
        Self {
            job_id: String::new(),
            process_id: process_id.into(),
            token: Arc::new(CancellationToken::new()),
            sink: None,
        }
    }

    /// Empty for a detached context.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn process_id(&self) -> &str {
        &self.process_id
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Fail with [`ProcessError::Cancelled`] once cancellation was requested.
    pub fn check_cancelled(&self) -> Result<(), ProcessError> {
        if self.is_cancelled() {
            Err(ProcessError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Report progress in percent and/or a status message.
    ///
    /// Progress is clamped to `0..=100`. Returns [`ProcessError::Cancelled`]
    /// without recording anything if the job was dismissed, so a function
    /// can stop with `ctx.report_progress(..)?`.
    pub fn report_progress(
        &self,
        progress: Option<i64>,
        message: Option<&str>,
    ) -> Result<(), ProcessError> {
        self.check_cancelled()?;
        if let Some(sink) = &self.sink {
            let progress = progress.map(|p| p.clamp(0, 100) as u8);
            sink.report(progress, message.map(str::to_string));
        }
        Ok(())
    }
}

impl std::fmt::Debug for JobContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobContext")
            .field("job_id", &self.job_id)
            .field("process_id", &self.process_id)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
