//! Worker pool for job execution.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::job::Job;

/// Counters describing the pool's load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub max_workers: usize,
    /// Jobs waiting for a free worker.
    pub queued: u64,
    pub running: u64,
    /// Jobs whose execution ended, whatever the outcome.
    pub completed: u64,
}

#[derive(Debug, Default)]
struct Counters {
    queued: AtomicU64,
    running: AtomicU64,
    completed: AtomicU64,
}

/// Bounded pool running jobs on tokio's blocking threads.
///
/// Each submission spawns a lightweight task that waits for one of
/// `max_workers` permits and then runs the job body with
/// `spawn_blocking`. The permit is held until the job finishes, so excess
/// submissions queue in submission order.
pub struct WorkerPool {
    config: PoolConfig,
    semaphore: Arc<Semaphore>,
    closed: AtomicBool,
    counters: Arc<Counters>,
}

impl WorkerPool {
    pub fn new(config: PoolConfig) -> Self {
        let permits = config.max_workers.max(1);
        info!("Worker pool created with {} workers", permits);
        Self {
            config,
            semaphore: Arc::new(Semaphore::new(permits)),
            closed: AtomicBool::new(false),
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of idle workers.
    pub fn available_workers(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            max_workers: self.config.max_workers.max(1),
            queued: self.counters.queued.load(Ordering::SeqCst),
            running: self.counters.running.load(Ordering::SeqCst),
            completed: self.counters.completed.load(Ordering::SeqCst),
        }
    }

    /// Queue a job for execution without waiting for it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, job: Arc<Job>) -> Result<(), PoolError> {
        if self.is_closed() {
            return Err(PoolError::ShutDown);
        }

        let semaphore = self.semaphore.clone();
        let counters = self.counters.clone();
        counters.queued.fetch_add(1, Ordering::SeqCst);
        debug!(job_id = %job.job_id(), "Job queued");

        tokio::spawn(async move {
            let permit = semaphore.acquire_owned().await;
            counters.queued.fetch_sub(1, Ordering::SeqCst);
            let permit = match permit {
                Ok(permit) => permit,
                Err(_) => {
                    job.cancel();
                    return;
                }
            };

            counters.running.fetch_add(1, Ordering::SeqCst);
            let runner = job.clone();
            if let Err(e) = tokio::task::spawn_blocking(move || runner.run()).await {
                error!(job_id = %job.job_id(), "Worker task failed: {}", e);
            }
            counters.running.fetch_sub(1, Ordering::SeqCst);
            counters.completed.fetch_add(1, Ordering::SeqCst);

            drop(permit);
        });

        Ok(())
    }

    /// Stop accepting jobs. Jobs still waiting for a worker are dismissed;
    /// running jobs are left to finish.
    pub fn shutdown(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.semaphore.close();
            info!("Worker pool shut down");
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
