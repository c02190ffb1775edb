//! In-memory job table.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::job::Job;

/// Jobs keyed by job ID in submission order.
#[derive(Debug, Default)]
pub struct JobTable {
    jobs: RwLock<IndexMap<String, Arc<Job>>>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, job: Arc<Job>) {
        self.jobs.write().insert(job.job_id().to_string(), job);
    }

    pub fn get(&self, job_id: &str) -> Option<Arc<Job>> {
        self.jobs.read().get(job_id).cloned()
    }

    /// Remove a job, keeping the order of the others.
    pub fn remove(&self, job_id: &str) -> Option<Arc<Job>> {
        self.jobs.write().shift_remove(job_id)
    }

    /// Snapshot of all jobs in submission order.
    pub fn list(&self) -> Vec<Arc<Job>> {
        self.jobs.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }
}
