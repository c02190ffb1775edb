//! The service boundary consumed by transport layers.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::job::{JobResults, StatusInfo};
use crate::process::{Process, ProcessSummary};

/// Conformance classes of OGC API - Processes implemented by the engine.
pub const CONFORMANCE_CLASSES: &[&str] = &[
    "http://www.opengis.net/spec/ogcapi-processes-1/1.0/conf/core",
    "http://www.opengis.net/spec/ogcapi-processes-1/1.0/conf/ogc-process-description",
    "http://www.opengis.net/spec/ogcapi-processes-1/1.0/conf/json",
    "http://www.opengis.net/spec/ogcapi-processes-1/1.0/conf/oas30",
    "http://www.opengis.net/spec/ogcapi-processes-1/1.0/conf/job-list",
    "http://www.opengis.net/spec/ogcapi-processes-1/1.0/conf/dismiss",
];

/// A hyperlink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandingPage {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConformanceClasses {
    #[serde(rename = "conformsTo")]
    pub conforms_to: Vec<String>,
}

impl Default for ConformanceClasses {
    fn default() -> Self {
        Self {
            conforms_to: CONFORMANCE_CLASSES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Body of an execution request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    #[serde(default)]
    pub inputs: IndexMap<String, serde_json::Value>,
}

impl ExecuteRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an input value.
    pub fn with_input(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.inputs.insert(name.into(), value);
        self
    }
}

/// Operations of an OGC API - Processes job scheduler.
///
/// Every operation returns either a value or one typed [`ServiceError`].
/// Implementations must never block on job completion.
#[async_trait]
pub trait ProcessService: Send + Sync {
    async fn landing_page(&self) -> LandingPage;

    async fn conformance(&self) -> ConformanceClasses {
        ConformanceClasses::default()
    }

    /// Summaries of all processes in registration order.
    async fn list_processes(&self) -> Vec<ProcessSummary>;

    async fn describe_process(&self, process_id: &str) -> Result<Process, ServiceError>;

    /// Submit a job and return its `accepted` status without waiting for it.
    async fn execute(
        &self,
        process_id: &str,
        request: ExecuteRequest,
    ) -> Result<StatusInfo, ServiceError>;

    /// Status of all jobs in submission order.
    async fn list_jobs(&self) -> Vec<StatusInfo>;

    async fn get_status(&self, job_id: &str) -> Result<StatusInfo, ServiceError>;

    /// Request cooperative cancellation of a job.
    async fn dismiss(&self, job_id: &str) -> Result<StatusInfo, ServiceError>;

    /// Remove a finished job's record.
    async fn delete(&self, job_id: &str) -> Result<(), ServiceError>;

    /// Results of a successful job.
    async fn get_result(&self, job_id: &str) -> Result<JobResults, ServiceError>;
}
