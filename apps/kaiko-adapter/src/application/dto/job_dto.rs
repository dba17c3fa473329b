//! Job request and response envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::JobError;

/// Job run ID used when the caller sends none.
pub const DEFAULT_JOB_RUN_ID: &str = "1";

fn default_job_run_id() -> String {
    DEFAULT_JOB_RUN_ID.to_string()
}

/// Job submitted by the oracle node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    /// Job run ID, echoed back as `jobRunID`.
    #[serde(default = "default_job_run_id", deserialize_with = "job_run_id")]
    pub id: String,
    /// Job parameters.
    #[serde(default)]
    pub data: JobData,
}

impl JobRequest {
    /// Create a job with the given ID and parameters.
    #[must_use]
    pub fn new(id: impl Into<String>, data: JobData) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// Accept the job ID as a string or a number.
fn job_run_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(default_job_run_id()),
        other => Err(serde::de::Error::custom(format!(
            "job id must be a string or number, got {other}"
        ))),
    }
}

/// Job parameters.
///
/// A job carrying `endpoint` is forwarded verbatim; any other job is a VWAP job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobData {
    /// Base asset to price (VWAP jobs). `coin` is accepted as an alias.
    #[serde(default, alias = "coin", skip_serializing_if = "Option::is_none")]
    pub base_asset: Option<String>,
    /// Aggregation interval (VWAP jobs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    /// API region (forward jobs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// API path (forward jobs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Raw query string (forward jobs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
}

impl JobData {
    /// Whether this job asks for a raw forward.
    #[must_use]
    pub const fn is_forward(&self) -> bool {
        self.endpoint.is_some()
    }
}

/// Response envelope returned to the oracle node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    /// Echo of the request ID.
    #[serde(rename = "jobRunID")]
    pub job_run_id: String,
    /// `"errored"` on failure, absent on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Payload on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Single answer value for the node, when the job has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Error message or upstream error body on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    /// HTTP status the entry point reports.
    pub status_code: u16,
}

impl JobResponse {
    /// Successful envelope.
    #[must_use]
    pub fn success(job_run_id: impl Into<String>, data: Value, status_code: u16) -> Self {
        Self {
            job_run_id: job_run_id.into(),
            status: None,
            data: Some(data),
            result: None,
            error: None,
            status_code,
        }
    }

    /// Attach the single answer value.
    #[must_use]
    pub fn with_result(mut self, result: impl Into<String>) -> Self {
        self.result = Some(result.into());
        self
    }

    /// Errored envelope carrying an arbitrary error body.
    #[must_use]
    pub fn errored(job_run_id: impl Into<String>, error: Value, status_code: u16) -> Self {
        Self {
            job_run_id: job_run_id.into(),
            status: Some("errored".to_string()),
            data: None,
            result: None,
            error: Some(error),
            status_code,
        }
    }

    /// Errored envelope for a job failure.
    #[must_use]
    pub fn from_error(job_run_id: impl Into<String>, error: &JobError) -> Self {
        Self::errored(
            job_run_id,
            Value::String(error.to_string()),
            error.status_code(),
        )
    }

    /// Whether this envelope reports a failure.
    #[must_use]
    pub fn is_errored(&self) -> bool {
        self.status.as_deref() == Some("errored")
    }
}
