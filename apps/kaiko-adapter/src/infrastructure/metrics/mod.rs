//! Prometheus Metrics Module
//!
//! Exposes adapter metrics in Prometheus format.
//!
//! # Metrics Categories
//!
//! - **Jobs**: Jobs handled by entry point, kind and outcome. Bodies that
//!   are not a job are counted with kind `invalid`.
//! - **Upstream**: Requests sent to Kaiko, by operation and status
//! - **Latency**: Job and upstream request durations
//!
//! # Integration
//!
//! Metrics are exposed at `/metrics` on the HTTP port. Recording before
//! [`init_metrics`] is a no-op.

use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

use crate::application::use_cases::{Entrypoint, JobKind};

// =============================================================================
// Global Metrics Handle
// =============================================================================

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder, once per process.
///
/// Later calls return the handle from the first call.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    if let Some(handle) = PROMETHEUS_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    register_metrics();
    Ok(PROMETHEUS_HANDLE.get_or_init(|| handle).clone())
}

/// Get the Prometheus handle for rendering metrics.
///
/// Returns `None` if metrics have not been initialized.
#[must_use]
pub fn get_metrics_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

// =============================================================================
// Metric Registration
// =============================================================================

fn register_metrics() {
    describe_counter!(
        "kaiko_adapter_jobs_total",
        "Jobs handled, by entry point, kind and outcome"
    );
    describe_histogram!(
        "kaiko_adapter_job_duration_seconds",
        "Time from job receipt to envelope"
    );
    describe_counter!(
        "kaiko_adapter_upstream_requests_total",
        "Requests sent to the Kaiko API, by operation and status"
    );
    describe_histogram!(
        "kaiko_adapter_upstream_request_seconds",
        "Kaiko API request latency"
    );
}

// =============================================================================
// Metric Recording Functions
// =============================================================================

/// Kind of request sent to Kaiko.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamOperation {
    /// Direct exchange rate lookup.
    ExchangeRate,
    /// Pass-through forward.
    Forward,
}

impl UpstreamOperation {
    const fn as_str(self) -> &'static str {
        match self {
            Self::ExchangeRate => "exchange_rate",
            Self::Forward => "forward",
        }
    }
}

/// Kind label for a request body that never became a job.
const INVALID_JOB_KIND: &str = "invalid";

/// Record a finished job.
pub fn record_job(entrypoint: Entrypoint, kind: JobKind, status_code: u16, duration: Duration) {
    let outcome = if status_code < 400 { "success" } else { "errored" };
    count_job(entrypoint, kind.as_str(), outcome, duration);
}

/// Record a request whose body could not be read as a job.
pub fn record_rejected_job(entrypoint: Entrypoint, duration: Duration) {
    count_job(entrypoint, INVALID_JOB_KIND, "errored", duration);
}

fn count_job(entrypoint: Entrypoint, kind: &'static str, outcome: &'static str, duration: Duration) {
    counter!(
        "kaiko_adapter_jobs_total",
        "entrypoint" => entrypoint.as_str(),
        "kind" => kind,
        "outcome" => outcome
    )
    .increment(1);
    histogram!(
        "kaiko_adapter_job_duration_seconds",
        "kind" => kind
    )
    .record(duration.as_secs_f64());
}

/// Record one request to Kaiko. `status` is `None` on transport failure.
pub fn record_upstream_request(
    operation: UpstreamOperation,
    status: Option<u16>,
    duration: Duration,
) {
    let status = status.map_or_else(|| "network_error".to_string(), |s| s.to_string());
    counter!(
        "kaiko_adapter_upstream_requests_total",
        "operation" => operation.as_str(),
        "status" => status
    )
    .increment(1);
    histogram!(
        "kaiko_adapter_upstream_request_seconds",
        "operation" => operation.as_str()
    )
    .record(duration.as_secs_f64());
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_operation_as_str() {
        assert_eq!(UpstreamOperation::ExchangeRate.as_str(), "exchange_rate");
        assert_eq!(UpstreamOperation::Forward.as_str(), "forward");
    }

    #[test]
    fn recording_without_recorder_is_noop() {
        record_job(Entrypoint::Http, JobKind::Vwap, 200, Duration::from_millis(5));
        record_rejected_job(Entrypoint::Event, Duration::from_millis(1));
        record_upstream_request(UpstreamOperation::Forward, None, Duration::from_millis(1));
    }
}
