//! HTTP Controller (Driver Adapter)
//!
//! Axum-based entry point that hands jobs to the [`JobRunner`].
//!
//! # Endpoints
//!
//! - `POST /` - Run a job, answer with the envelope and its status code
//! - `GET /health` - Returns JSON health status
//! - `GET /metrics` - Prometheus metrics in text format

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::application::dto::{DEFAULT_JOB_RUN_ID, JobRequest, JobResponse};
use crate::application::ports::MarketDataPort;
use crate::application::use_cases::{Entrypoint, JobKind, JobRunner};
use crate::error::JobError;
use crate::infrastructure::metrics::{get_metrics_handle, record_job, record_rejected_job};

use super::response::HealthResponse;

/// Application state shared across handlers.
pub struct AppState<M>
where
    M: MarketDataPort,
{
    /// Job dispatcher.
    pub runner: Arc<JobRunner<M>>,
    /// Application version.
    pub version: String,
}

impl<M> Clone for AppState<M>
where
    M: MarketDataPort,
{
    fn clone(&self) -> Self {
        Self {
            runner: Arc::clone(&self.runner),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<M>(state: AppState<M>) -> Router
where
    M: MarketDataPort + 'static,
{
    Router::new()
        .route("/", post(run_job))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check<M>(State(state): State<AppState<M>>) -> impl IntoResponse
where
    M: MarketDataPort,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

/// Job endpoint.
///
/// The body is parsed here rather than through the `Json` extractor so that a
/// malformed job still gets an envelope.
async fn run_job<M>(State(state): State<AppState<M>>, body: Bytes) -> impl IntoResponse
where
    M: MarketDataPort,
{
    let started = Instant::now();

    let response = match serde_json::from_slice::<JobRequest>(&body) {
        Ok(job) => {
            let kind = JobKind::of(&job.data);
            let response = state.runner.run(job, Entrypoint::Http).await;
            record_job(Entrypoint::Http, kind, response.status_code, started.elapsed());
            response
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rejected malformed job");
            record_rejected_job(Entrypoint::Http, started.elapsed());
            JobResponse::from_error(
                DEFAULT_JOB_RUN_ID,
                &JobError::invalid_request(format!("Invalid job: {e}")),
            )
        }
    };

    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response))
}

/// Prometheus scrape endpoint.
async fn metrics_handler() -> impl IntoResponse {
    get_metrics_handle().map_or_else(
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [("content-type", "text/plain")],
                "Metrics not initialized".to_string(),
            )
        },
        |handle| {
            let body = handle.render();
            (
                StatusCode::OK,
                [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
                body,
            )
        },
    )
}
