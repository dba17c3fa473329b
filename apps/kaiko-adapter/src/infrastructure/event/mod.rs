//! Event Entry Point
//!
//! Serverless-style callback: one event in, one envelope out. The status code
//! is only reported inside the envelope as `statusCode`.

use std::time::Instant;

use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::application::dto::{DEFAULT_JOB_RUN_ID, JobRequest, JobResponse};
use crate::application::ports::MarketDataPort;
use crate::application::use_cases::{Entrypoint, JobKind, JobRunner};
use crate::error::JobError;
use crate::infrastructure::metrics::{record_job, record_rejected_job};

/// Run one event through the job runner.
pub async fn handle_event<M>(runner: &JobRunner<M>, event: Value) -> JobResponse
where
    M: MarketDataPort,
{
    let started = Instant::now();

    match serde_json::from_value::<JobRequest>(event) {
        Ok(job) => {
            let kind = JobKind::of(&job.data);
            let response = runner.run(job, Entrypoint::Event).await;
            record_job(Entrypoint::Event, kind, response.status_code, started.elapsed());
            response
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rejected malformed event");
            record_rejected_job(Entrypoint::Event, started.elapsed());
            JobResponse::from_error(
                DEFAULT_JOB_RUN_ID,
                &JobError::invalid_request(format!("Invalid job: {e}")),
            )
        }
    }
}

/// Event I/O error.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// Reading the event or writing the envelope failed.
    #[error("event I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The envelope could not be serialized.
    #[error("failed to encode envelope: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Read one JSON event from `input` and write its envelope to `output`.
///
/// Input that is not JSON still produces an errored envelope.
pub async fn run_once<M, R, W>(
    runner: &JobRunner<M>,
    mut input: R,
    mut output: W,
) -> Result<JobResponse, EventError>
where
    M: MarketDataPort,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let started = Instant::now();
    let mut raw = Vec::new();
    input.read_to_end(&mut raw).await?;

    let response = match serde_json::from_slice::<Value>(&raw) {
        Ok(event) => handle_event(runner, event).await,
        Err(e) => {
            tracing::warn!(error = %e, "Event is not JSON");
            record_rejected_job(Entrypoint::Event, started.elapsed());
            JobResponse::from_error(
                DEFAULT_JOB_RUN_ID,
                &JobError::invalid_request(format!("Invalid job: {e}")),
            )
        }
    };

    let mut encoded = serde_json::to_vec(&response)?;
    encoded.push(b'\n');
    output.write_all(&encoded).await?;
    output.flush().await?;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::JobDefaults;
    use crate::domain::pricing::QuoteAssetResolver;
    use crate::domain::shared::AssetCode;
    use crate::infrastructure::market_data::StaticMarketData;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::Arc;

    fn runner() -> JobRunner<StaticMarketData> {
        let ampl = AssetCode::parse("ampl").unwrap();
        let market =
            StaticMarketData::new().with_rate(&ampl, &AssetCode::usd(), dec!(0.95), dec!(40));
        JobRunner::new(
            Arc::new(market),
            QuoteAssetResolver::new(vec![AssetCode::usd()]),
            JobDefaults::default(),
        )
    }

    #[tokio::test]
    async fn event_yields_envelope() {
        let response = handle_event(&runner(), json!({ "id": "evt", "data": {} })).await;

        assert_eq!(response.job_run_id, "evt");
        assert_eq!(response.status_code, 200);
        assert_eq!(response.result.as_deref(), Some("0.95"));
    }

    #[tokio::test]
    async fn wrong_shape_is_errored_envelope() {
        let response = handle_event(&runner(), json!({ "id": "evt", "data": "ampl" })).await;

        assert!(response.is_errored());
        assert_eq!(response.job_run_id, "1");
        assert_eq!(response.status_code, 400);
    }

    #[tokio::test]
    async fn run_once_writes_one_line() {
        let input: &[u8] = br#"{"id":"io","data":{"coin":"ampl"}}"#;
        let mut output = Vec::new();

        let response = run_once(&runner(), input, &mut output).await.unwrap();

        assert_eq!(response.job_run_id, "io");
        assert!(output.ends_with(b"\n"));
        let written: Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(written["jobRunID"], "io");
        assert_eq!(written["data"]["price"], "0.95");
    }

    #[tokio::test]
    async fn run_once_handles_garbage() {
        let input: &[u8] = b"not json";
        let mut output = Vec::new();

        let response = run_once(&runner(), input, &mut output).await.unwrap();

        assert!(response.is_errored());
        let written: Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(written["statusCode"], 400);
    }
}
