//! Job Runner
//!
//! Single entry into the application for both the HTTP and the event entry
//! points. Decides the job kind, runs the matching use case inside a `job`
//! span and always produces a response envelope.

use std::sync::Arc;

use tracing::Instrument;

use crate::application::dto::{JobData, JobRequest, JobResponse};
use crate::application::ports::MarketDataPort;
use crate::application::use_cases::{ComputeVwapUseCase, ForwardRequestUseCase};
use crate::domain::pricing::QuoteAssetResolver;
use crate::domain::shared::{AssetCode, Interval};
use crate::error::JobError;

/// Where a job came from, recorded on its span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entrypoint {
    /// HTTP `POST /`.
    Http,
    /// One-shot event callback.
    Event,
}

impl Entrypoint {
    /// Label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Event => "event",
        }
    }
}

/// Kind of work a job asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    /// Blended VWAP across quote markets.
    Vwap,
    /// Raw request forwarded to the provider.
    Forward,
}

impl JobKind {
    /// Kind of the given job data.
    #[must_use]
    pub const fn of(data: &JobData) -> Self {
        if data.is_forward() {
            Self::Forward
        } else {
            Self::Vwap
        }
    }

    /// Label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vwap => "vwap",
            Self::Forward => "forward",
        }
    }
}

/// Values used when a VWAP job leaves a field out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDefaults {
    /// Base asset priced when `baseAsset` is absent.
    pub base_asset: AssetCode,
    /// Interval used when `interval` is absent.
    pub interval: Interval,
}

impl Default for JobDefaults {
    #[allow(clippy::expect_used)] // Constant asset code; expect() is safe here
    fn default() -> Self {
        Self {
            base_asset: AssetCode::parse("ampl").expect("default base asset is valid"),
            interval: Interval::one_day(),
        }
    }
}

/// Dispatches jobs to the use cases and builds the envelope.
pub struct JobRunner<M>
where
    M: MarketDataPort,
{
    compute_vwap: ComputeVwapUseCase<M>,
    forward: ForwardRequestUseCase<M>,
    defaults: JobDefaults,
}

impl<M> JobRunner<M>
where
    M: MarketDataPort,
{
    /// Create a runner over one market-data provider.
    pub fn new(market_data: Arc<M>, resolver: QuoteAssetResolver, defaults: JobDefaults) -> Self {
        Self {
            compute_vwap: ComputeVwapUseCase::new(Arc::clone(&market_data), resolver),
            forward: ForwardRequestUseCase::new(market_data),
            defaults,
        }
    }

    /// Defaults applied to VWAP jobs.
    pub const fn defaults(&self) -> &JobDefaults {
        &self.defaults
    }

    /// Run a job. Never fails: errors become an errored envelope.
    pub async fn run(&self, job: JobRequest, entrypoint: Entrypoint) -> JobResponse {
        let kind = JobKind::of(&job.data);
        let span = tracing::info_span!(
            "job",
            job_run_id = %job.id,
            entrypoint = entrypoint.as_str(),
            kind = kind.as_str(),
        );

        async move {
            tracing::info!("Received request");

            let JobRequest { id, data } = job;
            let outcome = match kind {
                JobKind::Vwap => self.run_vwap(&id, &data).await,
                JobKind::Forward => self.run_forward(&id, &data).await,
            };

            match outcome {
                Ok(response) => {
                    tracing::info!(status_code = response.status_code, "Job finished");
                    response
                }
                Err(error) => {
                    tracing::warn!(
                        code = %error.code(),
                        status_code = error.status_code(),
                        error = %error,
                        "Job failed"
                    );
                    JobResponse::from_error(id, &error)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run_vwap(&self, id: &str, data: &JobData) -> Result<JobResponse, JobError> {
        let base = match data.base_asset.as_deref() {
            Some(raw) => AssetCode::parse(raw)?,
            None => self.defaults.base_asset.clone(),
        };
        let interval = match data.interval.as_deref() {
            Some(raw) => Interval::parse(raw)?,
            None => self.defaults.interval,
        };

        let report = self.compute_vwap.execute(&base, &interval).await?;
        let result = report.price.to_string();
        let payload =
            serde_json::to_value(&report).map_err(|e| JobError::Internal(e.to_string()))?;

        Ok(JobResponse::success(id, payload, 200).with_result(result))
    }

    async fn run_forward(&self, id: &str, data: &JobData) -> Result<JobResponse, JobError> {
        let response = self.forward.execute(data).await?;

        if response.is_error() {
            Ok(JobResponse::errored(id, response.body, response.status))
        } else {
            Ok(JobResponse::success(id, response.body, response.status))
        }
    }
}
