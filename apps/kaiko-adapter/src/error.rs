//! Job error taxonomy.
//!
//! Every failure a job can hit is reduced to a [`JobError`], which knows the
//! status code and the stable reason string reported in the response
//! envelope.
//!
//! | Code | HTTP | Usage |
//! |------|------|-------|
//! | `INVALID_REQUEST` | 400 | Malformed job data (asset, interval, region, endpoint, params) |
//! | `INVALID_INPUT` | 400 | Nothing to aggregate, or a negative/non-numeric observation |
//! | `DIVISION_BY_ZERO` | 422 | Every constituent volume is zero |
//! | `DECIMAL_OVERFLOW` | 422 | Aggregation left the decimal range |
//! | `UPSTREAM_AUTH` | 401 | Provider rejected the API key |
//! | `UPSTREAM_RATE_LIMITED` | 429 | Provider rate limit, retries exhausted |
//! | `UPSTREAM_ERROR` | passthrough | Provider returned a 4xx |
//! | `UPSTREAM_UNAVAILABLE` | 502 | No data, transport or decode failure |
//! | `INTERNAL` | 500 | Response could not be built |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::MarketDataError;
use crate::domain::pricing::VwapError;
use crate::domain::shared::DomainError;

/// Stable error codes for job failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed job data.
    InvalidRequest,
    /// Empty or invalid aggregation input.
    InvalidInput,
    /// All constituent volumes are zero.
    DivisionByZero,
    /// Decimal range exceeded.
    DecimalOverflow,
    /// Provider authentication failed.
    UpstreamAuth,
    /// Provider rate limit.
    UpstreamRateLimited,
    /// Provider rejected the request.
    UpstreamError,
    /// Provider unreachable or returned unusable data.
    UpstreamUnavailable,
    /// Internal failure.
    Internal,
}

impl ErrorCode {
    /// Get the error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::InvalidInput => "INVALID_INPUT",
            Self::DivisionByZero => "DIVISION_BY_ZERO",
            Self::DecimalOverflow => "DECIMAL_OVERFLOW",
            Self::UpstreamAuth => "UPSTREAM_AUTH",
            Self::UpstreamRateLimited => "UPSTREAM_RATE_LIMITED",
            Self::UpstreamError => "UPSTREAM_ERROR",
            Self::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            Self::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// A failed job.
#[derive(Debug, Clone, Error)]
pub enum JobError {
    /// Job data failed validation.
    #[error("{0}")]
    InvalidRequest(String),

    /// Aggregation failed.
    #[error(transparent)]
    Aggregation(#[from] VwapError),

    /// Market data could not be obtained.
    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    /// Internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl JobError {
    /// Invalid request with a message.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Stable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidRequest(_) => ErrorCode::InvalidRequest,
            Self::Internal(_) => ErrorCode::Internal,
            Self::Aggregation(VwapError::InvalidInput { .. }) => ErrorCode::InvalidInput,
            Self::Aggregation(VwapError::DivisionByZero) => ErrorCode::DivisionByZero,
            Self::Aggregation(VwapError::Overflow) => ErrorCode::DecimalOverflow,
            Self::MarketData(MarketDataError::AuthenticationFailed) => ErrorCode::UpstreamAuth,
            Self::MarketData(MarketDataError::RateLimited { .. }) => {
                ErrorCode::UpstreamRateLimited
            }
            Self::MarketData(MarketDataError::Api { .. }) => ErrorCode::UpstreamError,
            Self::MarketData(
                MarketDataError::NoData { .. }
                | MarketDataError::MissingField { .. }
                | MarketDataError::Network { .. }
                | MarketDataError::Decode { .. }
                | MarketDataError::MaxRetriesExceeded { .. },
            ) => ErrorCode::UpstreamUnavailable,
        }
    }

    /// HTTP status code reported for this failure.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::MarketData(MarketDataError::Api { status, .. }) => *status,
            _ => match self.code() {
                ErrorCode::InvalidRequest | ErrorCode::InvalidInput => 400,
                ErrorCode::UpstreamAuth => 401,
                ErrorCode::DivisionByZero | ErrorCode::DecimalOverflow => 422,
                ErrorCode::UpstreamRateLimited => 429,
                ErrorCode::UpstreamError | ErrorCode::UpstreamUnavailable => 502,
                ErrorCode::Internal => 500,
            },
        }
    }
}

impl From<DomainError> for JobError {
    fn from(err: DomainError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}
