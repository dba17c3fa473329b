//! Market Data Port (Driven Port)
//!
//! Interface for reading exchange rates from, and forwarding raw requests to,
//! an external market-data provider.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::pricing::ExchangeRate;
use crate::domain::shared::{AssetCode, Interval, Region};

/// A validated pass-through request for the market-data API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardRequest {
    /// API region to call.
    pub region: Region,
    /// Path below the API root, without a leading slash.
    pub endpoint: String,
    /// Raw query string, without the leading `?`.
    pub params: String,
}

/// Upstream answer to a forwarded request, whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardedResponse {
    /// HTTP status returned by the provider.
    pub status: u16,
    /// Response body. Non-JSON bodies are carried as a JSON string.
    pub body: Value,
}

impl ForwardedResponse {
    /// Whether the provider reported an error status.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Market data error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MarketDataError {
    /// Provider returned no sample for the pair.
    #[error("No market data for {pair}")]
    NoData {
        /// Market pair, e.g. `ampl-usdt`.
        pair: String,
    },

    /// Provider returned a sample with a null field.
    #[error("Market data for {pair} is missing {field}")]
    MissingField {
        /// Market pair.
        pair: String,
        /// The missing field.
        field: &'static str,
    },

    /// Authentication failed.
    #[error("Market data authentication failed")]
    AuthenticationFailed,

    /// Rate limited and out of retries.
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Provider rejected the request.
    #[error("Market data API error ({status}): {message}")]
    Api {
        /// HTTP status.
        status: u16,
        /// Error details.
        message: String,
    },

    /// Transport failure.
    #[error("Market data connection error: {message}")]
    Network {
        /// Error details.
        message: String,
    },

    /// Response body could not be decoded.
    #[error("Market data decode error: {message}")]
    Decode {
        /// Error details.
        message: String,
    },

    /// Retries exhausted.
    #[error("Max retries exceeded after {attempts} attempts")]
    MaxRetriesExceeded {
        /// Number of attempts made.
        attempts: u32,
    },
}

/// Port for the external market-data provider.
///
/// Implementations must be safe to call concurrently; the VWAP use case
/// issues one call per quote market at the same time.
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Most recent direct exchange rate for `base`/`quote` over `interval`.
    async fn direct_exchange_rate(
        &self,
        base: &AssetCode,
        quote: &AssetCode,
        interval: &Interval,
    ) -> Result<ExchangeRate, MarketDataError>;

    /// Forward a raw request and return the provider's answer as-is.
    async fn forward(&self, request: ForwardRequest) -> Result<ForwardedResponse, MarketDataError>;
}
