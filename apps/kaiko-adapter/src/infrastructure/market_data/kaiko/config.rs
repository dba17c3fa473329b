//! Kaiko adapter configuration.

use std::fmt;
use std::time::Duration;

use crate::domain::shared::Region;

/// Configuration for the Kaiko market-data adapter.
#[derive(Clone)]
pub struct KaikoConfig {
    /// API key sent as `X-Api-Key`.
    pub api_key: String,
    /// Region used for direct exchange rate lookups.
    pub region: Region,
    /// Replaces the regional host for every request when set.
    pub base_url_override: Option<String>,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Retry policy configuration.
    pub retry: RetryConfig,
}

impl KaikoConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(api_key: String, region: Region) -> Self {
        Self {
            api_key,
            region,
            base_url_override: None,
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
        }
    }

    /// Send every request to `base_url` instead of the regional host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// API root for `region`, honouring the override.
    #[must_use]
    pub fn base_url(&self, region: Region) -> String {
        self.base_url_override
            .clone()
            .unwrap_or_else(|| region.base_url())
    }
}

impl fmt::Debug for KaikoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KaikoConfig")
            .field("api_key", &"[REDACTED]")
            .field("region", &self.region)
            .field("base_url_override", &self.base_url_override)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

/// Retry configuration.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}
