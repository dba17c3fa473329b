//! Kaiko-specific error types.

use thiserror::Error;

use crate::application::ports::MarketDataError;

/// Errors from the Kaiko adapter.
#[derive(Debug, Error, Clone)]
pub enum KaikoError {
    /// HTTP client could not be built.
    #[error("HTTP error: {0}")]
    Http(String),

    /// API returned an error status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// Authentication failed.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Suggested retry delay in seconds.
        retry_after_secs: u64,
    },

    /// Network error (retryable).
    #[error("Network error: {0}")]
    Network(String),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// Max retries exceeded.
    #[error("Max retries exceeded after {attempts} attempts")]
    MaxRetriesExceeded {
        /// Number of attempts made before giving up.
        attempts: u32,
    },

    /// Empty `data` array.
    #[error("No data for {pair}")]
    NoData {
        /// Market pair.
        pair: String,
    },

    /// Sample with a null price or volume.
    #[error("Missing {field} for {pair}")]
    MissingField {
        /// Market pair.
        pair: String,
        /// Field that was null.
        field: &'static str,
    },

    /// Field present but not a decimal.
    #[error("Invalid {field} for {pair}: {value}")]
    InvalidField {
        /// Market pair.
        pair: String,
        /// Offending field.
        field: &'static str,
        /// Raw value.
        value: String,
    },
}

impl From<KaikoError> for MarketDataError {
    fn from(err: KaikoError) -> Self {
        match err {
            KaikoError::Http(message) | KaikoError::Network(message) => Self::Network { message },
            KaikoError::JsonParse(message) => Self::Decode { message },
            KaikoError::InvalidField { pair, field, value } => Self::Decode {
                message: format!("invalid {field} for {pair}: {value}"),
            },
            KaikoError::Api { status, message } => Self::Api { status, message },
            KaikoError::AuthenticationFailed => Self::AuthenticationFailed,
            KaikoError::RateLimited { retry_after_secs } => Self::RateLimited { retry_after_secs },
            KaikoError::MaxRetriesExceeded { attempts } => Self::MaxRetriesExceeded { attempts },
            KaikoError::NoData { pair } => Self::NoData { pair },
            KaikoError::MissingField { pair, field } => Self::MissingField { pair, field },
        }
    }
}
