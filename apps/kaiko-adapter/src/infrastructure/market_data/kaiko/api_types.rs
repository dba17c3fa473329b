//! Kaiko API response types.
//!
//! These types map directly to Kaiko's REST API format.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use super::error::KaikoError;
use crate::domain::pricing::ExchangeRate;
use crate::domain::shared::AssetCode;

// ============================================================================
// Direct Exchange Rate
// ============================================================================

/// Response of the `spot_direct_exchange_rate` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectExchangeRateResponse {
    /// Samples, most recent first.
    #[serde(default)]
    pub data: Vec<DirectExchangeRateSample>,
}

/// One interval of the direct exchange rate series.
///
/// `price` and `volume` are null when the interval saw no trades. Kaiko sends
/// decimals as strings; numbers are accepted as well and read from their
/// source text, never through `f64`.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectExchangeRateSample {
    /// Interval start, milliseconds since the epoch.
    #[serde(default)]
    pub timestamp: Option<i64>,
    /// Price of the base in the quote.
    #[serde(default)]
    pub price: Option<Value>,
    /// Base volume traded over the interval.
    #[serde(default)]
    pub volume: Option<Value>,
}

impl DirectExchangeRateResponse {
    /// Most recent sample as an exchange rate.
    pub fn into_exchange_rate(
        self,
        base: &AssetCode,
        quote: &AssetCode,
    ) -> Result<ExchangeRate, KaikoError> {
        let pair = format!("{base}-{quote}");
        let sample = self
            .data
            .into_iter()
            .next()
            .ok_or_else(|| KaikoError::NoData { pair: pair.clone() })?;

        let price = parse_decimal(sample.price.as_ref(), &pair, "price")?;
        let volume = parse_decimal(sample.volume.as_ref(), &pair, "volume")?;

        let rate = ExchangeRate::new(base.clone(), quote.clone(), price, volume);
        Ok(
            match sample.timestamp.and_then(DateTime::<Utc>::from_timestamp_millis) {
                Some(timestamp) => rate.with_timestamp(timestamp),
                None => rate,
            },
        )
    }
}

fn parse_decimal(
    value: Option<&Value>,
    pair: &str,
    field: &'static str,
) -> Result<Decimal, KaikoError> {
    let raw = match value {
        None | Some(Value::Null) => {
            return Err(KaikoError::MissingField {
                pair: pair.to_string(),
                field,
            });
        }
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    };

    Decimal::from_str_exact(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| KaikoError::InvalidField {
            pair: pair.to_string(),
            field,
            value: raw,
        })
}

// ============================================================================
// Errors
// ============================================================================

/// Error body returned by Kaiko.
#[derive(Debug, Clone, Deserialize)]
pub struct KaikoErrorResponse {
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
}
