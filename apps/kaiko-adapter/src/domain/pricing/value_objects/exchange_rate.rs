//! Direct exchange rate sample.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::shared::AssetCode;

/// Most recent price and traded volume for one base/quote market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    /// Asset being priced.
    pub base: AssetCode,
    /// Asset the price is expressed in.
    pub quote: AssetCode,
    /// Price of one unit of `base` in `quote`.
    pub price: Decimal,
    /// Volume traded over the interval, in units of `base`.
    pub volume: Decimal,
    /// Start of the interval the sample covers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ExchangeRate {
    /// Create a new exchange rate sample.
    #[must_use]
    pub const fn new(base: AssetCode, quote: AssetCode, price: Decimal, volume: Decimal) -> Self {
        Self {
            base,
            quote,
            price,
            volume,
            timestamp: None,
        }
    }

    /// Attach the sample timestamp.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Market pair label, e.g. `ampl-usdt`.
    #[must_use]
    pub fn pair(&self) -> String {
        format!("{}-{}", self.base, self.quote)
    }
}
