//! In-memory market data for tests and local runs.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::application::ports::{
    ForwardRequest, ForwardedResponse, MarketDataError, MarketDataPort,
};
use crate::domain::pricing::ExchangeRate;
use crate::domain::shared::{AssetCode, Interval};

/// Market data served from a fixed table of rates.
///
/// Unknown pairs answer `NoData`. Forwarded requests are recorded and answered
/// with the configured response, or `200 {}`.
#[derive(Debug, Default)]
pub struct StaticMarketData {
    rates: RwLock<HashMap<(AssetCode, AssetCode), (Decimal, Decimal)>>,
    forward_response: RwLock<Option<ForwardedResponse>>,
    forwarded: RwLock<Vec<ForwardRequest>>,
}

impl StaticMarketData {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rate for a pair.
    pub fn set_rate(&self, base: &AssetCode, quote: &AssetCode, price: Decimal, volume: Decimal) {
        self.rates
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((base.clone(), quote.clone()), (price, volume));
    }

    /// Builder form of [`Self::set_rate`].
    #[must_use]
    pub fn with_rate(
        self,
        base: &AssetCode,
        quote: &AssetCode,
        price: Decimal,
        volume: Decimal,
    ) -> Self {
        self.set_rate(base, quote, price, volume);
        self
    }

    /// Answer every forward with `status` and `body`.
    pub fn set_forward_response(&self, status: u16, body: Value) {
        *self
            .forward_response
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(ForwardedResponse { status, body });
    }

    /// Requests forwarded so far.
    #[must_use]
    pub fn forwarded(&self) -> Vec<ForwardRequest> {
        self.forwarded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl MarketDataPort for StaticMarketData {
    async fn direct_exchange_rate(
        &self,
        base: &AssetCode,
        quote: &AssetCode,
        _interval: &Interval,
    ) -> Result<ExchangeRate, MarketDataError> {
        let rates = self.rates.read().unwrap_or_else(PoisonError::into_inner);
        rates
            .get(&(base.clone(), quote.clone()))
            .map(|(price, volume)| ExchangeRate::new(base.clone(), quote.clone(), *price, *volume))
            .ok_or_else(|| MarketDataError::NoData {
                pair: format!("{base}-{quote}"),
            })
    }

    async fn forward(&self, request: ForwardRequest) -> Result<ForwardedResponse, MarketDataError> {
        self.forwarded
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        Ok(self
            .forward_response
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or(ForwardedResponse {
                status: 200,
                body: Value::Object(serde_json::Map::new()),
            }))
    }
}
