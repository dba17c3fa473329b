//! Kaiko market-data adapter implementing `MarketDataPort`.

use async_trait::async_trait;

use super::api_types::DirectExchangeRateResponse;
use super::config::KaikoConfig;
use super::error::KaikoError;
use super::http_client::KaikoHttpClient;
use crate::application::ports::{
    ForwardRequest, ForwardedResponse, MarketDataError, MarketDataPort,
};
use crate::domain::pricing::ExchangeRate;
use crate::domain::shared::{AssetCode, Interval};

/// Kaiko implementation of [`MarketDataPort`].
#[derive(Debug, Clone)]
pub struct KaikoMarketDataAdapter {
    client: KaikoHttpClient,
    config: KaikoConfig,
}

impl KaikoMarketDataAdapter {
    /// Create a new adapter.
    pub fn new(config: KaikoConfig) -> Result<Self, KaikoError> {
        let client = KaikoHttpClient::new(&config)?;
        Ok(Self { client, config })
    }

    /// URL of the latest direct exchange rate sample for a pair.
    fn direct_exchange_rate_url(
        &self,
        base: &AssetCode,
        quote: &AssetCode,
        interval: &Interval,
    ) -> String {
        format!(
            "{}/v1/data/trades.v1/spot_direct_exchange_rate/{base}/{quote}/recent?interval={interval}&limit=1",
            self.config.base_url(self.config.region)
        )
    }
}

#[async_trait]
impl MarketDataPort for KaikoMarketDataAdapter {
    async fn direct_exchange_rate(
        &self,
        base: &AssetCode,
        quote: &AssetCode,
        interval: &Interval,
    ) -> Result<ExchangeRate, MarketDataError> {
        let url = self.direct_exchange_rate_url(base, quote, interval);
        tracing::debug!(%url, "Fetching direct exchange rate");

        let response: DirectExchangeRateResponse = self.client.get_json(&url).await?;
        Ok(response.into_exchange_rate(base, quote)?)
    }

    async fn forward(&self, request: ForwardRequest) -> Result<ForwardedResponse, MarketDataError> {
        let url = format!(
            "{}/{}?{}",
            self.config.base_url(request.region),
            request.endpoint,
            request.params
        );
        tracing::debug!(%url, "Forwarding to Kaiko");

        let (status, body) = self.client.get_raw(&url).await?;
        Ok(ForwardedResponse { status, body })
    }
}
