//! Forward Request Use Case
//!
//! Validates a raw Kaiko request from job data and forwards it unchanged.
//! Only trade aggregation and direct exchange rate endpoints may be reached.

use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::application::dto::JobData;
use crate::application::ports::{ForwardRequest, ForwardedResponse, MarketDataPort};
use crate::domain::shared::Region;
use crate::error::JobError;

/// Endpoints that may be forwarded, relative to the API root.
const ENDPOINT_PATTERN: &str = r"^v1/data/trades\.v[0-9]+/(exchanges/[^?/]+/[^?/]+/[^?/]+/aggregations/[^?/]+|spot_direct_exchange_rate/[^?/]+/[^?/]+)/recent$";

#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn endpoint_regex() -> &'static Regex {
    static ENDPOINT_REGEX: OnceLock<Regex> = OnceLock::new();
    ENDPOINT_REGEX.get_or_init(|| Regex::new(ENDPOINT_PATTERN).expect("endpoint regex is valid"))
}

/// Check the forward fields of a job and build the request.
///
/// Checks run in order region, endpoint, params; the first failure wins.
pub fn validate_forward(data: &JobData) -> Result<ForwardRequest, JobError> {
    let region = data
        .region
        .as_deref()
        .and_then(|r| Region::parse(r).ok())
        .ok_or_else(|| JobError::invalid_request("Invalid region"))?;

    let endpoint = data
        .endpoint
        .as_deref()
        .filter(|e| endpoint_regex().is_match(e))
        .ok_or_else(|| JobError::invalid_request("Invalid endpoint"))?;

    let params = data
        .params
        .as_deref()
        .filter(|p| !p.is_empty() && p.is_ascii())
        .ok_or_else(|| JobError::invalid_request("Invalid params"))?;

    Ok(ForwardRequest {
        region,
        endpoint: endpoint.to_string(),
        params: params.to_string(),
    })
}

/// Use case for forwarding a raw request to the market-data API.
pub struct ForwardRequestUseCase<M>
where
    M: MarketDataPort,
{
    market_data: Arc<M>,
}

impl<M> ForwardRequestUseCase<M>
where
    M: MarketDataPort,
{
    /// Create a new `ForwardRequestUseCase`.
    pub const fn new(market_data: Arc<M>) -> Self {
        Self { market_data }
    }

    /// Validate and forward. The upstream status is returned, not mapped.
    pub async fn execute(&self, data: &JobData) -> Result<ForwardedResponse, JobError> {
        let request = validate_forward(data)?;

        tracing::info!(
            region = %request.region,
            endpoint = %request.endpoint,
            "Forwarding request"
        );

        let response = self.market_data.forward(request).await?;

        tracing::info!(status_code = response.status, "Got response");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MarketDataError;
    use crate::domain::pricing::ExchangeRate;
    use crate::domain::shared::{AssetCode, Interval};
    use async_trait::async_trait;
    use mockall::mock;
    use serde_json::json;
    use test_case::test_case;

    mock! {
        Market {}

        #[async_trait]
        impl MarketDataPort for Market {
            async fn direct_exchange_rate(
                &self,
                base: &AssetCode,
                quote: &AssetCode,
                interval: &Interval,
            ) -> Result<ExchangeRate, MarketDataError>;

            async fn forward(&self, request: ForwardRequest) -> Result<ForwardedResponse, MarketDataError>;
        }
    }

    fn job(region: &str, endpoint: &str, params: &str) -> JobData {
        JobData {
            region: Some(region.to_string()),
            endpoint: Some(endpoint.to_string()),
            params: Some(params.to_string()),
            ..JobData::default()
        }
    }

    const DIRECT: &str = "v1/data/trades.v1/spot_direct_exchange_rate/link/usdt/recent";

    #[test_case("v1/data/trades.v1/exchanges/cbse/spot/btc-usd/aggregations/ohlcv/recent" ; "ohlcv")]
    #[test_case("v1/data/trades.v1/exchanges/cbse/spot/btc-usd/aggregations/vwap/recent" ; "vwap")]
    #[test_case("v1/data/trades.v2/exchanges/cbse/spot/btc-usd/aggregations/count_ohlcv_vwap/recent" ; "count ohlcv vwap")]
    #[test_case(DIRECT ; "direct exchange rate")]
    fn accepts_known_endpoints(endpoint: &str) {
        let request = validate_forward(&job("us", endpoint, "interval=1m&limit=2")).unwrap();
        assert_eq!(request.endpoint, endpoint);
        assert_eq!(request.params, "interval=1m&limit=2");
    }

    #[test_case("/v1/data/trades.v1/spot_direct_exchange_rate/link/usdt/recent" ; "leading slash")]
    #[test_case("v1/data/trades.v1/spot_direct_exchange_rate/link/usdt/recent?x=1" ; "query in endpoint")]
    #[test_case("v1/data/trades.vX/spot_direct_exchange_rate/link/usdt/recent" ; "bad version")]
    #[test_case("v1/data/order_book_snapshots.v1/exchanges/cbse/spot/btc-usd/snapshots/recent" ; "other dataset")]
    #[test_case("v1/data/trades.v1/spot_direct_exchange_rate/link/usdt/recent/../../x" ; "traversal")]
    fn rejects_unknown_endpoints(endpoint: &str) {
        let err = validate_forward(&job("us", endpoint, "interval=1m")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid endpoint");
    }

    #[test_case("asia" ; "unknown region")]
    #[test_case("US" ; "uppercase")]
    #[test_case("" ; "empty")]
    fn rejects_bad_region(region: &str) {
        let err = validate_forward(&job(region, DIRECT, "interval=1m")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid region");
    }

    #[test_case("" ; "empty")]
    #[test_case("interval=1m&base=\u{e9}" ; "non ascii")]
    fn rejects_bad_params(params: &str) {
        let err = validate_forward(&job("eu", DIRECT, params)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid params");
    }

    #[test]
    fn region_is_checked_first() {
        let data = JobData {
            endpoint: Some("nope".to_string()),
            ..JobData::default()
        };
        let err = validate_forward(&data).unwrap_err();
        assert_eq!(err.to_string(), "Invalid region");
    }

    #[tokio::test]
    async fn forwards_valid_request() {
        let mut market = MockMarket::new();
        market
            .expect_forward()
            .withf(|request| request.region == Region::Eu && request.params == "interval=1m&limit=2")
            .times(1)
            .returning(|_| {
                Ok(ForwardedResponse {
                    status: 200,
                    body: json!({ "result": "success", "data": [] }),
                })
            });
        let use_case = ForwardRequestUseCase::new(Arc::new(market));

        let response = use_case
            .execute(&job("eu", DIRECT, "interval=1m&limit=2"))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body["result"], "success");
    }

    #[tokio::test]
    async fn invalid_request_never_reaches_provider() {
        let mut market = MockMarket::new();
        market.expect_forward().never();
        let use_case = ForwardRequestUseCase::new(Arc::new(market));

        let err = use_case
            .execute(&job("us", "v1/admin", "a=b"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 400);
    }
}
