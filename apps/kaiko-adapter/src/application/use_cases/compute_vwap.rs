//! Compute VWAP Use Case

use std::sync::Arc;

use futures::future::try_join_all;

use crate::application::dto::VwapReport;
use crate::application::ports::MarketDataPort;
use crate::domain::pricing::{Observation, QuoteAssetResolver, VwapError, calculate_vwap};
use crate::domain::shared::{AssetCode, Interval};
use crate::error::JobError;

/// Use case for blending a base asset's quote markets into one USD price.
pub struct ComputeVwapUseCase<M>
where
    M: MarketDataPort,
{
    market_data: Arc<M>,
    resolver: QuoteAssetResolver,
}

impl<M> ComputeVwapUseCase<M>
where
    M: MarketDataPort,
{
    /// Create a new `ComputeVwapUseCase`.
    pub const fn new(market_data: Arc<M>, resolver: QuoteAssetResolver) -> Self {
        Self {
            market_data,
            resolver,
        }
    }

    /// Fetch one observation per quote market and aggregate them.
    ///
    /// All markets are fetched concurrently; the first failure aborts the job.
    pub async fn execute(
        &self,
        base: &AssetCode,
        interval: &Interval,
    ) -> Result<VwapReport, JobError> {
        let quotes = self.resolver.resolve(base);
        if quotes.is_empty() {
            return Err(
                VwapError::invalid_input(format!("no quote assets configured for {base}")).into(),
            );
        }

        tracing::debug!(
            base = %base,
            interval = %interval,
            quotes = ?quotes.iter().map(AssetCode::as_str).collect::<Vec<_>>(),
            "Fetching quote markets"
        );

        let constituents =
            try_join_all(quotes.iter().map(|quote| self.observe(base, quote, interval))).await?;

        let aggregate = calculate_vwap(&constituents)?;

        tracing::info!(
            base = %base,
            interval = %interval,
            price = %aggregate.price(),
            volume = %aggregate.volume(),
            markets = constituents.len(),
            "VWAP computed"
        );

        Ok(VwapReport::new(base.clone(), *interval, aggregate, constituents))
    }

    /// One market's observation, in USD.
    ///
    /// Non-USD quotes are converted through the quote's own USD rate; both
    /// legs are fetched concurrently.
    async fn observe(
        &self,
        base: &AssetCode,
        quote: &AssetCode,
        interval: &Interval,
    ) -> Result<Observation, JobError> {
        if quote.is_usd() {
            let rate = self
                .market_data
                .direct_exchange_rate(base, quote, interval)
                .await?;
            return Ok(Observation::direct(&rate)?);
        }

        let usd = AssetCode::usd();
        let (base_leg, usd_leg) = tokio::try_join!(
            self.market_data.direct_exchange_rate(base, quote, interval),
            self.market_data.direct_exchange_rate(quote, &usd, interval),
        )?;

        Ok(Observation::chained(&base_leg, &usd_leg)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{ForwardRequest, ForwardedResponse, MarketDataError};
    use crate::domain::pricing::ExchangeRate;
    use crate::error::ErrorCode;
    use async_trait::async_trait;
    use mockall::mock;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

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

    fn asset(code: &str) -> AssetCode {
        AssetCode::parse(code).unwrap()
    }

    fn rate(base: &AssetCode, quote: &AssetCode, price: Decimal, volume: Decimal) -> ExchangeRate {
        ExchangeRate::new(base.clone(), quote.clone(), price, volume)
    }

    /// Answers every pair from a fixed table.
    fn market_with(table: Vec<(&'static str, &'static str, Decimal, Decimal)>) -> MockMarket {
        let mut market = MockMarket::new();
        market
            .expect_direct_exchange_rate()
            .returning(move |base, quote, _| {
                table
                    .iter()
                    .find(|(b, q, _, _)| *b == base.as_str() && *q == quote.as_str())
                    .map(|(_, _, price, volume)| rate(base, quote, *price, *volume))
                    .ok_or_else(|| MarketDataError::NoData {
                        pair: format!("{base}-{quote}"),
                    })
            });
        market
    }

    #[tokio::test]
    async fn blends_direct_and_chained_markets() {
        let market = market_with(vec![
            ("ampl", "usd", dec!(1.00), dec!(100)),
            ("ampl", "eth", dec!(0.0005), dec!(300)),
            ("eth", "usd", dec!(2000), dec!(5000)),
        ]);
        let resolver = QuoteAssetResolver::new(vec![asset("usd"), asset("eth")]);
        let use_case = ComputeVwapUseCase::new(Arc::new(market), resolver);

        let report = use_case
            .execute(&asset("ampl"), &Interval::one_day())
            .await
            .unwrap();

        // eth leg: 0.0005 * 2000 = 1.0 USD, volume 300 from the ampl-eth market
        assert_eq!(report.volume, dec!(400));
        assert_eq!(report.price, dec!(1));
        assert_eq!(report.constituents.len(), 2);
        assert_eq!(report.constituents[1].quote_asset().as_str(), "eth");
        assert_eq!(report.constituents[1].volume(), dec!(300));
    }

    #[tokio::test]
    async fn missing_market_fails_the_job() {
        let market = market_with(vec![("ampl", "usd", dec!(1.00), dec!(100))]);
        let resolver = QuoteAssetResolver::new(vec![asset("usd"), asset("usdt")]);
        let use_case = ComputeVwapUseCase::new(Arc::new(market), resolver);

        let err = use_case
            .execute(&asset("ampl"), &Interval::one_day())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::UpstreamUnavailable);
    }

    #[tokio::test]
    async fn zero_volume_everywhere_is_division_by_zero() {
        let market = market_with(vec![("ampl", "usd", dec!(1.00), dec!(0))]);
        let resolver = QuoteAssetResolver::new(vec![asset("usd")]);
        let use_case = ComputeVwapUseCase::new(Arc::new(market), resolver);

        let err = use_case
            .execute(&asset("ampl"), &Interval::one_day())
            .await
            .unwrap_err();

        assert!(matches!(err, JobError::Aggregation(VwapError::DivisionByZero)));
    }

    #[tokio::test]
    async fn no_quotes_is_invalid_input() {
        let mut market = MockMarket::new();
        market.expect_direct_exchange_rate().never();
        let resolver = QuoteAssetResolver::new(vec![asset("usd")]);
        let use_case = ComputeVwapUseCase::new(Arc::new(market), resolver);

        let err = use_case
            .execute(&asset("usd"), &Interval::one_day())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::InvalidInput);
    }

    #[tokio::test]
    async fn one_lookup_per_usd_market_and_two_per_chained_market() {
        let mut market = MockMarket::new();
        market
            .expect_direct_exchange_rate()
            .times(3)
            .returning(|base, quote, _| Ok(rate(base, quote, dec!(2), dec!(10))));
        let resolver = QuoteAssetResolver::new(vec![asset("usd"), asset("btc")]);
        let use_case = ComputeVwapUseCase::new(Arc::new(market), resolver);

        let report = use_case
            .execute(&asset("link"), &Interval::one_day())
            .await
            .unwrap();

        // usd market at 2, btc market at 2 * 2 = 4, equal volumes
        assert_eq!(report.price, dec!(3));
        assert_eq!(report.volume, dec!(20));
    }
}
