//! VWAP job payload.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::pricing::{AggregateResult, Observation};
use crate::domain::shared::{AssetCode, Interval};

/// Blended price for a base asset, with the observations it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VwapReport {
    /// Asset that was priced.
    pub base_asset: AssetCode,
    /// Aggregation interval.
    pub interval: Interval,
    /// Volume-weighted USD price.
    pub price: Decimal,
    /// Total volume across constituents.
    pub volume: Decimal,
    /// Per-market observations.
    pub constituents: Vec<Observation>,
}

impl VwapReport {
    /// Build a report from an aggregate and its inputs.
    #[must_use]
    pub const fn new(
        base_asset: AssetCode,
        interval: Interval,
        aggregate: AggregateResult,
        constituents: Vec<Observation>,
    ) -> Self {
        Self {
            base_asset,
            interval,
            price: aggregate.price(),
            volume: aggregate.volume(),
            constituents,
        }
    }
}
