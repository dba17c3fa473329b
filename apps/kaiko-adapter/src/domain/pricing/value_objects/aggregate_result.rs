//! Blended aggregation result.

use rust_decimal::Decimal;
use serde::Serialize;

/// Volume-weighted price and total volume across all constituents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregateResult {
    price: Decimal,
    volume: Decimal,
}

impl AggregateResult {
    /// Create a new result.
    #[must_use]
    pub const fn new(price: Decimal, volume: Decimal) -> Self {
        Self { price, volume }
    }

    /// Volume-weighted mean price.
    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    /// Sum of constituent volumes.
    #[must_use]
    pub const fn volume(&self) -> Decimal {
        self.volume
    }
}
