//! Pricing Bounded Context
//!
//! Turns per-market price/volume observations into one blended price.
//!
//! - `value_objects`: `Observation`, `ExchangeRate`, `AggregateResult`
//! - `services`: the VWAP aggregator and the quote asset resolver
//! - `exact`: arbitrary-precision sums and products
//! - `errors`: `VwapError`

pub mod errors;
pub mod exact;
pub mod services;
pub mod value_objects;

pub use errors::VwapError;
pub use services::{DEFAULT_QUOTE_ASSETS, QuoteAssetResolver, VWAP_PRICE_SCALE, calculate_vwap};
pub use value_objects::{AggregateResult, ExchangeRate, Observation};
