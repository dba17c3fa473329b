//! Pricing domain services.

mod quote_resolver;
mod vwap;

pub use quote_resolver::{DEFAULT_QUOTE_ASSETS, QuoteAssetResolver};
pub use vwap::{VWAP_PRICE_SCALE, calculate_vwap};
