//! Kaiko Market Data Adapter
//!
//! Implementation of `MarketDataPort` for the Kaiko REST API with:
//! - Direct exchange rate lookups per base/quote pair
//! - Validated pass-through forwarding of raw requests
//! - Retry logic with exponential backoff

mod adapter;
mod api_types;
mod config;
mod error;
mod http_client;

pub use adapter::KaikoMarketDataAdapter;
pub use config::{KaikoConfig, RetryConfig};
pub use error::KaikoError;
pub use http_client::KAIKO_USER_AGENT;
