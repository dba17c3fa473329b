//! Application Ports (Driven)
//!
//! Ports define interfaces for interacting with external systems.
//! The adapter has a single driven port: the market-data provider.

mod market_data_port;

pub use market_data_port::{ForwardRequest, ForwardedResponse, MarketDataError, MarketDataPort};
