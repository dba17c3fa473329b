//! Market Data Adapters
//!
//! Implementations of `MarketDataPort` for the Kaiko API and for tests.

pub mod kaiko;
pub mod mock;

pub use kaiko::{KaikoConfig, KaikoError, KaikoMarketDataAdapter, RetryConfig};
pub use mock::StaticMarketData;
