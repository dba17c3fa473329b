// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Kaiko Adapter - Rust Core Library
//!
//! Chainlink external adapter for the Kaiko market-data API. A job either
//! forwards a validated raw Kaiko request, or prices a base asset as the
//! volume-weighted average of its quote markets.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Pure pricing logic
//!   - `pricing`: VWAP aggregation, observations, quote asset resolution
//!   - `shared`: Asset codes, intervals, regions
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `MarketDataPort`
//!   - `use_cases`: `ComputeVwap`, `ForwardRequest`, `JobRunner`
//!   - `dto`: Job envelope and VWAP payload
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `market_data`: Kaiko REST adapter, in-memory table
//!   - `http` / `event`: Entry points
//!   - `config`, `telemetry`, `metrics`: Process plumbing

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

/// Job error taxonomy.
pub mod error;

// =============================================================================
// Re-exports from Clean Architecture
// =============================================================================

// Domain re-exports
pub use domain::pricing::{
    AggregateResult, ExchangeRate, Observation, QuoteAssetResolver, VWAP_PRICE_SCALE, VwapError,
    calculate_vwap,
};
pub use domain::shared::{AssetCode, DomainError, Interval, Region};

// Application re-exports
pub use application::dto::{JobData, JobRequest, JobResponse, VwapReport};
pub use application::ports::{ForwardRequest, ForwardedResponse, MarketDataError, MarketDataPort};
pub use application::use_cases::{
    ComputeVwapUseCase, Entrypoint, ForwardRequestUseCase, JobDefaults, JobRunner,
};
pub use error::{ErrorCode, JobError};

// Infrastructure re-exports
pub use infrastructure::config::{AdapterConfig, AdapterMode, ConfigError};
pub use infrastructure::event::handle_event;
pub use infrastructure::http::{AppState, create_router};
pub use infrastructure::market_data::{
    KaikoConfig, KaikoError, KaikoMarketDataAdapter, StaticMarketData,
};
