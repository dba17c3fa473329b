//! Infrastructure Layer
//!
//! This module contains all adapters (implementations) for the ports defined
//! in the application layer. Following hexagonal architecture:
//!
//! - **Driven Adapters (Outbound)**: Implement ports for external systems
//!   - `market_data/`: Kaiko REST adapter and an in-memory table
//!
//! - **Driver Adapters (Inbound)**: Expose application to external world
//!   - `http/`: Job, health and metrics endpoints
//!   - `event/`: One-shot event callback
//!
//! - **Process plumbing**
//!   - `config/`: Environment configuration
//!   - `telemetry/`: Logging and OTLP tracing
//!   - `metrics/`: Prometheus metrics

pub mod config;
pub mod event;
pub mod http;
pub mod market_data;
pub mod metrics;
pub mod telemetry;
