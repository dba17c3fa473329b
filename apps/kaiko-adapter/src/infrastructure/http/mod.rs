//! HTTP Entry Point
//!
//! REST endpoint for jobs, plus health and metrics.

mod controller;
mod response;

pub use controller::{AppState, create_router};
pub use response::HealthResponse;
