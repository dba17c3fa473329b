//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod compute_vwap;
mod forward_request;
mod job_runner;

pub use compute_vwap::ComputeVwapUseCase;
pub use forward_request::{ForwardRequestUseCase, validate_forward};
pub use job_runner::{Entrypoint, JobDefaults, JobKind, JobRunner};
