//! Data Transfer Objects (DTOs)
//!
//! DTOs are used for API boundaries and use case inputs/outputs.

mod job_dto;
mod vwap_dto;

pub use job_dto::{DEFAULT_JOB_RUN_ID, JobData, JobRequest, JobResponse};
pub use vwap_dto::VwapReport;
