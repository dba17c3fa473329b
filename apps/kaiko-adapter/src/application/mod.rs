//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces for interacting with the market-data provider
//! - **Use Cases**: VWAP pricing, request forwarding and job dispatch
//! - **DTOs**: Job envelope and payloads at the API boundary

pub mod dto;
pub mod ports;
pub mod use_cases;

pub use dto::*;
pub use ports::*;
pub use use_cases::*;
