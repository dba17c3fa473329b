//! Shared Kernel
//!
//! Value objects and errors used across the domain.

mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::{AssetCode, Interval, IntervalUnit, Region};
