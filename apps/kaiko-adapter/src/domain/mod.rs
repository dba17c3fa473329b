//! Domain Layer
//!
//! Pure pricing logic with no I/O: asset identifiers, observations and the
//! VWAP aggregator.

pub mod pricing;
pub mod shared;
