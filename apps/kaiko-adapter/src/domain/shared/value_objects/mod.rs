//! Shared value objects.

mod asset_code;
mod interval;
mod region;

pub use asset_code::AssetCode;
pub use interval::{Interval, IntervalUnit};
pub use region::Region;
