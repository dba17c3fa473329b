//! Pricing value objects.

mod aggregate_result;
mod exchange_rate;
mod observation;

pub use aggregate_result::AggregateResult;
pub use exchange_rate::ExchangeRate;
pub use observation::Observation;
