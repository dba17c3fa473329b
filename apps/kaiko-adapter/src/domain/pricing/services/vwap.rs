//! VWAP Aggregator Domain Service

use bigdecimal::BigDecimal;

use crate::domain::pricing::VwapError;
use crate::domain::pricing::exact::{narrow, round_to_fit, widen};
use crate::domain::pricing::value_objects::{AggregateResult, Observation};

/// Decimal places kept in the blended price when the quotient does not
/// terminate.
///
/// Sums and products are exact; only the final quotient is rounded,
/// half away from zero. A quotient that terminates and fits a `Decimal`
/// is returned as is.
pub const VWAP_PRICE_SCALE: u32 = 20;

/// Blend observations into a volume-weighted average price.
///
/// `volume = Σ volume_i`, `price = Σ(price_i × volume_i) / volume`.
/// The result does not depend on the order of `entries`.
///
/// # Errors
///
/// - `InvalidInput` if `entries` is empty.
/// - `DivisionByZero` if every volume is zero.
/// - `Overflow` if the exact volume or the price does not fit a `Decimal`.
pub fn calculate_vwap(entries: &[Observation]) -> Result<AggregateResult, VwapError> {
    if entries.is_empty() {
        return Err(VwapError::invalid_input("no observations to aggregate"));
    }
    if entries.iter().all(|entry| entry.volume().is_zero()) {
        return Err(VwapError::DivisionByZero);
    }

    let mut volumes = Vec::with_capacity(entries.len());
    let mut weighted = Vec::with_capacity(entries.len());
    for entry in entries {
        let volume = widen(entry.volume())?;
        weighted.push(widen(entry.price())? * &volume);
        volumes.push(volume);
    }
    let total_volume: BigDecimal = volumes.into_iter().sum();
    let weighted_price_sum: BigDecimal = weighted.into_iter().sum();

    let volume = narrow(&total_volume)?;
    let quotient = &weighted_price_sum / &total_volume;
    let price = if &quotient * &total_volume == weighted_price_sum {
        narrow(&quotient).or_else(|_| round_to_fit(&quotient, VWAP_PRICE_SCALE))?
    } else {
        round_to_fit(&quotient, VWAP_PRICE_SCALE)?
    };

    Ok(AggregateResult::new(price, volume))
}
