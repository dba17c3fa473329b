//! Exact decimal arithmetic for aggregation.
//!
//! `Decimal` keeps a 96-bit mantissa and rounds anything past that.
//! Sums and products are carried in `BigDecimal` instead, and a value only
//! comes back to `Decimal` when it fits without losing a digit.

use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use rust_decimal::Decimal;

use crate::domain::pricing::VwapError;

/// Largest scale a `Decimal` can carry.
const MAX_DECIMAL_SCALE: i64 = 28;

/// Lift a `Decimal` into arbitrary precision.
pub fn widen(value: Decimal) -> Result<BigDecimal, VwapError> {
    BigDecimal::from_str(&value.to_string())
        .map_err(|e| VwapError::invalid_input(format!("unreadable decimal {value}: {e}")))
}

/// Exact product of two decimals.
///
/// # Errors
///
/// `Overflow` if the product needs more digits than a `Decimal` holds.
pub fn mul(lhs: Decimal, rhs: Decimal) -> Result<Decimal, VwapError> {
    narrow(&(widen(lhs)? * widen(rhs)?))
}

/// Convert back to `Decimal` without rounding.
///
/// # Errors
///
/// `Overflow` if the value needs a scale above 28 or a mantissa wider
/// than 96 bits.
pub fn narrow(value: &BigDecimal) -> Result<Decimal, VwapError> {
    let normalized = value.normalized();
    let (mantissa, scale) = normalized.as_bigint_and_exponent();
    let (mantissa, scale) = if scale < 0 {
        normalized.with_scale(0).as_bigint_and_exponent()
    } else {
        (mantissa, scale)
    };

    if scale > MAX_DECIMAL_SCALE {
        return Err(VwapError::Overflow);
    }
    let scale = u32::try_from(scale).map_err(|_| VwapError::Overflow)?;
    let mantissa = mantissa
        .to_string()
        .parse::<i128>()
        .map_err(|_| VwapError::Overflow)?;

    Decimal::try_from_i128_with_scale(mantissa, scale).map_err(|_| VwapError::Overflow)
}

/// Round half away from zero to at most `max_scale` places, dropping places
/// until the result fits in a `Decimal`.
///
/// # Errors
///
/// `Overflow` if even the integer part does not fit.
pub fn round_to_fit(value: &BigDecimal, max_scale: u32) -> Result<Decimal, VwapError> {
    (0..=i64::from(max_scale))
        .rev()
        .find_map(|scale| narrow(&value.with_scale_round(scale, RoundingMode::HalfUp)).ok())
        .ok_or(VwapError::Overflow)
}
