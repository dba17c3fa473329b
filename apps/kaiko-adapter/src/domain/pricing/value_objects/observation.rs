//! Observation value object: one constituent market of a blended price.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::pricing::VwapError;
use crate::domain::pricing::exact;
use crate::domain::pricing::value_objects::ExchangeRate;
use crate::domain::shared::AssetCode;

/// One market's most recent USD-denominated price and traded volume.
///
/// Price and volume are never negative; every constructor checks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    quote_asset: AssetCode,
    price: Decimal,
    volume: Decimal,
}

impl Observation {
    /// Create an observation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if price or volume is negative.
    pub fn new(quote_asset: AssetCode, price: Decimal, volume: Decimal) -> Result<Self, VwapError> {
        if price < Decimal::ZERO {
            return Err(VwapError::invalid_input(format!(
                "negative price {price} for quote asset {quote_asset}"
            )));
        }
        if volume < Decimal::ZERO {
            return Err(VwapError::invalid_input(format!(
                "negative volume {volume} for quote asset {quote_asset}"
            )));
        }

        Ok(Self {
            quote_asset,
            price,
            volume,
        })
    }

    /// Create an observation from decimal strings.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if either string is not a decimal number, has
    /// more digits than a `Decimal` holds, or is negative.
    pub fn parse(quote_asset: AssetCode, price: &str, volume: &str) -> Result<Self, VwapError> {
        let price = Decimal::from_str_exact(price.trim()).map_err(|e| {
            VwapError::invalid_input(format!("non-numeric price {price:?}: {e}"))
        })?;
        let volume = Decimal::from_str_exact(volume.trim()).map_err(|e| {
            VwapError::invalid_input(format!("non-numeric volume {volume:?}: {e}"))
        })?;
        Self::new(quote_asset, price, volume)
    }

    /// Observation for a market quoted directly in USD.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the rate is not quoted in USD or carries a
    /// negative value.
    pub fn direct(rate: &ExchangeRate) -> Result<Self, VwapError> {
        if !rate.quote.is_usd() {
            return Err(VwapError::invalid_input(format!(
                "{} is not quoted in usd",
                rate.pair()
            )));
        }
        Self::new(rate.quote.clone(), rate.price, rate.volume)
    }

    /// Observation for a market quoted in another asset, converted to USD
    /// through a second rate.
    ///
    /// The price is `base_leg.price * usd_leg.price`; the volume is the
    /// first leg's volume, since that is the market being observed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the legs do not chain (`base -> quote -> usd`),
    /// `Overflow` if the exact product does not fit a `Decimal`.
    pub fn chained(base_leg: &ExchangeRate, usd_leg: &ExchangeRate) -> Result<Self, VwapError> {
        if base_leg.quote != usd_leg.base || !usd_leg.quote.is_usd() {
            return Err(VwapError::invalid_input(format!(
                "cannot chain {} with {}",
                base_leg.pair(),
                usd_leg.pair()
            )));
        }

        let price = exact::mul(base_leg.price, usd_leg.price)?;

        Self::new(base_leg.quote.clone(), price, base_leg.volume)
    }

    /// Quote asset of the observed market.
    #[must_use]
    pub const fn quote_asset(&self) -> &AssetCode {
        &self.quote_asset
    }

    /// USD price.
    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    /// Traded volume in base asset units.
    #[must_use]
    pub const fn volume(&self) -> Decimal {
        self.volume
    }
}
