//! Asset code value object for base and quote assets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::shared::DomainError;

/// A market-data asset identifier (e.g. "ampl", "usdt", "btc").
///
/// Always lowercase ASCII alphanumeric, as used in Kaiko URL paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetCode(String);

impl AssetCode {
    /// Maximum accepted length.
    pub const MAX_LEN: usize = 16;

    /// Parse and normalize an asset code.
    ///
    /// Input is trimmed and lowercased.
    ///
    /// # Errors
    ///
    /// Returns error if the code is empty, too long, or not alphanumeric.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let normalized = value.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(DomainError::invalid_value(
                "asset",
                "Asset code cannot be empty",
            ));
        }

        if normalized.len() > Self::MAX_LEN {
            return Err(DomainError::invalid_value(
                "asset",
                format!("Asset code exceeds {} characters", Self::MAX_LEN),
            ));
        }

        if !normalized.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::invalid_value(
                "asset",
                format!("Asset code must be alphanumeric: {normalized}"),
            ));
        }

        Ok(Self(normalized))
    }

    /// The US dollar, the terminal quote asset for every blended price.
    #[must_use]
    pub fn usd() -> Self {
        Self("usd".to_string())
    }

    /// Check whether this is the US dollar.
    #[must_use]
    pub fn is_usd(&self) -> bool {
        self.0 == "usd"
    }

    /// Get the code string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AssetCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AssetCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AssetCode> for String {
    fn from(value: AssetCode) -> Self {
        value.0
    }
}
