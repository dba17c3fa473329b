//! Market-data API region.

use std::fmt;
use std::str::FromStr;

use crate::domain::shared::DomainError;

/// Regional deployment of the Kaiko market-data API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    /// United States cluster.
    #[default]
    Us,
    /// European cluster.
    Eu,
}

impl Region {
    /// Parse a region, accepting only the exact lowercase names.
    ///
    /// # Errors
    ///
    /// Returns error for anything other than `us` or `eu`.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "us" => Ok(Self::Us),
            "eu" => Ok(Self::Eu),
            other => Err(DomainError::invalid_value(
                "region",
                format!("Unknown region: {other}"),
            )),
        }
    }

    /// Region name as used in the API host.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Us => "us",
            Self::Eu => "eu",
        }
    }

    /// Base URL of the market-data API for this region.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("https://{}.market-api.kaiko.io", self.as_str())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
