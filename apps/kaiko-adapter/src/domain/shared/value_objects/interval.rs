//! Aggregation interval value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::shared::DomainError;

/// Unit of an aggregation interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalUnit {
    /// Seconds.
    Second,
    /// Minutes.
    Minute,
    /// Hours.
    Hour,
    /// Days.
    Day,
}

impl IntervalUnit {
    const fn suffix(self) -> char {
        match self {
            Self::Second => 's',
            Self::Minute => 'm',
            Self::Hour => 'h',
            Self::Day => 'd',
        }
    }

    const fn from_suffix(c: char) -> Option<Self> {
        match c {
            's' => Some(Self::Second),
            'm' => Some(Self::Minute),
            'h' => Some(Self::Hour),
            'd' => Some(Self::Day),
            _ => None,
        }
    }
}

/// Time window over which the market-data source aggregates trades.
///
/// Written as `<count><unit>`, e.g. `1m`, `4h`, `1d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Interval {
    count: u32,
    unit: IntervalUnit,
}

impl Interval {
    /// Create an interval from its parts.
    ///
    /// # Errors
    ///
    /// Returns error if `count` is zero.
    pub fn new(count: u32, unit: IntervalUnit) -> Result<Self, DomainError> {
        if count == 0 {
            return Err(DomainError::invalid_value(
                "interval",
                "Interval count must be positive",
            ));
        }
        Ok(Self { count, unit })
    }

    /// One day, the default window.
    #[must_use]
    pub const fn one_day() -> Self {
        Self {
            count: 1,
            unit: IntervalUnit::Day,
        }
    }

    /// Parse an interval such as `1d`.
    ///
    /// # Errors
    ///
    /// Returns error on an unknown unit or a non-numeric count.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let value = value.trim();
        let Some(suffix) = value.chars().last() else {
            return Err(DomainError::invalid_value(
                "interval",
                "Interval cannot be empty",
            ));
        };

        let unit = IntervalUnit::from_suffix(suffix.to_ascii_lowercase()).ok_or_else(|| {
            DomainError::invalid_value("interval", format!("Unknown interval unit: {suffix}"))
        })?;

        let digits = &value[..value.len() - suffix.len_utf8()];
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::invalid_value(
                "interval",
                format!("Invalid interval count: {value}"),
            ));
        }

        let count: u32 = digits.parse().map_err(|_| {
            DomainError::invalid_value("interval", format!("Interval count out of range: {value}"))
        })?;

        Self::new(count, unit)
    }

    /// Number of units.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Interval unit.
    #[must_use]
    pub const fn unit(&self) -> IntervalUnit {
        self.unit
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::one_day()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.unit.suffix())
    }
}

impl FromStr for Interval {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Interval {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Interval> for String {
    fn from(value: Interval) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("1m", 1, IntervalUnit::Minute ; "one minute")]
    #[test_case("4h", 4, IntervalUnit::Hour ; "four hours")]
    #[test_case("1d", 1, IntervalUnit::Day ; "one day")]
    #[test_case("30s", 30, IntervalUnit::Second ; "thirty seconds")]
    #[test_case("1D", 1, IntervalUnit::Day ; "uppercase unit")]
    fn parse_valid(input: &str, count: u32, unit: IntervalUnit) {
        let interval = Interval::parse(input).unwrap();
        assert_eq!(interval.count(), count);
        assert_eq!(interval.unit(), unit);
    }

    #[test_case("" ; "empty")]
    #[test_case("d" ; "missing count")]
    #[test_case("0d" ; "zero count")]
    #[test_case("1w" ; "unknown unit")]
    #[test_case("-1d" ; "negative count")]
    #[test_case("1.5h" ; "fractional count")]
    #[test_case("99999999999d" ; "count overflow")]
    fn parse_invalid(input: &str) {
        assert!(Interval::parse(input).is_err());
    }

    #[test]
    fn display_is_canonical() {
        assert_eq!(Interval::parse("1D").unwrap().to_string(), "1d");
        assert_eq!(Interval::default().to_string(), "1d");
    }
}
