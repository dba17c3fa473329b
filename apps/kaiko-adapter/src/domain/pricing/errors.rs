//! Pricing errors.

use thiserror::Error;

/// Errors raised while building observations or aggregating them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VwapError {
    /// Empty input, or an observation with a negative or non-numeric value.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// Observations were supplied but their volumes sum to exactly zero.
    #[error("Division by zero: total volume is zero")]
    DivisionByZero,

    /// A result needs more digits than the decimal type holds exactly.
    #[error("Decimal overflow during aggregation")]
    Overflow,
}

impl VwapError {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
