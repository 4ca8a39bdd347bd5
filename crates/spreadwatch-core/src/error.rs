//! Error types for the core crate.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while building dates, frequencies or conventions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Date does not exist on the calendar or could not be parsed.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Coupon frequency is not one of the supported values.
    #[error("Invalid coupon frequency: {value} (expected one of 1, 2, 3, 4, 6, 12)")]
    InvalidFrequency {
        /// The rejected payments-per-year value.
        value: i64,
    },

    /// Day count convention name was not recognised.
    #[error("Unknown day count convention: '{name}'")]
    UnknownDayCount {
        /// The name as supplied.
        name: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid frequency error.
    #[must_use]
    pub fn invalid_frequency(value: i64) -> Self {
        Self::InvalidFrequency { value }
    }

    /// Creates an unknown day count error.
    #[must_use]
    pub fn unknown_day_count(name: impl Into<String>) -> Self {
        Self::UnknownDayCount { name: name.into() }
    }
}
