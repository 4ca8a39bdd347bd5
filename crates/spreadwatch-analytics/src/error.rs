//! Error types for series analytics.

use spreadwatch_bonds::BondError;
use thiserror::Error;

/// A specialized Result type for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Errors raised by series analytics.
///
/// Per-point valuation failures inside a series are not errors: they are
/// recorded on the [`YieldObservation`](crate::observations::YieldObservation)
/// and the batch continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// Series too short for the requested operation, or no overlapping points.
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData {
        /// Points required.
        required: usize,
        /// Points available.
        actual: usize,
    },

    /// Statistic cannot be computed (zero variance, missing mean, ...).
    #[error("Undefined statistic {statistic}: {reason}")]
    UndefinedStatistic {
        /// Name of the statistic.
        statistic: &'static str,
        /// Why it is undefined.
        reason: String,
    },

    /// Bond valuation error.
    #[error("Bond error: {0}")]
    Bond(#[from] BondError),
}

impl AnalyticsError {
    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// Creates an undefined statistic error.
    #[must_use]
    pub fn undefined(statistic: &'static str, reason: impl Into<String>) -> Self {
        Self::UndefinedStatistic {
            statistic,
            reason: reason.into(),
        }
    }
}
