//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid date format.
    #[error("Invalid date format: {0}. Use YYYY-MM-DD.")]
    InvalidDate(String),

    /// Invalid price.
    #[error("Invalid price: {0}. Must be positive.")]
    InvalidPrice(f64),

    /// Invalid coupon rate.
    #[error("Invalid coupon rate: {0}. Must be between 0 and 100.")]
    InvalidCoupon(f64),

    /// Price file cannot be read or parsed.
    #[error("Cannot read prices from {path}: {reason}")]
    PriceFile {
        /// File that failed.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Timestamp cell that is neither a date nor a date-time.
    #[error("Invalid timestamp '{value}' on line {line}. Use YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS.")]
    InvalidTimestamp {
        /// 1-based line in the price file.
        line: u64,
        /// Offending cell.
        value: String,
    },

    /// No prices for a requested ISIN.
    #[error("No prices for {0} in the price file")]
    NoPrices(String),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
