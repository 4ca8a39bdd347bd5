//! Error types for bond valuation.

use spreadwatch_core::{CoreError, Date};
use thiserror::Error;

/// A specialized Result type for bond operations.
pub type BondResult<T> = Result<T, BondError>;

/// Errors that can occur while building terms or valuing a bond.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BondError {
    /// Terms or inputs cannot describe a valuable bond (missing maturity,
    /// bad frequency, non-positive price, settlement before issue, ...).
    #[error("Invalid bond terms: {reason}")]
    InvalidBondTerms {
        /// Description of what's invalid.
        reason: String,
    },

    /// Settlement is on or after maturity.
    #[error("Instrument matured: settlement {settlement} is on or after maturity {maturity}")]
    MaturedInstrument {
        /// Settlement date.
        settlement: Date,
        /// Maturity date.
        maturity: Date,
    },

    /// Yield solver exhausted its iteration bound without meeting tolerance.
    #[error("Yield did not converge after {iterations} iterations (residual: {residual:.2e})")]
    ConvergenceFailure {
        /// Number of iterations attempted.
        iterations: u32,
        /// Absolute pricing error at the last iterate, in currency units.
        residual: f64,
    },

    /// Core library error.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl BondError {
    /// Creates an invalid terms error.
    #[must_use]
    pub fn invalid_terms(reason: impl Into<String>) -> Self {
        Self::InvalidBondTerms {
            reason: reason.into(),
        }
    }

    /// Creates a matured instrument error.
    #[must_use]
    pub fn matured(settlement: Date, maturity: Date) -> Self {
        Self::MaturedInstrument {
            settlement,
            maturity,
        }
    }

    /// Creates a convergence failure error.
    #[must_use]
    pub fn convergence_failure(iterations: u32, residual: f64) -> Self {
        Self::ConvergenceFailure {
            iterations,
            residual,
        }
    }
}
