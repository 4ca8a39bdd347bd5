//! # Spreadwatch Math
//!
//! Numerical building blocks for the Spreadwatch engine:
//!
//! - **Solvers**: Newton-Raphson (with an optional domain guard) and Brent
//! - **Statistics**: mean, sample standard deviation, interpolated
//!   percentiles and percentile ranks over `f64` samples

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]
#![allow(clippy::float_cmp)]

pub mod error;
pub mod solvers;
pub mod statistics;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::solvers::{brent, newton_raphson, newton_raphson_guarded, SolverConfig, SolverResult};
    pub use crate::statistics::{mean, percentile, percentile_rank, sample_std_dev};
}

pub use error::{MathError, MathResult};
