//! # Spreadwatch Configuration
//!
//! TOML configuration for the Spreadwatch tools:
//!
//! - **Solver**: tolerance and iteration bound for yield solving
//! - **Spread**: series alignment and the rolling statistics window
//! - **Signal**: z-score threshold, percentile bands and minimum history
//! - **Backtest**: entry rule, stops, costs and position sizing
//! - **Universe**: bond terms and named spread pairs
//!
//! Every field has a default, so an empty file is a valid configuration.
//! Validation is explicit through the [`Validate`] trait and reports every
//! violated rule at once.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::float_cmp)]

pub mod config;
pub mod error;
pub mod settings;
pub mod universe;

pub use config::SpreadwatchConfig;
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use settings::{SignalSettings, SolverSettings, SpreadSettings};
pub use universe::{BondEntry, PairEntry};
