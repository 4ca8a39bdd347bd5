//! # Spreadwatch Analytics
//!
//! Series analytics on top of [`spreadwatch_bonds`]:
//!
//! - **Valuation**: clean-price series to yield series, one settlement date
//!   per observation, failures recorded per point
//! - **Spreads**: timestamp alignment of two yield series and spreads in
//!   basis points
//! - **Statistics**: rolling mean, sample standard deviation, percentiles
//!   and z-score over calendar-day or observation windows
//! - **Signals**: z-score and percentile-band classification
//! - **Backtest**: a mean-reversion strategy over one pair or many
//!
//! ## Example
//!
//! ```rust
//! use spreadwatch_analytics::prelude::*;
//! use chrono::NaiveDate;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let a: Vec<_> = [5.0, 5.2, 5.1].iter().enumerate()
//!     .map(|(i, &y)| YieldObservation::solved(day(i as u32 + 1), "A", y))
//!     .collect();
//! let b: Vec<_> = [4.8, 4.9, 5.0].iter().enumerate()
//!     .map(|(i, &y)| YieldObservation::solved(day(i as u32 + 1), "B", y))
//!     .collect();
//!
//! let spreads = compute_spread(&a, &b);
//! let stats = summarize(&spreads, Window::Full);
//! assert!((stats.mean.unwrap() - 20.0).abs() < 1e-9);
//! assert_eq!(classify(stats.z_score, 2.0), Signal::Neutral);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::float_cmp)]

pub mod backtest;
pub mod error;
pub mod observations;
pub mod parallel;
pub mod signals;
pub mod spreads;
pub mod stats;
pub mod valuation;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::backtest::{
        run_backtest, run_pair_backtests, BacktestConfig, BacktestReport, EntryRule, ExitReason, PairBacktest,
        PairPnl, StrategyMetrics, Trade,
    };
    pub use crate::error::{AnalyticsError, AnalyticsResult};
    pub use crate::observations::{
        coverage, Coverage, PriceObservation, SpreadObservation, ValuationStatus, YieldObservation,
    };
    pub use crate::signals::{
        classify, classify_against_reference, classify_percentile_rank, classify_stats, filter_signals,
        PercentileBands, PercentileSignal, Signal, SignalDirection, SignalGenerator, TradingSignal,
    };
    pub use crate::spreads::{
        align, compute_pair_spreads, compute_spread, compute_spread_checked, compute_spread_with,
        detect_anomalies, duration_weighted_spread, outer_join, percentile_rank, spread_changes, JoinKind,
        PairSpreads, SpreadPair,
    };
    pub use crate::stats::{compute_rolling_stats, summarize, z_score, RollingStats, Window};
    pub use crate::valuation::{
        compute_yield_series, compute_yield_series_with, value_universe, BondSeries, SeriesValuer,
    };
}

pub use error::{AnalyticsError, AnalyticsResult};
pub use observations::{PriceObservation, SpreadObservation, YieldObservation};
pub use signals::{classify, Signal};
pub use spreads::compute_spread;
pub use stats::{compute_rolling_stats, RollingStats, Window};
pub use valuation::compute_yield_series;
