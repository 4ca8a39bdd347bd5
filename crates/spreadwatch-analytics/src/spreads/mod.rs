//! Yield spreads between two bonds.
//!
//! `spread_bp = (ytm_a − ytm_b) × 100`, defined only where both series have
//! a solved yield at the aligned timestamp. Alignment happens first; the
//! two series are never assumed to have equal length.

mod alignment;

pub use alignment::{align, outer_join, AlignedPair, JoinKind, OuterRow};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use spreadwatch_math::statistics;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::observations::{SpreadObservation, YieldObservation};
use crate::parallel::{maybe_parallel_map, DEFAULT_PARALLEL_THRESHOLD};
use crate::stats::{compute_rolling_stats, Window};

/// Duration the duration-weighted spread is normalised to, in years.
pub const NORMALISED_DURATION_YEARS: f64 = 10.0;

/// Spread in basis points between two yields given in percent.
pub fn spread_bp(ytm_a: f64, ytm_b: f64) -> f64 {
    (ytm_a - ytm_b) * 100.0
}

/// Spreads at identical timestamps.
///
/// ```rust
/// use chrono::NaiveDate;
/// use spreadwatch_analytics::prelude::*;
///
/// let ts = |d| NaiveDate::from_ymd_opt(2025, 5, d).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let a = [YieldObservation::solved(ts(1), "A", 5.0), YieldObservation::solved(ts(2), "A", 5.2)];
/// let b = [YieldObservation::solved(ts(1), "B", 4.8), YieldObservation::solved(ts(2), "B", 4.9)];
///
/// let spreads = compute_spread(&a, &b);
/// assert!((spreads[0].spread_bp - 20.0).abs() < 1e-9);
/// assert!((spreads[1].spread_bp - 30.0).abs() < 1e-9);
/// ```
pub fn compute_spread(a: &[YieldObservation], b: &[YieldObservation]) -> Vec<SpreadObservation> {
    compute_spread_with(a, b, JoinKind::Exact)
}

/// Spreads over the points aligned by `join`, ascending by timestamp.
pub fn compute_spread_with(
    a: &[YieldObservation],
    b: &[YieldObservation],
    join: JoinKind,
) -> Vec<SpreadObservation> {
    align(a, b, join)
        .into_iter()
        .map(|p| SpreadObservation::new(p.timestamp, spread_bp(p.a, p.b)))
        .collect()
}

/// Like [`compute_spread_with`], failing when nothing overlaps.
///
/// # Errors
///
/// `InsufficientData` if alignment produced no points.
pub fn compute_spread_checked(
    a: &[YieldObservation],
    b: &[YieldObservation],
    join: JoinKind,
) -> AnalyticsResult<Vec<SpreadObservation>> {
    let spreads = compute_spread_with(a, b, join);
    if spreads.is_empty() {
        return Err(AnalyticsError::insufficient_data(1, 0));
    }
    Ok(spreads)
}

/// A named pair of bonds; spreads are `ytm(isin_a) − ytm(isin_b)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpreadPair {
    /// Pair name.
    pub name: String,
    /// First bond (minuend).
    pub isin_a: String,
    /// Second bond (subtrahend).
    pub isin_b: String,
}

impl SpreadPair {
    /// Creates a pair.
    pub fn new(name: impl Into<String>, isin_a: impl Into<String>, isin_b: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            isin_a: isin_a.into(),
            isin_b: isin_b.into(),
        }
    }
}

/// Spread history of one pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairSpreads {
    /// The pair.
    pub pair: SpreadPair,
    /// Aligned spreads, ascending by timestamp.
    pub spreads: Vec<SpreadObservation>,
}

impl PairSpreads {
    /// Most recent finite spread.
    pub fn latest(&self) -> Option<&SpreadObservation> {
        self.spreads.iter().rev().find(|s| s.spread_bp.is_finite())
    }
}

/// Spread histories for every pair with yields for both legs.
///
/// Output follows the order of `pairs`; a pair with a missing leg is left
/// out with a warning.
pub fn compute_pair_spreads(
    yields: &HashMap<String, Vec<YieldObservation>>,
    pairs: &[SpreadPair],
    join: JoinKind,
) -> Vec<PairSpreads> {
    maybe_parallel_map(pairs, DEFAULT_PARALLEL_THRESHOLD, |pair| {
        let (Some(a), Some(b)) = (yields.get(&pair.isin_a), yields.get(&pair.isin_b)) else {
            log::warn!("no yields for pair {} ({} / {})", pair.name, pair.isin_a, pair.isin_b);
            return None;
        };
        Some(PairSpreads {
            pair: pair.clone(),
            spreads: compute_spread_with(a, b, join),
        })
    })
    .into_iter()
    .flatten()
    .collect()
}

/// Change of the spread over `periods` points; `None` for the first
/// `periods` points.
pub fn spread_changes(spreads: &[SpreadObservation], periods: usize) -> Vec<Option<f64>> {
    (0..spreads.len())
        .map(|i| {
            let prev = i.checked_sub(periods.max(1))?;
            Some(spreads[i].spread_bp - spreads[prev].spread_bp)
        })
        .collect()
}

/// Flags points more than `threshold_std` standard deviations from the
/// mean of the last `window` points, the point itself included.
///
/// Points before the window has filled are never flagged.
pub fn detect_anomalies(spreads: &[SpreadObservation], window: usize, threshold_std: f64) -> Vec<bool> {
    compute_rolling_stats(spreads, Window::Observations(window))
        .iter()
        .zip(spreads)
        .map(|(stats, obs)| match (stats.mean, stats.std) {
            (Some(mean), Some(std)) if stats.count >= window => {
                (obs.spread_bp - mean).abs() > threshold_std * std
            }
            _ => false,
        })
        .collect()
}

/// Spread scaled to a [`NORMALISED_DURATION_YEARS`] duration using the
/// average duration of the pair; `None` unless the average is positive.
pub fn duration_weighted_spread(ytm_a: f64, ytm_b: f64, duration_a: f64, duration_b: f64) -> Option<f64> {
    let average = (duration_a + duration_b) / 2.0;
    (average > 0.0).then(|| spread_bp(ytm_a, ytm_b) / average * NORMALISED_DURATION_YEARS)
}

/// Share of finite spreads strictly below `current`, in percent.
///
/// `None` for a series without finite values.
pub fn percentile_rank(current: f64, spreads: &[SpreadObservation]) -> Option<f64> {
    let values: Vec<f64> = spreads
        .iter()
        .map(|s| s.spread_bp)
        .filter(|v| v.is_finite())
        .collect();
    statistics::percentile_rank(current, &values)
}
