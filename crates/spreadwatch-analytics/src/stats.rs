//! Rolling descriptive statistics of a spread series.
//!
//! Statistics need at least two finite values in the window; below that
//! every field is `None`. Non-finite spreads are left out of the window and
//! counted in [`RollingStats::skipped`]. Standard deviation is the sample
//! (n − 1) one and percentiles interpolate linearly between ranks.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use spreadwatch_math::statistics::{mean, percentile_sorted, sample_std_dev, sorted};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::observations::SpreadObservation;

/// Default trailing window, in calendar days.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Finite values needed before any statistic is defined.
pub const MIN_STAT_POINTS: usize = 2;

/// Trailing window ending at each point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "size", rename_all = "snake_case")]
pub enum Window {
    /// Points with `timestamp > current − n days`.
    CalendarDays(u32),
    /// The last `n` points, the current one included.
    Observations(usize),
    /// Every point up to the current one.
    Full,
}

impl Default for Window {
    fn default() -> Self {
        Window::CalendarDays(DEFAULT_WINDOW_DAYS)
    }
}

impl Window {
    /// Points of `series[..=end]` inside the window ending at `end`.
    ///
    /// `series` must be ascending by timestamp.
    pub fn slice<'a>(&self, series: &'a [SpreadObservation], end: usize) -> &'a [SpreadObservation] {
        let head = &series[..=end];
        let start = match *self {
            Window::Full => 0,
            Window::Observations(n) => head.len().saturating_sub(n.max(1)),
            Window::CalendarDays(days) => {
                // a cutoff before the earliest representable date keeps the whole head
                match series[end].timestamp.checked_sub_signed(Duration::days(i64::from(days))) {
                    Some(cutoff) => head.partition_point(|s| s.timestamp <= cutoff).min(end),
                    None => 0,
                }
            }
        };
        &head[start..]
    }
}

/// Descriptive statistics of one window, in basis points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RollingStats {
    /// Timestamp of the point the window ends at.
    pub timestamp: Option<NaiveDateTime>,
    /// Finite values in the window.
    pub count: usize,
    /// Non-finite values left out of the window.
    pub skipped: usize,
    /// Mean.
    pub mean: Option<f64>,
    /// Sample standard deviation.
    pub std: Option<f64>,
    /// Minimum.
    pub min: Option<f64>,
    /// Maximum.
    pub max: Option<f64>,
    /// 10th percentile.
    pub p10: Option<f64>,
    /// 25th percentile.
    pub p25: Option<f64>,
    /// Median.
    pub p50: Option<f64>,
    /// 75th percentile.
    pub p75: Option<f64>,
    /// 90th percentile.
    pub p90: Option<f64>,
    /// Value at the window's end point.
    pub current: Option<f64>,
    /// `(current − mean) / std`; `None` when `std` is zero.
    pub z_score: Option<f64>,
}

impl RollingStats {
    /// Statistics over `values`, with `current` as the point being scored.
    pub fn from_values(values: &[f64], current: f64, timestamp: Option<NaiveDateTime>) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let undefined = Self {
            timestamp,
            count: finite.len(),
            skipped: values.len() - finite.len(),
            ..Self::default()
        };
        if finite.len() < MIN_STAT_POINTS {
            return undefined;
        }

        let ordered = sorted(&finite);
        let mean = mean(&finite);
        let std = sample_std_dev(&finite);
        let current = Some(current).filter(|c| c.is_finite());
        let z_score = match (current, mean, std) {
            (Some(c), Some(m), Some(s)) => z_score(c, m, s).ok(),
            _ => None,
        };

        Self {
            mean,
            std,
            min: ordered.first().copied(),
            max: ordered.last().copied(),
            p10: percentile_sorted(&ordered, 10.0),
            p25: percentile_sorted(&ordered, 25.0),
            p50: percentile_sorted(&ordered, 50.0),
            p75: percentile_sorted(&ordered, 75.0),
            p90: percentile_sorted(&ordered, 90.0),
            current,
            z_score,
            ..undefined
        }
    }

    /// True once the window holds enough data for statistics.
    pub fn is_defined(&self) -> bool {
        self.mean.is_some()
    }
}

/// Number of standard deviations `current` lies from `mean`.
///
/// # Errors
///
/// `UndefinedStatistic` when `std` is zero or any input is not finite.
pub fn z_score(current: f64, mean: f64, std: f64) -> AnalyticsResult<f64> {
    if !(current.is_finite() && mean.is_finite() && std.is_finite()) {
        return Err(AnalyticsError::undefined("z_score", "non-finite input"));
    }
    if std == 0.0 {
        return Err(AnalyticsError::undefined("z_score", "standard deviation is zero"));
    }
    Ok((current - mean) / std)
}

/// Statistics of the window ending at each point, one per input point.
///
/// `spreads` must be ascending by timestamp.
pub fn compute_rolling_stats(spreads: &[SpreadObservation], window: Window) -> Vec<RollingStats> {
    (0..spreads.len()).map(|i| stats_at(spreads, i, window)).collect()
}

/// Statistics of the window ending at the last point; fully undefined for
/// an empty series.
pub fn summarize(spreads: &[SpreadObservation], window: Window) -> RollingStats {
    match spreads.len() {
        0 => RollingStats::default(),
        n => stats_at(spreads, n - 1, window),
    }
}

fn stats_at(spreads: &[SpreadObservation], end: usize, window: Window) -> RollingStats {
    let values: Vec<f64> = window.slice(spreads, end).iter().map(|s| s.spread_bp).collect();
    let point = spreads[end];
    RollingStats::from_values(&values, point.spread_bp, Some(point.timestamp))
}
