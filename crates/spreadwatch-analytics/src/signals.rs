//! Trading signals from spread deviation.
//!
//! Two classifiers:
//!
//! - [`classify`]: z-score against a symmetric threshold, giving
//!   [`Signal::Buy`] / [`Signal::Sell`] / [`Signal::Neutral`]
//! - [`SignalGenerator`]: percentile bands of the spread history, giving a
//!   graded [`PercentileSignal`] with direction, confidence and the expected
//!   reversion to the mean
//!
//! An undefined statistic is always neutral (or `NoData`), never an error.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use spreadwatch_math::statistics::{percentile_sorted, sorted};

use crate::observations::SpreadObservation;
use crate::parallel::{maybe_parallel_map, DEFAULT_PARALLEL_THRESHOLD};
use crate::spreads::{percentile_rank, PairSpreads};
use crate::stats::{summarize, RollingStats, Window};

/// Default z-score threshold, in standard deviations.
pub const DEFAULT_Z_THRESHOLD: f64 = 2.0;

/// Documented range for z-score thresholds; enforced by callers.
pub const Z_THRESHOLD_RANGE: (f64, f64) = (1.0, 3.0);

/// Spread points required before a percentile signal is produced.
pub const DEFAULT_MIN_HISTORY: usize = 20;

/// Confidence below which [`SignalGenerator::filter`] drops a signal.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.3;

/// Z-score signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    /// Spread abnormally narrow; expect widening.
    Buy,
    /// Spread abnormally wide; expect narrowing.
    Sell,
    /// Inside the band, or undefined.
    Neutral,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Neutral => "NEUTRAL",
        };
        write!(f, "{s}")
    }
}

/// Classifies a z-score against `threshold`.
///
/// Strict inequalities: a z-score exactly at `±threshold` is neutral.
/// The threshold is not validated here.
///
/// ```rust
/// use spreadwatch_analytics::signals::{classify, Signal};
///
/// assert_eq!(classify(Some(2.1), 2.0), Signal::Sell);
/// assert_eq!(classify(Some(2.0), 2.0), Signal::Neutral);
/// assert_eq!(classify(Some(-2.5), 2.0), Signal::Buy);
/// assert_eq!(classify(None, 2.0), Signal::Neutral);
/// ```
pub fn classify(z_score: Option<f64>, threshold: f64) -> Signal {
    match z_score {
        Some(z) if z > threshold => Signal::Sell,
        Some(z) if z < -threshold => Signal::Buy,
        _ => Signal::Neutral,
    }
}

/// Classifies the z-score of a statistics window.
pub fn classify_stats(stats: &RollingStats, threshold: f64) -> Signal {
    classify(stats.z_score, threshold)
}

/// Z-score signal of one intraday point against a static reference band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceSignal {
    /// Intraday timestamp.
    pub timestamp: NaiveDateTime,
    /// Intraday spread.
    pub spread_bp: f64,
    /// Z-score against the reference mean and standard deviation.
    pub z_score: Option<f64>,
    /// Resulting signal.
    pub signal: Signal,
}

/// Scores each intraday spread against statistics computed on the daily
/// series, so the band does not move with intraday noise.
pub fn classify_against_reference(
    intraday: &[SpreadObservation],
    reference: &RollingStats,
    threshold: f64,
) -> Vec<ReferenceSignal> {
    intraday
        .iter()
        .map(|obs| {
            let z_score = match (reference.mean, reference.std) {
                (Some(mean), Some(std)) => crate::stats::z_score(obs.spread_bp, mean, std).ok(),
                _ => None,
            };
            ReferenceSignal {
                timestamp: obs.timestamp,
                spread_bp: obs.spread_bp,
                z_score,
                signal: classify(z_score, threshold),
            }
        })
        .collect()
}

/// Percentile-band signal strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PercentileSignal {
    /// At or below the outer low band.
    StrongBuy,
    /// At or below the inner low band.
    Buy,
    /// Between the inner bands.
    Neutral,
    /// At or above the inner high band.
    Sell,
    /// At or above the outer high band.
    StrongSell,
    /// Not enough history.
    NoData,
}

impl PercentileSignal {
    /// Position implied by the signal.
    pub fn direction(&self) -> SignalDirection {
        match self {
            PercentileSignal::StrongBuy | PercentileSignal::Buy => SignalDirection::LongShort,
            PercentileSignal::StrongSell | PercentileSignal::Sell => SignalDirection::ShortLong,
            PercentileSignal::Neutral | PercentileSignal::NoData => SignalDirection::Flat,
        }
    }
}

impl fmt::Display for PercentileSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PercentileSignal::StrongBuy => "STRONG_BUY",
            PercentileSignal::Buy => "BUY",
            PercentileSignal::Neutral => "NEUTRAL",
            PercentileSignal::Sell => "SELL",
            PercentileSignal::StrongSell => "STRONG_SELL",
            PercentileSignal::NoData => "NO_DATA",
        };
        write!(f, "{s}")
    }
}

/// Position on the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalDirection {
    /// Long the first bond, short the second: profits as the spread widens.
    LongShort,
    /// Short the first bond, long the second: profits as the spread narrows.
    ShortLong,
    /// No position.
    Flat,
}

impl SignalDirection {
    /// +1 for `LongShort`, −1 for `ShortLong`, 0 when flat.
    pub fn sign(&self) -> f64 {
        match self {
            SignalDirection::LongShort => 1.0,
            SignalDirection::ShortLong => -1.0,
            SignalDirection::Flat => 0.0,
        }
    }
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalDirection::LongShort => "LONG_SHORT",
            SignalDirection::ShortLong => "SHORT_LONG",
            SignalDirection::Flat => "FLAT",
        };
        write!(f, "{s}")
    }
}

/// Percentile levels delimiting the signal zones, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileBands {
    /// Outer low band (default P10).
    pub strong_low: f64,
    /// Inner low band (default P25).
    pub low: f64,
    /// Inner high band (default P75).
    pub high: f64,
    /// Outer high band (default P90).
    pub strong_high: f64,
}

impl Default for PercentileBands {
    fn default() -> Self {
        Self {
            strong_low: 10.0,
            low: 25.0,
            high: 75.0,
            strong_high: 90.0,
        }
    }
}

impl PercentileBands {
    /// True when `0 < strong_low < low < high < strong_high < 100`.
    pub fn is_ordered(&self) -> bool {
        0.0 < self.strong_low
            && self.strong_low < self.low
            && self.low < self.high
            && self.high < self.strong_high
            && self.strong_high < 100.0
    }
}

/// Classifies a percentile rank (0–100) against `bands`, outer bands first.
pub fn classify_percentile_rank(rank: Option<f64>, bands: &PercentileBands) -> PercentileSignal {
    match rank {
        None => PercentileSignal::NoData,
        Some(r) if r <= bands.strong_low => PercentileSignal::StrongBuy,
        Some(r) if r >= bands.strong_high => PercentileSignal::StrongSell,
        Some(r) if r <= bands.low => PercentileSignal::Buy,
        Some(r) if r >= bands.high => PercentileSignal::Sell,
        Some(_) => PercentileSignal::Neutral,
    }
}

/// Full signal for one pair at the latest spread.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradingSignal {
    /// Pair name.
    pub pair_name: String,
    /// ISIN of the first bond.
    pub isin_a: String,
    /// ISIN of the second bond.
    pub isin_b: String,
    /// Timestamp of the latest spread.
    pub timestamp: Option<NaiveDateTime>,
    /// Percentile-band strength.
    pub strength: PercentileSignal,
    /// Z-score signal for the same window.
    pub z_signal: Signal,
    /// Position implied by `strength`.
    pub direction: SignalDirection,
    /// Confidence in [0, 1].
    pub confidence: f64,
    /// Latest spread, bp.
    pub spread_bp: Option<f64>,
    /// Mean of the window, bp.
    pub mean_bp: Option<f64>,
    /// Z-score of the latest spread.
    pub z_score: Option<f64>,
    /// Percentile rank of the latest spread in the window.
    pub percentile_rank: Option<f64>,
    /// Move back to the mean in the position's favour, bp.
    pub expected_return_bp: f64,
}

impl TradingSignal {
    /// True for any non-neutral signal with data.
    pub fn is_actionable(&self) -> bool {
        self.direction != SignalDirection::Flat
    }
}

/// Builds [`TradingSignal`]s from spread histories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalGenerator {
    /// Percentile bands.
    pub bands: PercentileBands,
    /// Z-score threshold for [`TradingSignal::z_signal`].
    pub z_threshold: f64,
    /// History window.
    pub window: Window,
    /// Finite spreads required in the window.
    pub min_history: usize,
    /// Confidence kept by [`SignalGenerator::filter`].
    pub min_confidence: f64,
}

impl Default for SignalGenerator {
    fn default() -> Self {
        Self {
            bands: PercentileBands::default(),
            z_threshold: DEFAULT_Z_THRESHOLD,
            window: Window::Full,
            min_history: DEFAULT_MIN_HISTORY,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

impl SignalGenerator {
    /// Signal at the last point of `spreads` (ascending by timestamp).
    pub fn generate(
        &self,
        pair_name: &str,
        isin_a: &str,
        isin_b: &str,
        spreads: &[SpreadObservation],
    ) -> TradingSignal {
        let stats = summarize(spreads, self.window);
        let mut signal = TradingSignal {
            pair_name: pair_name.to_string(),
            isin_a: isin_a.to_string(),
            isin_b: isin_b.to_string(),
            timestamp: stats.timestamp,
            strength: PercentileSignal::NoData,
            z_signal: Signal::Neutral,
            direction: SignalDirection::Flat,
            confidence: 0.0,
            spread_bp: None,
            mean_bp: None,
            z_score: None,
            percentile_rank: None,
            expected_return_bp: 0.0,
        };

        let (Some(current), Some(mean)) = (stats.current, stats.mean) else {
            return signal;
        };
        if stats.count < self.min_history {
            return signal;
        }

        let window = match spreads.len() {
            0 => spreads,
            n => self.window.slice(spreads, n - 1),
        };
        let values: Vec<f64> = window
            .iter()
            .map(|s| s.spread_bp)
            .filter(|v| v.is_finite())
            .collect();
        let ordered = sorted(&values);
        let level = |p: f64| percentile_sorted(&ordered, p).unwrap_or(current);

        let (strength, confidence) = classify_levels(
            current,
            level(self.bands.strong_low),
            level(self.bands.low),
            level(self.bands.high),
            level(self.bands.strong_high),
            stats.z_score,
        );
        let direction = strength.direction();

        signal.strength = strength;
        signal.direction = direction;
        signal.confidence = confidence;
        signal.z_signal = classify(stats.z_score, self.z_threshold);
        signal.spread_bp = Some(current);
        signal.mean_bp = Some(mean);
        signal.z_score = stats.z_score;
        signal.percentile_rank = percentile_rank(current, window);
        signal.expected_return_bp = direction.sign() * (mean - current);
        signal
    }

    /// Signals for every pair, in the order given.
    pub fn generate_all(&self, pairs: &[PairSpreads]) -> Vec<TradingSignal> {
        maybe_parallel_map(pairs, DEFAULT_PARALLEL_THRESHOLD, |history| {
            let pair = &history.pair;
            self.generate(&pair.name, &pair.isin_a, &pair.isin_b, &history.spreads)
        })
    }

    /// Actionable signals with at least [`SignalGenerator::min_confidence`].
    pub fn filter(&self, signals: Vec<TradingSignal>) -> Vec<TradingSignal> {
        filter_signals(signals, self.min_confidence, true)
    }
}

/// Drops `NoData` signals, signals below `min_confidence`, and neutral
/// signals when `exclude_neutral` is set.
pub fn filter_signals(signals: Vec<TradingSignal>, min_confidence: f64, exclude_neutral: bool) -> Vec<TradingSignal> {
    signals
        .into_iter()
        .filter(|s| s.strength != PercentileSignal::NoData)
        .filter(|s| !(exclude_neutral && s.strength == PercentileSignal::Neutral))
        .filter(|s| s.confidence >= min_confidence)
        .collect()
}

/// Zone of `current` relative to the band levels, outer zones first.
fn classify_levels(
    current: f64,
    strong_low: f64,
    low: f64,
    high: f64,
    strong_high: f64,
    z_score: Option<f64>,
) -> (PercentileSignal, f64) {
    let strong_confidence = || (z_score.unwrap_or(0.0).abs() / 3.0).clamp(0.7, 1.0);
    let graded = |distance: f64, width: f64| {
        if width > 0.0 {
            (0.4 + 0.3 * distance / width).min(0.7)
        } else {
            0.4
        }
    };

    if current <= strong_low {
        (PercentileSignal::StrongBuy, strong_confidence())
    } else if current >= strong_high {
        (PercentileSignal::StrongSell, strong_confidence())
    } else if current <= low {
        (PercentileSignal::Buy, graded(low - current, low - strong_low))
    } else if current >= high {
        (PercentileSignal::Sell, graded(current - high, strong_high - high))
    } else {
        (PercentileSignal::Neutral, 0.2)
    }
}
