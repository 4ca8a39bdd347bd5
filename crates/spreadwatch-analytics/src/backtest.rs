//! Mean-reversion backtest over a spread series.
//!
//! Two entry rules, chosen by [`BacktestConfig::entry_rule`]:
//!
//! - [`EntryRule::ZScore`]: the rolling z-score leaves the `±entry_z` band;
//!   z above `entry_z` shorts the spread ([`SignalDirection::ShortLong`]),
//!   z below `−entry_z` goes long ([`SignalDirection::LongShort`]). The
//!   spread reverts through the rolling mean.
//! - [`EntryRule::Percentile`]: the spread sits at or below the low entry
//!   percentile (long) or at or above the high one (short) of the rolling
//!   window, and reverts through the exit percentile.
//!
//! Exits are checked in order: stop-loss, take-profit, reversion, then
//! maximum holding days. Stop-loss, take-profit and holding time only need
//! the spread itself, so they fire even when the window statistics are
//! undefined (after a data gap, or with zero variance). A position still
//! open at the end of the data is closed on the last point. One position at
//! a time, and no new entry on the point that closed a trade.
//!
//! Each position commits `position_size_pct` of the running capital; the
//! currency P&L is `pnl_bp × size / 10 000` less the commission charged on
//! entry and exit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use spreadwatch_math::statistics::{percentile_sorted, sorted};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::observations::SpreadObservation;
use crate::parallel::{maybe_parallel_map, DEFAULT_PARALLEL_THRESHOLD};
use crate::signals::{SignalDirection, DEFAULT_MIN_HISTORY, DEFAULT_Z_THRESHOLD};
use crate::spreads::{PairSpreads, SpreadPair};
use crate::stats::{compute_rolling_stats, RollingStats, Window, MIN_STAT_POINTS};

/// Basis points per unit of notional.
const BP_PER_UNIT: f64 = 10_000.0;

/// How positions are opened and what the spread reverts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryRule {
    /// Rolling z-score beyond `±entry_z`; exit through the rolling mean.
    #[default]
    ZScore,
    /// Spread at the rolling entry percentiles; exit through `exit_percentile`.
    Percentile,
}

impl fmt::Display for EntryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryRule::ZScore => write!(f, "z_score"),
            EntryRule::Percentile => write!(f, "percentile"),
        }
    }
}

/// Backtest parameters. Spreads and P&L are in basis points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Entry rule.
    pub entry_rule: EntryRule,
    /// Absolute z-score that opens a position.
    pub entry_z: f64,
    /// Percentile at or below which a long position opens.
    pub entry_percentile_low: f64,
    /// Percentile at or above which a short position opens.
    pub entry_percentile_high: f64,
    /// Percentile the spread reverts through under [`EntryRule::Percentile`].
    pub exit_percentile: f64,
    /// Rolling statistics window.
    pub window: Window,
    /// Loss that closes a position.
    pub stop_loss_bp: f64,
    /// Gain that closes a position.
    pub take_profit_bp: f64,
    /// Calendar days after which a position is closed.
    pub max_holding_days: i64,
    /// Round-trip cost charged on each trade.
    pub spread_cost_bp: f64,
    /// Finite spreads required before the first entry.
    pub min_history: usize,
    /// Starting capital, in currency units.
    pub initial_capital: f64,
    /// Share of the running capital committed per position.
    pub position_size_pct: f64,
    /// Commission per side, as a share of the position size.
    pub commission_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            entry_rule: EntryRule::default(),
            entry_z: DEFAULT_Z_THRESHOLD,
            entry_percentile_low: 10.0,
            entry_percentile_high: 90.0,
            exit_percentile: 50.0,
            window: Window::default(),
            stop_loss_bp: 20.0,
            take_profit_bp: 30.0,
            max_holding_days: 10,
            spread_cost_bp: 0.5,
            min_history: DEFAULT_MIN_HISTORY,
            initial_capital: 1_000_000.0,
            position_size_pct: 0.25,
            commission_rate: 0.0005,
        }
    }
}

/// Why a trade was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitReason {
    /// Spread crossed back through the rolling mean or exit percentile.
    MeanReversion,
    /// Loss reached `stop_loss_bp`.
    StopLoss,
    /// Gain reached `take_profit_bp`.
    TakeProfit,
    /// Held for `max_holding_days`.
    MaxHolding,
    /// Still open at the last point.
    EndOfData,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExitReason::MeanReversion => "MEAN_REVERSION",
            ExitReason::StopLoss => "STOP_LOSS",
            ExitReason::TakeProfit => "TAKE_PROFIT",
            ExitReason::MaxHolding => "MAX_HOLDING",
            ExitReason::EndOfData => "END_OF_DATA",
        };
        write!(f, "{s}")
    }
}

/// A closed trade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    /// Position taken.
    pub direction: SignalDirection,
    /// Entry point.
    pub entry_timestamp: NaiveDateTime,
    /// Spread at entry.
    pub entry_spread_bp: f64,
    /// Rolling z-score at entry, when defined.
    pub entry_z: Option<f64>,
    /// Exit point.
    pub exit_timestamp: NaiveDateTime,
    /// Spread at exit.
    pub exit_spread_bp: f64,
    /// Calendar days held.
    pub holding_days: i64,
    /// P&L net of `spread_cost_bp`.
    pub pnl_bp: f64,
    /// Capital committed at entry.
    pub position_size: f64,
    /// Currency P&L net of commission.
    pub pnl_currency: f64,
    /// Why the trade closed.
    pub exit_reason: ExitReason,
}

/// Aggregate results.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BacktestReport {
    /// Closed trades in entry order.
    pub trades: Vec<Trade>,
    /// Number of trades.
    pub total_trades: usize,
    /// Trades with positive P&L.
    pub winning_trades: usize,
    /// Trades with zero or negative P&L.
    pub losing_trades: usize,
    /// Winning share in percent; 0 without trades.
    pub win_rate: f64,
    /// Sum of trade P&L.
    pub total_pnl_bp: f64,
    /// Mean trade P&L.
    pub avg_pnl_bp: f64,
    /// Mean P&L of winning trades.
    pub avg_winning_bp: Option<f64>,
    /// Mean P&L of losing trades.
    pub avg_losing_bp: Option<f64>,
    /// Largest peak-to-trough fall of cumulative trade P&L.
    pub max_drawdown_bp: f64,
    /// Gross profit over gross loss; `None` without losses.
    pub profit_factor: Option<f64>,
    /// Mean holding period in days.
    pub avg_holding_days: f64,
    /// Sum of currency P&L.
    pub total_pnl_currency: f64,
    /// `total_pnl_currency` relative to the initial capital, in percent.
    pub total_pnl_percent: f64,
    /// Largest peak-to-trough fall of cumulative currency P&L.
    pub max_drawdown_currency: f64,
    /// Capital after the last trade.
    pub final_capital: f64,
}

impl BacktestReport {
    /// Aggregates closed trades opened from `initial_capital`.
    pub fn from_trades(trades: Vec<Trade>, initial_capital: f64) -> Self {
        let total_trades = trades.len();
        if total_trades == 0 {
            return Self {
                final_capital: initial_capital,
                ..Self::default()
            };
        }
        let n = total_trades as f64;

        let wins: Vec<f64> = trades.iter().map(|t| t.pnl_bp).filter(|p| *p > 0.0).collect();
        let losses: Vec<f64> = trades.iter().map(|t| t.pnl_bp).filter(|p| *p <= 0.0).collect();
        let gross_profit: f64 = wins.iter().sum();
        let gross_loss: f64 = -losses.iter().sum::<f64>();
        let average = |values: &[f64]| (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64);

        let total_pnl_bp: f64 = trades.iter().map(|t| t.pnl_bp).sum();
        let total_pnl_currency: f64 = trades.iter().map(|t| t.pnl_currency).sum();

        Self {
            total_trades,
            winning_trades: wins.len(),
            losing_trades: losses.len(),
            win_rate: wins.len() as f64 / n * 100.0,
            total_pnl_bp,
            avg_pnl_bp: total_pnl_bp / n,
            avg_winning_bp: average(&wins),
            avg_losing_bp: average(&losses),
            max_drawdown_bp: max_drawdown(trades.iter().map(|t| t.pnl_bp)),
            profit_factor: (gross_loss > 0.0).then(|| gross_profit / gross_loss),
            avg_holding_days: trades.iter().map(|t| t.holding_days as f64).sum::<f64>() / n,
            total_pnl_currency,
            total_pnl_percent: if initial_capital > 0.0 {
                total_pnl_currency / initial_capital * 100.0
            } else {
                0.0
            },
            max_drawdown_currency: max_drawdown(trades.iter().map(|t| t.pnl_currency)),
            final_capital: initial_capital + total_pnl_currency,
            trades,
        }
    }
}

fn max_drawdown(pnl: impl Iterator<Item = f64>) -> f64 {
    let mut cumulative = 0.0_f64;
    let mut peak = 0.0_f64;
    let mut drawdown = 0.0_f64;
    for p in pnl {
        cumulative += p;
        peak = peak.max(cumulative);
        drawdown = drawdown.max(peak - cumulative);
    }
    drawdown
}

struct OpenPosition {
    direction: SignalDirection,
    entry_timestamp: NaiveDateTime,
    entry_spread_bp: f64,
    entry_z: Option<f64>,
    size: f64,
}

impl OpenPosition {
    fn close(self, timestamp: NaiveDateTime, spread_bp: f64, reason: ExitReason, config: &BacktestConfig) -> Trade {
        let pnl_bp = self.gross_pnl(spread_bp) - config.spread_cost_bp;
        let commission = self.size * config.commission_rate * 2.0;
        Trade {
            direction: self.direction,
            entry_timestamp: self.entry_timestamp,
            entry_spread_bp: self.entry_spread_bp,
            entry_z: self.entry_z,
            exit_timestamp: timestamp,
            exit_spread_bp: spread_bp,
            holding_days: (timestamp.date() - self.entry_timestamp.date()).num_days(),
            pnl_bp,
            position_size: self.size,
            pnl_currency: pnl_bp * self.size / BP_PER_UNIT - commission,
            exit_reason: reason,
        }
    }

    fn gross_pnl(&self, spread_bp: f64) -> f64 {
        self.direction.sign() * (spread_bp - self.entry_spread_bp)
    }
}

/// Reversion level and entry decision at one point.
struct Levels {
    anchor: Option<f64>,
    entry: Option<SignalDirection>,
}

impl Levels {
    fn at(config: &BacktestConfig, spreads: &[SpreadObservation], end: usize, stats: &RollingStats) -> Self {
        match config.entry_rule {
            EntryRule::ZScore => Self {
                anchor: stats.mean,
                entry: stats.z_score.and_then(|z| {
                    if z > config.entry_z {
                        Some(SignalDirection::ShortLong)
                    } else if z < -config.entry_z {
                        Some(SignalDirection::LongShort)
                    } else {
                        None
                    }
                }),
            },
            EntryRule::Percentile => {
                let values: Vec<f64> = config
                    .window
                    .slice(spreads, end)
                    .iter()
                    .map(|s| s.spread_bp)
                    .filter(|v| v.is_finite())
                    .collect();
                if values.len() < MIN_STAT_POINTS {
                    return Self { anchor: None, entry: None };
                }
                let ordered = sorted(&values);
                let level = |p| percentile_sorted(&ordered, p);
                let (Some(low), Some(high)) = (level(config.entry_percentile_low), level(config.entry_percentile_high))
                else {
                    return Self { anchor: None, entry: None };
                };

                let spread = spreads[end].spread_bp;
                // a flat window has no bands to trade
                let entry = if high <= low {
                    None
                } else if spread <= low {
                    Some(SignalDirection::LongShort)
                } else if spread >= high {
                    Some(SignalDirection::ShortLong)
                } else {
                    None
                };
                Self {
                    anchor: level(config.exit_percentile),
                    entry,
                }
            }
        }
    }
}

/// Runs the backtest over `spreads` (ascending by timestamp).
///
/// Fails with [`AnalyticsError::InsufficientData`] when the series holds
/// fewer than `min_history` finite spreads.
pub fn run_backtest(spreads: &[SpreadObservation], config: &BacktestConfig) -> AnalyticsResult<BacktestReport> {
    let finite = spreads.iter().filter(|s| s.spread_bp.is_finite()).count();
    let required = config.min_history.max(1);
    if finite < required {
        return Err(AnalyticsError::insufficient_data(required, finite));
    }

    let stats = compute_rolling_stats(spreads, config.window);
    let mut trades = Vec::new();
    let mut open: Option<OpenPosition> = None;
    let mut capital = config.initial_capital;
    let mut seen = 0usize;
    let mut last_point = None;

    for (i, (obs, point)) in spreads.iter().zip(&stats).enumerate() {
        if !obs.spread_bp.is_finite() {
            continue;
        }
        seen += 1;
        last_point = Some((obs.timestamp, obs.spread_bp));
        let levels = Levels::at(config, spreads, i, point);

        if let Some(position) = open.take() {
            match exit_reason(&position, obs, levels.anchor, config) {
                Some(reason) => {
                    log::debug!("closing {} position at {}: {}", position.direction, obs.timestamp, reason);
                    let trade = position.close(obs.timestamp, obs.spread_bp, reason, config);
                    capital += trade.pnl_currency;
                    trades.push(trade);
                }
                None => open = Some(position),
            }
            continue;
        }

        if seen < config.min_history {
            continue;
        }
        let Some(direction) = levels.entry else {
            continue;
        };
        open = Some(OpenPosition {
            direction,
            entry_timestamp: obs.timestamp,
            entry_spread_bp: obs.spread_bp,
            entry_z: point.z_score,
            size: capital * config.position_size_pct,
        });
    }

    if let (Some(position), Some((timestamp, spread_bp))) = (open, last_point) {
        trades.push(position.close(timestamp, spread_bp, ExitReason::EndOfData, config));
    }

    Ok(BacktestReport::from_trades(trades, config.initial_capital))
}

fn exit_reason(
    position: &OpenPosition,
    obs: &SpreadObservation,
    anchor: Option<f64>,
    config: &BacktestConfig,
) -> Option<ExitReason> {
    let pnl = position.gross_pnl(obs.spread_bp);
    let held = (obs.timestamp.date() - position.entry_timestamp.date()).num_days();
    let reverted = anchor.is_some_and(|level| match position.direction {
        SignalDirection::LongShort => obs.spread_bp >= level,
        SignalDirection::ShortLong => obs.spread_bp <= level,
        SignalDirection::Flat => true,
    });

    if pnl <= -config.stop_loss_bp {
        Some(ExitReason::StopLoss)
    } else if pnl >= config.take_profit_bp {
        Some(ExitReason::TakeProfit)
    } else if reverted {
        Some(ExitReason::MeanReversion)
    } else if held >= config.max_holding_days {
        Some(ExitReason::MaxHolding)
    } else {
        None
    }
}

/// Backtest result for one pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairBacktest {
    /// The pair.
    pub pair: SpreadPair,
    /// Its report.
    pub report: BacktestReport,
}

/// Backtests every pair with the same settings, in the order given.
///
/// Pairs without enough history are left out with a warning.
pub fn run_pair_backtests(pairs: &[PairSpreads], config: &BacktestConfig) -> Vec<PairBacktest> {
    maybe_parallel_map(pairs, DEFAULT_PARALLEL_THRESHOLD, |history| {
        match run_backtest(&history.spreads, config) {
            Ok(report) => Some(PairBacktest {
                pair: history.pair.clone(),
                report,
            }),
            Err(err) => {
                log::warn!("skipping backtest for {}: {}", history.pair.name, err);
                None
            }
        }
    })
    .into_iter()
    .flatten()
    .collect()
}

/// Total P&L of one pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairPnl {
    /// Pair name.
    pub pair_name: String,
    /// Total P&L in bp.
    pub total_pnl_bp: f64,
}

/// Strategy metrics across pairs.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StrategyMetrics {
    /// Pairs backtested.
    pub total_pairs: usize,
    /// Trades across all pairs.
    pub total_trades: usize,
    /// Winning trades across all pairs.
    pub total_winning: usize,
    /// Winning share in percent; 0 without trades.
    pub win_rate: f64,
    /// Sum of pair P&L, bp.
    pub total_pnl_bp: f64,
    /// Sum of pair P&L, currency.
    pub total_pnl_currency: f64,
    /// `total_pnl_bp` per pair.
    pub avg_pnl_per_pair_bp: f64,
    /// Pair with the highest P&L.
    pub best_pair: Option<PairPnl>,
    /// Pair with the lowest P&L.
    pub worst_pair: Option<PairPnl>,
    /// Pairs with positive P&L.
    pub profitable_pairs: usize,
}

impl StrategyMetrics {
    /// Aggregates per-pair results; all zero for no pairs.
    pub fn from_results(results: &[PairBacktest]) -> Self {
        if results.is_empty() {
            return Self::default();
        }

        let total_trades: usize = results.iter().map(|r| r.report.total_trades).sum();
        let total_winning: usize = results.iter().map(|r| r.report.winning_trades).sum();
        let total_pnl_bp: f64 = results.iter().map(|r| r.report.total_pnl_bp).sum();
        let pnl = |r: &PairBacktest| PairPnl {
            pair_name: r.pair.name.clone(),
            total_pnl_bp: r.report.total_pnl_bp,
        };
        let by_pnl = |a: &&PairBacktest, b: &&PairBacktest| a.report.total_pnl_bp.total_cmp(&b.report.total_pnl_bp);

        Self {
            total_pairs: results.len(),
            total_trades,
            total_winning,
            win_rate: if total_trades > 0 {
                total_winning as f64 / total_trades as f64 * 100.0
            } else {
                0.0
            },
            total_pnl_bp,
            total_pnl_currency: results.iter().map(|r| r.report.total_pnl_currency).sum(),
            avg_pnl_per_pair_bp: total_pnl_bp / results.len() as f64,
            best_pair: results.iter().max_by(by_pnl).map(pnl),
            worst_pair: results.iter().min_by(by_pnl).map(pnl),
            profitable_pairs: results.iter().filter(|r| r.report.total_pnl_bp > 0.0).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn day(offset: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap() + chrono::Duration::days(offset)
    }

    fn series(values: &[f64]) -> Vec<SpreadObservation> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| SpreadObservation::new(day(i as i64), v))
            .collect()
    }

    fn base() -> Vec<f64> {
        (0..30).map(|i| 100.0 + f64::from(i % 2)).collect()
    }

    fn config() -> BacktestConfig {
        BacktestConfig {
            window: Window::Observations(20),
            ..BacktestConfig::default()
        }
    }

    fn trade(pnl_bp: f64) -> Trade {
        Trade {
            direction: SignalDirection::LongShort,
            entry_timestamp: day(0),
            entry_spread_bp: 0.0,
            entry_z: Some(-2.5),
            exit_timestamp: day(2),
            exit_spread_bp: pnl_bp,
            holding_days: 2,
            pnl_bp,
            position_size: 250_000.0,
            pnl_currency: pnl_bp * 25.0,
            exit_reason: ExitReason::MeanReversion,
        }
    }

    /// Base series, a spike to 110 on day 30, then `after` 40 days later.
    fn gapped(after: &[f64]) -> Vec<SpreadObservation> {
        let mut s = series(&base());
        s.push(SpreadObservation::new(day(30), 110.0));
        s.extend(after.iter().enumerate().map(|(i, &v)| SpreadObservation::new(day(70 + i as i64), v)));
        s
    }

    #[test]
    fn test_insufficient_history() {
        let err = run_backtest(&series(&[1.0, 2.0, 3.0]), &config()).unwrap_err();
        assert_eq!(err, AnalyticsError::insufficient_data(20, 3));
    }

    #[test]
    fn test_quiet_series_has_no_trades() {
        let report = run_backtest(&series(&base()), &config()).unwrap();
        assert_eq!(report.total_trades, 0);
        assert_eq!(report.win_rate, 0.0);
        assert_eq!(report.profit_factor, None);
        assert_eq!(report.final_capital, 1_000_000.0);
    }

    #[test]
    fn test_short_spread_reverts_to_mean() {
        let mut values = base();
        values.extend([110.0, 100.0, 101.0, 100.0]);
        let report = run_backtest(&series(&values), &config()).unwrap();

        assert_eq!(report.total_trades, 1);
        let t = &report.trades[0];
        assert_eq!(t.direction, SignalDirection::ShortLong);
        assert_eq!(t.exit_reason, ExitReason::MeanReversion);
        assert!(t.entry_z.unwrap() > 2.0);
        assert_eq!(t.holding_days, 1);
        assert_relative_eq!(t.pnl_bp, 9.5);
        assert_relative_eq!(report.win_rate, 100.0);

        // 25% of 1m at risk, 0.05% commission per side
        assert_relative_eq!(t.position_size, 250_000.0);
        assert_relative_eq!(t.pnl_currency, 9.5 * 25.0 - 250.0);
        assert_relative_eq!(report.final_capital, 1_000_000.0 - 12.5);
        assert_relative_eq!(report.total_pnl_percent, -0.00125, epsilon = 1e-12);
    }

    #[test]
    fn test_stop_loss() {
        let mut values = base();
        values.extend([110.0, 135.0, 100.0, 101.0]);
        let report = run_backtest(&series(&values), &config()).unwrap();

        assert_eq!(report.total_trades, 1);
        assert_eq!(report.trades[0].exit_reason, ExitReason::StopLoss);
        assert_relative_eq!(report.trades[0].pnl_bp, -25.5);
        assert_eq!(report.losing_trades, 1);
        assert_eq!(report.avg_winning_bp, None);
        assert_relative_eq!(report.avg_losing_bp.unwrap(), -25.5);
    }

    #[test]
    fn test_stop_loss_after_gap_without_statistics() {
        let config = BacktestConfig {
            take_profit_bp: 1e9,
            max_holding_days: 1_000,
            ..BacktestConfig::default()
        };
        let report = run_backtest(&gapped(&[200.0, 100.0]), &config).unwrap();

        assert_eq!(report.total_trades, 1);
        let t = &report.trades[0];
        assert_eq!(t.direction, SignalDirection::ShortLong);
        assert_eq!(t.exit_reason, ExitReason::StopLoss);
        assert_eq!(t.exit_timestamp, day(70));
        assert_relative_eq!(t.exit_spread_bp, 200.0);
        assert_relative_eq!(t.pnl_bp, -90.5);
        assert_eq!(report.winning_trades, 0);
    }

    #[test]
    fn test_max_holding_after_gap_without_statistics() {
        let report = run_backtest(&gapped(&[108.0]), &BacktestConfig::default()).unwrap();

        assert_eq!(report.total_trades, 1);
        let t = &report.trades[0];
        assert_eq!(t.exit_reason, ExitReason::MaxHolding);
        assert_eq!(t.holding_days, 40);
        assert_relative_eq!(t.pnl_bp, 1.5);
    }

    #[test]
    fn test_max_holding() {
        let mut values = base();
        values.push(110.0);
        values.extend([108.0; 12]);
        let report = run_backtest(&series(&values), &config()).unwrap();

        let first = &report.trades[0];
        assert_eq!(first.exit_reason, ExitReason::MaxHolding);
        assert_eq!(first.holding_days, 10);
        assert_relative_eq!(first.pnl_bp, 1.5);
    }

    #[test]
    fn test_open_position_closed_at_end() {
        let mut values = base();
        values.extend([110.0, 111.0]);
        let report = run_backtest(&series(&values), &config()).unwrap();

        assert_eq!(report.total_trades, 1);
        assert_eq!(report.trades[0].exit_reason, ExitReason::EndOfData);
        assert_relative_eq!(report.trades[0].pnl_bp, -1.5);
    }

    #[test]
    fn test_percentile_entry_and_median_exit() {
        let mut values: Vec<f64> = (0..20).map(|i| 100.0 + f64::from(i % 10)).collect();
        values.push(100.0);
        let config = BacktestConfig {
            entry_rule: EntryRule::Percentile,
            ..config()
        };
        let report = run_backtest(&series(&values), &config).unwrap();

        // 109 is above P90 (108.1) of the first full window; 100 is below its median
        assert_eq!(report.total_trades, 1);
        let t = &report.trades[0];
        assert_eq!(t.direction, SignalDirection::ShortLong);
        assert_relative_eq!(t.entry_spread_bp, 109.0);
        assert_eq!(t.exit_reason, ExitReason::MeanReversion);
        assert_relative_eq!(t.pnl_bp, 8.5);
    }

    #[test]
    fn test_percentile_entry_ignores_flat_window() {
        let config = BacktestConfig {
            entry_rule: EntryRule::Percentile,
            ..config()
        };
        let report = run_backtest(&series(&[50.0; 40]), &config).unwrap();
        assert_eq!(report.total_trades, 0);
    }

    #[test]
    fn test_report_drawdown_and_profit_factor() {
        let report = BacktestReport::from_trades(vec![trade(10.0), trade(-5.0), trade(-8.0), trade(20.0)], 1_000_000.0);

        assert_eq!(report.total_trades, 4);
        assert_eq!(report.winning_trades, 2);
        assert_relative_eq!(report.total_pnl_bp, 17.0);
        assert_relative_eq!(report.avg_pnl_bp, 4.25);
        assert_relative_eq!(report.avg_winning_bp.unwrap(), 15.0);
        assert_relative_eq!(report.avg_losing_bp.unwrap(), -6.5);
        assert_relative_eq!(report.max_drawdown_bp, 13.0);
        assert_relative_eq!(report.profit_factor.unwrap(), 30.0 / 13.0);
        assert_relative_eq!(report.win_rate, 50.0);
        assert_relative_eq!(report.avg_holding_days, 2.0);

        assert_relative_eq!(report.total_pnl_currency, 425.0);
        assert_relative_eq!(report.max_drawdown_currency, 325.0);
        assert_relative_eq!(report.total_pnl_percent, 0.0425, epsilon = 1e-12);
        assert_relative_eq!(report.final_capital, 1_000_425.0);
    }

    #[test]
    fn test_pair_backtests_and_strategy_metrics() {
        let mut reverting = base();
        reverting.extend([110.0, 100.0, 101.0, 100.0]);
        let mut stopped = base();
        stopped.extend([110.0, 135.0, 100.0, 101.0]);
        let pairs = vec![
            PairSpreads { pair: SpreadPair::new("REV", "A", "B"), spreads: series(&reverting) },
            PairSpreads { pair: SpreadPair::new("STOP", "A", "C"), spreads: series(&stopped) },
            PairSpreads { pair: SpreadPair::new("SHORT", "A", "D"), spreads: series(&[1.0, 2.0]) },
        ];

        let results = run_pair_backtests(&pairs, &config());
        let names: Vec<&str> = results.iter().map(|r| r.pair.name.as_str()).collect();
        assert_eq!(names, vec!["REV", "STOP"]);

        let metrics = StrategyMetrics::from_results(&results);
        assert_eq!(metrics.total_pairs, 2);
        assert_eq!(metrics.total_trades, 2);
        assert_eq!(metrics.total_winning, 1);
        assert_relative_eq!(metrics.win_rate, 50.0);
        assert_relative_eq!(metrics.total_pnl_bp, -16.0);
        assert_relative_eq!(metrics.avg_pnl_per_pair_bp, -8.0);
        assert_eq!(metrics.best_pair.unwrap().pair_name, "REV");
        assert_eq!(metrics.worst_pair.unwrap().pair_name, "STOP");
        assert_eq!(metrics.profitable_pairs, 1);

        assert_eq!(StrategyMetrics::from_results(&[]), StrategyMetrics::default());
    }
}
