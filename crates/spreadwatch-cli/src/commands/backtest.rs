//! Backtest command implementation.
//!
//! One configured pair with its trade list, or every pair with the
//! per-pair results and the strategy totals.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use spreadwatch_analytics::backtest::{
    run_backtest, run_pair_backtests, BacktestConfig, BacktestReport, EntryRule, PairBacktest, PairPnl,
    StrategyMetrics, Trade,
};

use crate::cli::OutputFormat;
use crate::commands::{all_pair_spreads, pair_spreads, DataArgs};
use crate::output::{print_json, print_output, Context, KeyValue};

/// Arguments for the backtest command.
#[derive(Args, Debug)]
pub struct BacktestArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Name of a configured pair
    #[arg(long, required_unless_present = "all", conflicts_with = "all")]
    pub pair: Option<String>,

    /// Backtest every configured pair
    #[arg(long)]
    pub all: bool,

    /// Override the entry rule from the configuration
    #[arg(long, value_enum)]
    pub entry_rule: Option<EntryRuleArg>,

    /// Override the entry z-score from the configuration
    #[arg(long)]
    pub entry_z: Option<f64>,
}

/// Entry rule choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntryRuleArg {
    /// Rolling z-score beyond the entry threshold
    ZScore,
    /// Spread at the rolling entry percentiles
    Percentile,
}

impl From<EntryRuleArg> for EntryRule {
    fn from(arg: EntryRuleArg) -> Self {
        match arg {
            EntryRuleArg::ZScore => EntryRule::ZScore,
            EntryRuleArg::Percentile => EntryRule::Percentile,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct TradeRow {
    #[tabled(rename = "Direction")]
    direction: String,
    #[tabled(rename = "Entry")]
    entry: String,
    #[tabled(rename = "Exit")]
    exit: String,
    #[tabled(rename = "Entry bp")]
    entry_spread_bp: String,
    #[tabled(rename = "Exit bp")]
    exit_spread_bp: String,
    #[tabled(rename = "Days")]
    holding_days: i64,
    #[tabled(rename = "P&L bp")]
    pnl_bp: String,
    #[tabled(rename = "P&L")]
    pnl_currency: String,
    #[tabled(rename = "Reason")]
    exit_reason: String,
}

impl From<&Trade> for TradeRow {
    fn from(t: &Trade) -> Self {
        Self {
            direction: t.direction.to_string(),
            entry: t.entry_timestamp.to_string(),
            exit: t.exit_timestamp.to_string(),
            entry_spread_bp: format!("{:.2}", t.entry_spread_bp),
            exit_spread_bp: format!("{:.2}", t.exit_spread_bp),
            holding_days: t.holding_days,
            pnl_bp: format!("{:.2}", t.pnl_bp),
            pnl_currency: format!("{:.2}", t.pnl_currency),
            exit_reason: t.exit_reason.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct PairRow {
    #[tabled(rename = "Pair")]
    pair: String,
    #[tabled(rename = "Trades")]
    trades: usize,
    #[tabled(rename = "Win Rate")]
    win_rate: String,
    #[tabled(rename = "P&L bp")]
    total_pnl_bp: String,
    #[tabled(rename = "P&L")]
    total_pnl_currency: String,
    #[tabled(rename = "Max DD bp")]
    max_drawdown_bp: String,
}

impl From<&PairBacktest> for PairRow {
    fn from(r: &PairBacktest) -> Self {
        Self {
            pair: r.pair.name.clone(),
            trades: r.report.total_trades,
            win_rate: format!("{:.1}%", r.report.win_rate),
            total_pnl_bp: format!("{:.2}", r.report.total_pnl_bp),
            total_pnl_currency: format!("{:.2}", r.report.total_pnl_currency),
            max_drawdown_bp: format!("{:.2}", r.report.max_drawdown_bp),
        }
    }
}

#[derive(Debug, Serialize)]
struct StrategyReport<'a> {
    pairs: &'a [PairBacktest],
    metrics: &'a StrategyMetrics,
}

/// Execute the backtest command.
pub fn execute(args: BacktestArgs, ctx: Context) -> Result<()> {
    let (config, book) = args.data.load()?;

    let mut settings = config.backtest.clone();
    if let Some(rule) = args.entry_rule {
        settings.entry_rule = rule.into();
    }
    if let Some(z) = args.entry_z {
        settings.entry_z = z;
    }

    match args.pair {
        Some(name) => {
            let pair = config.pair(&name)?;
            let spreads = pair_spreads(&config, &book, pair)?;
            let report = run_backtest(&spreads, &settings)?;
            tracing::info!("backtest {} ({}): {} trades", pair.name, settings.entry_rule, report.total_trades);
            print_pair(&pair.name, &report, ctx)
        }
        None => {
            let histories = all_pair_spreads(&config, &book)?;
            let results = run_pair_backtests(&histories, &settings);
            tracing::info!("backtested {} of {} pairs", results.len(), histories.len());
            print_strategy(&results, &settings, ctx)
        }
    }
}

fn print_pair(name: &str, report: &BacktestReport, ctx: Context) -> Result<()> {
    if ctx.format == OutputFormat::Json {
        return print_json(report);
    }

    let rows: Vec<TradeRow> = report.trades.iter().map(TradeRow::from).collect();
    ctx.header(&format!("Backtest {name}"));
    print_output(&rows, ctx.format)?;

    if ctx.format == OutputFormat::Table && !ctx.quiet {
        ctx.header("Summary");
        print_output(&summary(report), ctx.format)?;
    }
    Ok(())
}

fn print_strategy(results: &[PairBacktest], settings: &BacktestConfig, ctx: Context) -> Result<()> {
    let metrics = StrategyMetrics::from_results(results);
    if ctx.format == OutputFormat::Json {
        return print_json(&StrategyReport {
            pairs: results,
            metrics: &metrics,
        });
    }

    let rows: Vec<PairRow> = results.iter().map(PairRow::from).collect();
    ctx.header(&format!("Backtest ({})", settings.entry_rule));
    print_output(&rows, ctx.format)?;

    if ctx.format == OutputFormat::Table && !ctx.quiet {
        ctx.header("Strategy");
        print_output(&strategy_summary(&metrics), ctx.format)?;
    }
    Ok(())
}

fn summary(report: &BacktestReport) -> Vec<KeyValue> {
    vec![
        KeyValue::new("Trades", report.total_trades.to_string()),
        KeyValue::new("Winning / Losing", format!("{} / {}", report.winning_trades, report.losing_trades)),
        KeyValue::new("Win Rate", format!("{:.1}%", report.win_rate)),
        KeyValue::new("Total P&L bp", format!("{:.2}", report.total_pnl_bp)),
        KeyValue::new("Average P&L bp", format!("{:.2}", report.avg_pnl_bp)),
        KeyValue::from_opt("Average Win bp", report.avg_winning_bp, 2),
        KeyValue::from_opt("Average Loss bp", report.avg_losing_bp, 2),
        KeyValue::new("Max Drawdown bp", format!("{:.2}", report.max_drawdown_bp)),
        KeyValue::from_opt("Profit Factor", report.profit_factor, 2),
        KeyValue::new("Average Holding Days", format!("{:.1}", report.avg_holding_days)),
        KeyValue::new("Total P&L", format!("{:.2}", report.total_pnl_currency)),
        KeyValue::new("Total P&L %", format!("{:.3}%", report.total_pnl_percent)),
        KeyValue::new("Final Capital", format!("{:.2}", report.final_capital)),
    ]
}

fn strategy_summary(metrics: &StrategyMetrics) -> Vec<KeyValue> {
    let named = |p: &Option<PairPnl>| match p {
        Some(p) => format!("{} ({:.2} bp)", p.pair_name, p.total_pnl_bp),
        None => "-".to_string(),
    };
    vec![
        KeyValue::new("Pairs", metrics.total_pairs.to_string()),
        KeyValue::new("Profitable Pairs", metrics.profitable_pairs.to_string()),
        KeyValue::new("Trades", metrics.total_trades.to_string()),
        KeyValue::new("Win Rate", format!("{:.1}%", metrics.win_rate)),
        KeyValue::new("Total P&L bp", format!("{:.2}", metrics.total_pnl_bp)),
        KeyValue::new("Average P&L per Pair bp", format!("{:.2}", metrics.avg_pnl_per_pair_bp)),
        KeyValue::new("Total P&L", format!("{:.2}", metrics.total_pnl_currency)),
        KeyValue::new("Best Pair", named(&metrics.best_pair)),
        KeyValue::new("Worst Pair", named(&metrics.worst_pair)),
    ]
}
