//! Spread command implementation.
//!
//! Prints the aligned spread series with rolling statistics and the z-score
//! signal per point, then the trading signal at the last point.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use spreadwatch_analytics::observations::SpreadObservation;
use spreadwatch_analytics::signals::{classify, TradingSignal};
use spreadwatch_analytics::stats::{compute_rolling_stats, RollingStats};

use crate::cli::OutputFormat;
use crate::commands::{pair_spreads, DataArgs};
use crate::output::{fmt_opt, print_json, print_output, signal_label, strength_label, Context, KeyValue};

/// Arguments for the spread command.
#[derive(Args, Debug)]
pub struct SpreadArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Name of a configured pair
    #[arg(long)]
    pub pair: String,

    /// Show only the last N points
    #[arg(short = 'n', long)]
    pub last: Option<usize>,
}

/// One spread point with its window statistics.
#[derive(Debug, Serialize, Tabled)]
struct SpreadRow {
    #[tabled(rename = "Timestamp")]
    timestamp: String,
    #[tabled(rename = "Spread bp")]
    spread_bp: String,
    #[tabled(rename = "Mean")]
    mean_bp: String,
    #[tabled(rename = "Std")]
    std_bp: String,
    #[tabled(rename = "P10")]
    p10: String,
    #[tabled(rename = "P90")]
    p90: String,
    #[tabled(rename = "Z")]
    z_score: String,
    #[tabled(rename = "Signal")]
    signal: String,
}

#[derive(Debug, Serialize)]
struct SpreadReport<'a> {
    pair: &'a str,
    isin_a: &'a str,
    isin_b: &'a str,
    spreads: &'a [SpreadObservation],
    stats: &'a [RollingStats],
    signal: &'a TradingSignal,
}

/// Execute the spread command.
pub fn execute(args: SpreadArgs, ctx: Context) -> Result<()> {
    let (config, book) = args.data.load()?;
    let pair = config.pair(&args.pair)?;
    let threshold = config.signal.z_threshold;

    let spreads = pair_spreads(&config, &book, pair)?;
    let stats = compute_rolling_stats(&spreads, config.spread.window);
    let signal = config
        .signal
        .generator(config.spread.window)
        .generate(&pair.name, &pair.isin_a, &pair.isin_b, &spreads);

    let skip = args.last.map_or(0, |n| spreads.len().saturating_sub(n));

    if ctx.format == OutputFormat::Json {
        return print_json(&SpreadReport {
            pair: &pair.name,
            isin_a: &pair.isin_a,
            isin_b: &pair.isin_b,
            spreads: &spreads[skip..],
            stats: &stats[skip..],
            signal: &signal,
        });
    }

    let rows: Vec<SpreadRow> = spreads
        .iter()
        .zip(&stats)
        .skip(skip)
        .map(|(s, st)| SpreadRow {
            timestamp: s.timestamp.to_string(),
            spread_bp: format!("{:.2}", s.spread_bp),
            mean_bp: fmt_opt(st.mean, 2),
            std_bp: fmt_opt(st.std, 2),
            p10: fmt_opt(st.p10, 2),
            p90: fmt_opt(st.p90, 2),
            z_score: fmt_opt(st.z_score, 2),
            signal: signal_label(classify(st.z_score, threshold), ctx.format),
        })
        .collect();

    ctx.header(&format!("Spread {} ({} - {})", pair.name, pair.isin_a, pair.isin_b));
    print_output(&rows, ctx.format)?;

    if ctx.format == OutputFormat::Table && !ctx.quiet {
        ctx.header("Trading signal");
        print_output(&summary(&signal, ctx.format), ctx.format)?;
    }
    Ok(())
}

fn summary(signal: &TradingSignal, format: OutputFormat) -> Vec<KeyValue> {
    vec![
        KeyValue::new("Strength", strength_label(signal.strength, format)),
        KeyValue::new("Z Signal", signal_label(signal.z_signal, format)),
        KeyValue::new("Direction", signal.direction.to_string()),
        KeyValue::new("Confidence", format!("{:.0}%", signal.confidence * 100.0)),
        KeyValue::from_opt("Spread bp", signal.spread_bp, 2),
        KeyValue::from_opt("Mean bp", signal.mean_bp, 2),
        KeyValue::from_opt("Z-Score", signal.z_score, 2),
        KeyValue::from_opt("Percentile Rank", signal.percentile_rank, 1),
        KeyValue::new("Expected Return bp", format!("{:.2}", signal.expected_return_bp)),
    ]
}
