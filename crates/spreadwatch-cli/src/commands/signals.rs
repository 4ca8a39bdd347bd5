//! Signals command implementation.
//!
//! Trading signals at the latest spread of every configured pair. By default
//! only actionable signals at or above the configured confidence are listed.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use spreadwatch_analytics::signals::{filter_signals, TradingSignal};

use crate::commands::{all_pair_spreads, DataArgs};
use crate::output::{fmt_opt, print_output, strength_label, Context};

/// Arguments for the signals command.
#[derive(Args, Debug)]
pub struct SignalsArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Override the minimum confidence from the configuration
    #[arg(long)]
    pub min_confidence: Option<f64>,

    /// List every pair, neutral and no-data signals included
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Serialize, Tabled)]
struct SignalRow {
    #[tabled(rename = "Pair")]
    pair: String,
    #[tabled(rename = "Signal")]
    strength: String,
    #[tabled(rename = "Direction")]
    direction: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Spread bp")]
    spread_bp: String,
    #[tabled(rename = "Mean bp")]
    mean_bp: String,
    #[tabled(rename = "Z")]
    z_score: String,
    #[tabled(rename = "Rank")]
    percentile_rank: String,
    #[tabled(rename = "Expected bp")]
    expected_return_bp: String,
}

impl SignalRow {
    fn new(s: &TradingSignal, ctx: Context) -> Self {
        Self {
            pair: s.pair_name.clone(),
            strength: strength_label(s.strength, ctx.format),
            direction: s.direction.to_string(),
            confidence: format!("{:.2}", s.confidence),
            spread_bp: fmt_opt(s.spread_bp, 2),
            mean_bp: fmt_opt(s.mean_bp, 2),
            z_score: fmt_opt(s.z_score, 2),
            percentile_rank: fmt_opt(s.percentile_rank, 1),
            expected_return_bp: format!("{:.2}", s.expected_return_bp),
        }
    }
}

/// Execute the signals command.
pub fn execute(args: SignalsArgs, ctx: Context) -> Result<()> {
    let (config, book) = args.data.load()?;
    let histories = all_pair_spreads(&config, &book)?;

    let generator = config.signal.generator(config.spread.window);
    let signals = generator.generate_all(&histories);
    let generated = signals.len();

    let signals = if args.all {
        signals
    } else {
        let min_confidence = args.min_confidence.unwrap_or(generator.min_confidence);
        filter_signals(signals, min_confidence, true)
    };
    tracing::info!("{} of {} signals listed", signals.len(), generated);

    let rows: Vec<SignalRow> = signals.iter().map(|s| SignalRow::new(s, ctx)).collect();
    ctx.header("Signals");
    print_output(&rows, ctx.format)
}
