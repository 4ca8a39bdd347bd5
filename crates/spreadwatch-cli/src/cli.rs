//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{BacktestArgs, ConfigArgs, SeriesArgs, SignalsArgs, SpreadArgs, YtmArgs};

/// Spreadwatch - bond yield and spread analytics
#[derive(Parser)]
#[command(name = "spreadwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress headers and summaries
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Raise log verbosity (-v debug for spreadwatch, -vv everything)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Yield from price, or price from yield, for one bond
    Ytm(YtmArgs),

    /// Yield series for one configured bond
    Series(SeriesArgs),

    /// Spread, rolling statistics and signals for a configured pair
    Spread(SpreadArgs),

    /// Trading signals for every configured pair
    Signals(SignalsArgs),

    /// Mean-reversion backtest for one configured pair or all of them
    Backtest(BacktestArgs),

    /// Validate and print the resolved configuration
    Config(ConfigArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}
