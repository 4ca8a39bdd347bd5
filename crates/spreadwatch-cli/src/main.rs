//! Spreadwatch CLI - yields, spreads and signals for government bonds.
//!
//! # Usage
//!
//! ```bash
//! # Yield from a clean price
//! spreadwatch ytm --coupon 7.1 --maturity 2041-05-15 --settlement 2025-03-03 --price 64.85
//!
//! # Yield series for one bond
//! spreadwatch series --config bonds.toml --prices prices.csv --isin SU26238RMFS4
//!
//! # Spread, rolling statistics and signal for a pair
//! spreadwatch spread --config bonds.toml --prices prices.csv --pair 38-43
//!
//! # Actionable signals across all configured pairs
//! spreadwatch signals --config bonds.toml --prices prices.csv
//!
//! # Mean-reversion backtest, one pair or all of them
//! spreadwatch backtest --config bonds.toml --prices prices.csv --pair 38-43
//! spreadwatch backtest --config bonds.toml --prices prices.csv --all --entry-rule percentile
//!
//! # Validate and print the resolved configuration
//! spreadwatch config --config bonds.toml
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;
mod prices;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = output::Context::new(cli.format, cli.quiet);

    match cli.command {
        Commands::Ytm(args) => commands::ytm::execute(args, ctx)?,
        Commands::Series(args) => commands::series::execute(args, ctx)?,
        Commands::Spread(args) => commands::spread::execute(args, ctx)?,
        Commands::Signals(args) => commands::signals::execute(args, ctx)?,
        Commands::Backtest(args) => commands::backtest::execute(args, ctx)?,
        Commands::Config(args) => commands::config::execute(args, ctx)?,
    }

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn,spreadwatch=info",
        1 => "info,spreadwatch=debug",
        _ => "debug",
    };
    let filter = if verbose > 0 {
        EnvFilter::new(default)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
