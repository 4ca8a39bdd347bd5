//! Series command implementation.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use spreadwatch_analytics::observations::{coverage, YieldObservation};

use crate::commands::{yield_series, DataArgs};
use crate::output::{fmt_opt, print_output, print_warning, Context};

/// Arguments for the series command.
#[derive(Args, Debug)]
pub struct SeriesArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// ISIN of a configured bond
    #[arg(short, long)]
    pub isin: String,
}

/// One row of a yield series.
#[derive(Debug, Serialize, Tabled)]
struct SeriesRow {
    #[tabled(rename = "Timestamp")]
    timestamp: String,
    #[tabled(rename = "ISIN")]
    isin: String,
    #[tabled(rename = "Clean Price")]
    price: String,
    #[tabled(rename = "YTM %")]
    ytm_percent: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Execute the series command.
pub fn execute(args: SeriesArgs, ctx: Context) -> Result<()> {
    let (config, book) = args.data.load()?;
    let yields = yield_series(&config, &book, &args.isin)?;
    let prices = book.series(&args.isin)?;

    let rows: Vec<SeriesRow> = prices
        .iter()
        .zip(&yields)
        .map(|(p, y)| row(p.clean_price_percent, y))
        .collect();

    ctx.header(&format!("Yield series {}", args.isin));
    print_output(&rows, ctx.format)?;

    let cov = coverage(&yields);
    if cov.failed() > 0 && !ctx.quiet {
        print_warning(&format!(
            "{} of {} points not valued ({} missing terms, {} matured, {} invalid, {} not converged)",
            cov.failed(),
            cov.total,
            cov.missing_terms,
            cov.matured,
            cov.invalid_input,
            cov.not_converged
        ));
    }
    Ok(())
}

fn row(price: f64, y: &YieldObservation) -> SeriesRow {
    SeriesRow {
        timestamp: y.timestamp.to_string(),
        isin: y.isin.clone(),
        price: format!("{price:.4}"),
        ytm_percent: fmt_opt(y.ytm_percent, 4),
        status: y.status.to_string(),
    }
}
