//! Ytm command implementation.
//!
//! Yield from a clean price, or clean price from a yield, for one bond given
//! on the command line.

use anyhow::{Context as _, Result};
use clap::Args;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::Serialize;

use spreadwatch_bonds::prelude::*;
use spreadwatch_core::{Date, DayCountConvention};

use crate::cli::OutputFormat;
use crate::commands::{parse_date, validate_coupon, validate_price};
use crate::output::{print_json, print_output, Context, KeyValue};

/// Arguments for the ytm command.
#[derive(Args, Debug)]
pub struct YtmArgs {
    /// Annual coupon rate in percent (7.1 for 7.1%)
    #[arg(short, long)]
    pub coupon: f64,

    /// Maturity date (YYYY-MM-DD)
    #[arg(short, long)]
    pub maturity: String,

    /// Settlement date (YYYY-MM-DD). Defaults to today.
    #[arg(short, long)]
    pub settlement: Option<String>,

    /// Issue date (YYYY-MM-DD)
    #[arg(long)]
    pub issue: Option<String>,

    /// Clean price in percent of face. Calculates the yield.
    #[arg(short, long, group = "calc_mode", allow_negative_numbers = true)]
    pub price: Option<f64>,

    /// Yield to maturity in percent. Calculates the clean price.
    #[arg(short = 'y', long = "yield", group = "calc_mode", allow_negative_numbers = true)]
    pub yield_percent: Option<f64>,

    /// Face value
    #[arg(long, default_value = "1000")]
    pub face: f64,

    /// Coupon payments per year: 1, 2, 3, 4, 6 or 12
    #[arg(long, default_value = "2")]
    pub frequency: i64,

    /// Day count convention (ACT/ACT, ACT/365F, ACT/360, 30/360, 30E/360)
    #[arg(long, default_value = "ACT/ACT ICMA")]
    pub day_count: String,

    /// ISIN or label for the bond
    #[arg(long, default_value = "CLI")]
    pub isin: String,
}

/// Valuation at one settlement date.
#[derive(Debug, Serialize)]
struct YtmReport {
    isin: String,
    settlement: Date,
    clean_price_percent: f64,
    yield_percent: f64,
    accrued: Decimal,
    dirty_price: f64,
    macaulay_duration: f64,
    modified_duration: f64,
    iterations: Option<u32>,
    method: Option<SolveMethod>,
}

/// Execute the ytm command.
pub fn execute(args: YtmArgs, ctx: Context) -> Result<()> {
    let coupon = validate_coupon(args.coupon)?;
    let maturity = parse_date(&args.maturity)?;
    let settlement = match args.settlement {
        Some(ref s) => parse_date(s)?,
        None => Date::from(chrono::Local::now().date_naive()),
    };
    let day_count: DayCountConvention = args.day_count.parse()?;

    let mut builder = BondTermsBuilder::new(&args.isin)
        .maturity(maturity)
        .coupon_rate(Decimal::from_f64(coupon).context("coupon out of range")?)
        .face_value(Decimal::from_f64(args.face).context("face value out of range")?)
        .coupon_frequency(args.frequency)
        .day_count(day_count);
    if let Some(ref issue) = args.issue {
        builder = builder.issue_date(parse_date(issue)?);
    }
    let terms = builder.build()?;

    let report = match (args.price, args.yield_percent) {
        (Some(price), _) => {
            let price = validate_price(price)?;
            let result = YieldSolver::new().solve(price, &terms, settlement)?;
            tracing::debug!("solved in {} iterations ({:?})", result.iterations, result.method);
            report(&terms, settlement, price, result.yield_percent, Some(&result))?
        }
        (None, Some(yield_percent)) => {
            let price = price_from_yield(yield_percent, &terms, settlement)?;
            report(&terms, settlement, price, yield_percent, None)?
        }
        // at par: the coupon rate as yield
        (None, None) => {
            let price = price_from_yield(coupon, &terms, settlement)?;
            report(&terms, settlement, price, coupon, None)?
        }
    };

    match ctx.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.serialize(&report)?;
            wtr.flush()?;
            Ok(())
        }
        OutputFormat::Table => {
            ctx.header(&format!("{} settling {}", terms.display_name(), settlement));
            print_output(&rows(&report, terms.face_value()), ctx.format)
        }
    }
}

fn report(
    terms: &BondTerms,
    settlement: Date,
    clean_price_percent: f64,
    yield_percent: f64,
    solved: Option<&YieldResult>,
) -> Result<YtmReport> {
    let accrued = accrued_interest(terms, settlement)?.amount;
    let face = terms.face_value().to_f64().context("face value out of range")?;
    let dirty_price = clean_price_percent / 100.0 * face + accrued.to_f64().unwrap_or(0.0);

    Ok(YtmReport {
        isin: terms.isin().to_string(),
        settlement,
        clean_price_percent,
        yield_percent,
        accrued,
        dirty_price,
        macaulay_duration: macaulay_duration(yield_percent, terms, settlement)?,
        modified_duration: modified_duration(yield_percent, terms, settlement)?,
        iterations: solved.map(|r| r.iterations),
        method: solved.map(|r| r.method),
    })
}

fn rows(report: &YtmReport, face: Decimal) -> Vec<KeyValue> {
    let mut rows = vec![
        KeyValue::new("Face Value", face.to_string()),
        KeyValue::new("Clean Price", format!("{:.6}%", report.clean_price_percent)),
        KeyValue::new("Accrued Interest", format!("{:.2}", report.accrued)),
        KeyValue::new("Dirty Price", format!("{:.4}", report.dirty_price)),
        KeyValue::new("Yield to Maturity", format!("{:.4}%", report.yield_percent)),
        KeyValue::new("Macaulay Duration", format!("{:.4} years", report.macaulay_duration)),
        KeyValue::new("Modified Duration", format!("{:.4}", report.modified_duration)),
    ];
    if let (Some(iterations), Some(method)) = (report.iterations, report.method) {
        rows.push(KeyValue::new("Solver", format!("{method:?}, {iterations} iterations")));
    }
    rows
}
