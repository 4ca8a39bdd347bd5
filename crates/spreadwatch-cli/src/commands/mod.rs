//! CLI command implementations.

pub mod backtest;
pub mod config;
pub mod series;
pub mod signals;
pub mod spread;
pub mod ytm;

pub use backtest::BacktestArgs;
pub use config::ConfigArgs;
pub use series::SeriesArgs;
pub use signals::SignalsArgs;
pub use spread::SpreadArgs;
pub use ytm::YtmArgs;

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use spreadwatch_analytics::observations::{SpreadObservation, YieldObservation};
use spreadwatch_analytics::spreads::{compute_pair_spreads, compute_spread_with, PairSpreads};
use spreadwatch_analytics::valuation::{BondSeries, SeriesValuer};
use spreadwatch_config::{PairEntry, SpreadwatchConfig};
use spreadwatch_core::Date;

use crate::error::{CliError, CliResult};
use crate::prices::PriceBook;

/// Configuration and price inputs shared by the data commands.
#[derive(Args, Debug)]
pub struct DataArgs {
    /// Configuration file (TOML)
    #[arg(short, long, env = "SPREADWATCH_CONFIG")]
    pub config: PathBuf,

    /// Price file (CSV: timestamp,isin,price)
    #[arg(short, long)]
    pub prices: PathBuf,
}

impl DataArgs {
    /// Loads and validates the configuration, then reads the prices.
    pub fn load(&self) -> Result<(SpreadwatchConfig, PriceBook)> {
        let config = SpreadwatchConfig::load(&self.config)?;
        let book = PriceBook::load(&self.prices)?;
        Ok((config, book))
    }
}

/// Yield series for one configured ISIN.
pub fn yield_series(config: &SpreadwatchConfig, book: &PriceBook, isin: &str) -> Result<Vec<YieldObservation>> {
    let terms = config.terms(isin)?;
    let prices = book.series(isin)?;
    let valuer = SeriesValuer::new(config.solver.solver());
    Ok(valuer.value(prices, &terms))
}

/// Spread series for a configured pair.
pub fn pair_spreads(
    config: &SpreadwatchConfig,
    book: &PriceBook,
    pair: &PairEntry,
) -> Result<Vec<SpreadObservation>> {
    let a = yield_series(config, book, &pair.isin_a)?;
    let b = yield_series(config, book, &pair.isin_b)?;
    let spreads = compute_spread_with(&a, &b, config.spread.join);
    tracing::info!(
        "pair {}: {} aligned spreads from {} and {} yields",
        pair.name,
        spreads.len(),
        a.len(),
        b.len()
    );
    Ok(spreads)
}

/// Spread histories for every configured pair.
///
/// Bonds without prices are left out with a warning, and so are the pairs
/// that need them.
pub fn all_pair_spreads(config: &SpreadwatchConfig, book: &PriceBook) -> Result<Vec<PairSpreads>> {
    let mut isins = Vec::new();
    let mut universe: Vec<BondSeries> = Vec::new();
    for bond in &config.bonds {
        match book.series(&bond.isin) {
            Ok(prices) => {
                isins.push(bond.isin.clone());
                universe.push((bond.to_terms()?, prices.to_vec()));
            }
            Err(err) => tracing::warn!("{err}"),
        }
    }

    let valuer = SeriesValuer::new(config.solver.solver());
    let yields: HashMap<String, Vec<YieldObservation>> =
        isins.into_iter().zip(valuer.value_universe(&universe)).collect();
    let pairs = compute_pair_spreads(&yields, &config.spread_pairs(), config.spread.join);
    tracing::info!("{} of {} pairs have spreads", pairs.len(), config.pairs.len());
    Ok(pairs)
}

/// Parses a date string in YYYY-MM-DD format.
pub fn parse_date(s: &str) -> CliResult<Date> {
    Date::parse(s).map_err(|_| CliError::InvalidDate(s.to_string()))
}

/// Validates a clean price.
pub fn validate_price(price: f64) -> CliResult<f64> {
    if !(price.is_finite() && price > 0.0) {
        return Err(CliError::InvalidPrice(price));
    }
    Ok(price)
}

/// Validates a coupon rate.
pub fn validate_coupon(coupon: f64) -> CliResult<f64> {
    if !(0.0..=100.0).contains(&coupon) {
        return Err(CliError::InvalidCoupon(coupon));
    }
    Ok(coupon)
}
