//! Series valuation: one yield per price observation.
//!
//! Each point is valued at its own settlement date, so accrued interest is
//! recomputed per point. Coupon schedules are shared through a
//! [`ScheduleCache`] that lives for a single call. A failed point is
//! recorded with its [`ValuationStatus`] and the series carries on.

use chrono::NaiveDateTime;

use spreadwatch_bonds::cashflows::ScheduleCache;
use spreadwatch_bonds::pricing::YieldSolver;
use spreadwatch_bonds::BondTerms;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::observations::{PriceObservation, ValuationStatus, YieldObservation};
use crate::parallel::{maybe_parallel_map, DEFAULT_PARALLEL_THRESHOLD};

/// Prices paired with the terms of the bond they belong to.
pub type BondSeries = (BondTerms, Vec<PriceObservation>);

/// Values price series with a configured [`YieldSolver`].
#[derive(Debug, Clone)]
pub struct SeriesValuer {
    solver: YieldSolver,
    parallel_threshold: usize,
}

impl Default for SeriesValuer {
    fn default() -> Self {
        Self::new(YieldSolver::new())
    }
}

impl SeriesValuer {
    /// Creates a valuer around `solver`.
    pub fn new(solver: YieldSolver) -> Self {
        Self {
            solver,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Sets the universe size above which bonds are valued in parallel.
    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Solver in use.
    pub fn solver(&self) -> &YieldSolver {
        &self.solver
    }

    /// Yield of a single observation.
    pub fn solve_point(
        &self,
        price: &PriceObservation,
        terms: &BondTerms,
        cache: &mut ScheduleCache,
    ) -> AnalyticsResult<f64> {
        let settlement = price.settlement();
        terms.check_settlement(settlement)?;
        let schedule = cache.get_or_generate(terms, settlement)?;
        let result = self.solver.solve_with_schedule(
            price.clean_price_percent,
            terms,
            &schedule,
            settlement,
        )?;
        Ok(result.yield_percent)
    }

    fn value_point(
        &self,
        price: &PriceObservation,
        isin: &str,
        terms: Option<&BondTerms>,
        cache: &mut ScheduleCache,
    ) -> YieldObservation {
        let Some(terms) = terms else {
            log::warn!("{isin} @ {}: no bond terms", price.timestamp);
            return YieldObservation::failed(price.timestamp, isin, ValuationStatus::MissingTerms);
        };

        match self.solve_point(price, terms, cache) {
            Ok(ytm) => YieldObservation::solved(price.timestamp, isin, ytm),
            Err(AnalyticsError::Bond(e)) => {
                log::warn!("{isin} @ {}: {e}", price.timestamp);
                YieldObservation::failed(price.timestamp, isin, ValuationStatus::from_error(&e))
            }
            Err(e) => {
                log::warn!("{isin} @ {}: {e}", price.timestamp);
                YieldObservation::failed(price.timestamp, isin, ValuationStatus::InvalidInput)
            }
        }
    }

    /// One yield observation per price, in input order.
    pub fn value(&self, prices: &[PriceObservation], terms: &BondTerms) -> Vec<YieldObservation> {
        let mut cache = ScheduleCache::new();
        let out: Vec<_> = prices
            .iter()
            .map(|p| self.value_point(p, terms.isin(), Some(terms), &mut cache))
            .collect();
        let (hits, misses) = cache.stats();
        log::debug!(
            "valued {} points for {} (schedule cache {hits} hits, {misses} misses)",
            out.len(),
            terms.isin()
        );
        out
    }

    /// Like [`value`](Self::value), resolving terms per observation.
    ///
    /// `lookup` returns `None` where no terms are known; those points are
    /// recorded as `MissingTerms`.
    pub fn value_with<'a, F>(
        &self,
        prices: &[PriceObservation],
        isin: &str,
        mut lookup: F,
    ) -> Vec<YieldObservation>
    where
        F: FnMut(&str, NaiveDateTime) -> Option<&'a BondTerms>,
    {
        let mut cache = ScheduleCache::new();
        prices
            .iter()
            .map(|p| {
                let terms = lookup(isin, p.timestamp);
                self.value_point(p, isin, terms, &mut cache)
            })
            .collect()
    }

    /// Values several independent bonds; output order matches input.
    pub fn value_universe(&self, universe: &[BondSeries]) -> Vec<Vec<YieldObservation>> {
        maybe_parallel_map(universe, self.parallel_threshold, |(terms, prices)| {
            self.value(prices, terms)
        })
    }
}

/// Yield series for `prices` of the bond described by `terms`.
///
/// Never aborts on a single point: failures become `ytm_percent = None`
/// with the matching [`ValuationStatus`].
pub fn compute_yield_series(prices: &[PriceObservation], terms: &BondTerms) -> Vec<YieldObservation> {
    SeriesValuer::default().value(prices, terms)
}

/// Yield series with terms resolved per observation through `lookup`.
pub fn compute_yield_series_with<'a, F>(
    prices: &[PriceObservation],
    isin: &str,
    lookup: F,
) -> Vec<YieldObservation>
where
    F: FnMut(&str, NaiveDateTime) -> Option<&'a BondTerms>,
{
    SeriesValuer::default().value_with(prices, isin, lookup)
}

/// Yield series for many bonds at once, using rayon when the `parallel`
/// feature is enabled.
pub fn value_universe(universe: &[BondSeries]) -> Vec<Vec<YieldObservation>> {
    SeriesValuer::default().value_universe(universe)
}
