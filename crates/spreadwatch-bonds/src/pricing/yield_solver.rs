//! Yield to maturity from a clean price.

use rust_decimal::Decimal;
use serde::Serialize;

use spreadwatch_core::Date;
use spreadwatch_math::solvers::{brent, newton_raphson_guarded, SolverConfig, SolverResult};
use spreadwatch_math::MathError;

use crate::cashflows::{accrued_interest_with_schedule, CouponSchedule};
use crate::error::{BondError, BondResult};
use crate::terms::BondTerms;

use super::discount::{to_f64, DiscountedFlows};

/// Default pricing tolerance, in currency units.
pub const DEFAULT_YIELD_TOLERANCE: f64 = 1e-6;

/// Default iteration bound for each solver stage.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Root finder that produced a yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolveMethod {
    /// Newton-Raphson from the closed-form seed.
    Newton,
    /// Bracketed Brent search after Newton failed.
    Brent,
}

/// Result of a yield calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YieldResult {
    /// Annual yield to maturity in percent (8.5 means 8.5%).
    pub yield_percent: f64,
    /// Iterations spent by the successful stage.
    pub iterations: u32,
    /// `PV(y) − dirty price` at the returned yield, in currency units.
    pub residual: f64,
    /// Accrued interest at settlement, in currency units.
    pub accrued: Decimal,
    /// Dirty price the yield reconciles, in currency units.
    pub dirty_price: f64,
    /// Stage that converged.
    pub method: SolveMethod,
}

/// Yield-to-maturity solver.
///
/// Newton-Raphson on the decimal yield with an analytic derivative, steps
/// held inside `1 + y/f > 0`, followed by Brent over widening brackets.
/// Either the pricing error drops below the tolerance or the call fails
/// with [`BondError::ConvergenceFailure`]; no default yield is ever returned.
#[derive(Debug, Clone)]
pub struct YieldSolver {
    config: SolverConfig,
}

impl Default for YieldSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl YieldSolver {
    /// Creates a solver with tolerance 1e-6 currency units and 100 iterations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SolverConfig::new(DEFAULT_YIELD_TOLERANCE, DEFAULT_MAX_ITERATIONS),
        }
    }

    /// Sets the pricing tolerance in currency units.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config = self.config.with_tolerance(tolerance);
        self
    }

    /// Sets the iteration bound.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.config = self.config.with_max_iterations(max_iterations);
        self
    }

    /// Replaces the whole solver configuration.
    #[must_use]
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Solver configuration in use.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves for the yield at which the bond's discounted cash flows equal
    /// its dirty price at `settlement`.
    ///
    /// # Errors
    ///
    /// - `InvalidBondTerms` for a non-finite or non-positive price, or a
    ///   settlement before issue
    /// - `MaturedInstrument` if settlement is on or after maturity
    /// - `ConvergenceFailure` if neither solver stage meets the tolerance
    pub fn solve(
        &self,
        clean_price_percent: f64,
        terms: &BondTerms,
        settlement: Date,
    ) -> BondResult<YieldResult> {
        check_price(clean_price_percent)?;
        terms.check_settlement(settlement)?;
        let schedule = CouponSchedule::generate(terms, settlement)?;
        self.solve_with_schedule(clean_price_percent, terms, &schedule, settlement)
    }

    /// Same as [`solve`](Self::solve) with a pre-built schedule covering
    /// `settlement`, e.g. one taken from a
    /// [`ScheduleCache`](crate::cashflows::ScheduleCache).
    pub fn solve_with_schedule(
        &self,
        clean_price_percent: f64,
        terms: &BondTerms,
        schedule: &CouponSchedule,
        settlement: Date,
    ) -> BondResult<YieldResult> {
        check_price(clean_price_percent)?;
        terms.check_settlement(settlement)?;

        let accrued = accrued_interest_with_schedule(terms, schedule, settlement);
        let flows = DiscountedFlows::new(terms, schedule, settlement)?;
        let face = to_f64(terms.face_value())?;
        let dirty_price = clean_price_percent / 100.0 * face + to_f64(accrued.amount)?;

        let f = flows.periods_per_year();
        let seed = (seed_yield(clean_price_percent, terms, settlement)? / 100.0)
            .clamp(-0.5, 1.0);

        let objective = |y: f64| flows.present_value(y) - dirty_price;
        let derivative = |y: f64| flows.derivative(y);
        let in_domain = |y: f64| flows.in_domain(y);

        let finish = |result: SolverResult, method: SolveMethod| {
            log::debug!(
                "{} @ {clean_price_percent} on {settlement}: {:.6}% ({method:?}, {} iterations, residual {:.2e})",
                terms.isin(),
                result.root * 100.0,
                result.iterations,
                result.residual
            );
            YieldResult {
                yield_percent: result.root * 100.0,
                iterations: result.iterations,
                residual: result.residual,
                accrued: accrued.amount,
                dirty_price,
                method,
            }
        };

        let newton_error =
            match newton_raphson_guarded(&objective, &derivative, seed, &in_domain, &self.config) {
                Ok(result) => return Ok(finish(result, SolveMethod::Newton)),
                Err(e) => e,
            };
        log::debug!("{}: Newton failed ({newton_error}), falling back to Brent", terms.isin());

        let brackets = [
            (seed - 0.05, seed + 0.05),
            (-0.1, 0.5),
            (-0.5, 2.0),
            (-0.9 * f, 10.0),
        ];
        for (lower, upper) in brackets {
            if !in_domain(lower) {
                continue;
            }
            if let Ok(result) = brent(&objective, lower, upper, &self.config) {
                return Ok(finish(result, SolveMethod::Brent));
            }
        }

        let residual = match newton_error {
            MathError::ConvergenceFailed { residual, .. } => residual,
            _ => objective(seed).abs(),
        };
        Err(BondError::convergence_failure(self.config.max_iterations, residual))
    }
}

fn check_price(clean_price_percent: f64) -> BondResult<()> {
    if !clean_price_percent.is_finite() || clean_price_percent <= 0.0 {
        return Err(BondError::invalid_terms(format!(
            "clean price {clean_price_percent} must be positive and finite"
        )));
    }
    Ok(())
}

/// `(C + (F − P)/n) / ((F + P)/2)` in percent, `n` in years to maturity.
fn seed_yield(clean_price_percent: f64, terms: &BondTerms, settlement: Date) -> BondResult<f64> {
    let face = to_f64(terms.face_value())?;
    let annual_coupon = face * to_f64(terms.coupon_rate())? / 100.0;
    let price = clean_price_percent / 100.0 * face;
    let years = (terms.maturity_date() - settlement) as f64 / 365.25;

    Ok((annual_coupon + (face - price) / years) / ((face + price) / 2.0) * 100.0)
}

/// Closed-form yield estimate in percent.
///
/// `(C + (F − P)/n) / ((F + P)/2)` with annual coupon `C`, face `F`, clean
/// price `P` and `n` years to maturity. Good to a few basis points for
/// bonds near par; the solver uses it as its starting point.
///
/// ```rust
/// use spreadwatch_bonds::prelude::*;
/// use spreadwatch_core::Date;
/// use rust_decimal_macros::dec;
///
/// let terms = BondTermsBuilder::new("X")
///     .maturity(Date::from_ymd(2032, 9, 1).unwrap())
///     .coupon_rate(dec!(8))
///     .build()
///     .unwrap();
/// let y = approximate_yield(100.0, &terms, Date::from_ymd(2027, 9, 1).unwrap()).unwrap();
/// assert!((y - 8.0).abs() < 1e-12);
/// ```
pub fn approximate_yield(
    clean_price_percent: f64,
    terms: &BondTerms,
    settlement: Date,
) -> BondResult<f64> {
    check_price(clean_price_percent)?;
    terms.check_settlement(settlement)?;
    seed_yield(clean_price_percent, terms, settlement)
}

/// Clean price in percent of face at `yield_percent`.
///
/// # Errors
///
/// `InvalidBondTerms` if the yield is not finite or `1 + y/f <= 0`;
/// settlement errors as for [`YieldSolver::solve`].
pub fn price_from_yield(yield_percent: f64, terms: &BondTerms, settlement: Date) -> BondResult<f64> {
    terms.check_settlement(settlement)?;
    let schedule = CouponSchedule::generate(terms, settlement)?;
    let flows = DiscountedFlows::new(terms, &schedule, settlement)?;

    let y = yield_percent / 100.0;
    if !flows.in_domain(y) {
        return Err(BondError::invalid_terms(format!(
            "yield {yield_percent}% is outside the discounting domain"
        )));
    }

    let accrued = to_f64(accrued_interest_with_schedule(terms, &schedule, settlement).amount)?;
    let face = to_f64(terms.face_value())?;
    Ok((flows.present_value(y) - accrued) / face * 100.0)
}
