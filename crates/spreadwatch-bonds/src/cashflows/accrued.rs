//! Accrued interest.
//!
//! `accrued = coupon_per_period × accrual_fraction`, where the fraction is
//! the elapsed share of the current coupon period under the bond's day count
//! convention. Settlement is a required argument of every function here: a
//! value computed for one date is never valid for another.

use rust_decimal::Decimal;
use serde::Serialize;

use spreadwatch_core::Date;

use crate::error::BondResult;
use crate::terms::BondTerms;

use super::schedule::{CouponPeriod, CouponSchedule};

/// Whether an accrued amount is meaningful for its settlement date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccrualStatus {
    /// Settlement lies inside a coupon period.
    Accruing,
    /// Settlement is on or after maturity.
    Matured,
    /// Settlement precedes the issue date or the first known coupon date.
    PreIssue,
}

/// Accrued interest at one settlement date, in currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccruedInterest {
    /// Accrued amount; zero whenever `status` is not `Accruing`.
    pub amount: Decimal,
    /// Elapsed share of the coupon period.
    pub fraction: Decimal,
    /// Whether the amount means anything.
    pub status: AccrualStatus,
    /// Coupon period containing the settlement date.
    pub period: Option<CouponPeriod>,
}

impl AccruedInterest {
    fn undefined(status: AccrualStatus) -> Self {
        Self {
            amount: Decimal::ZERO,
            fraction: Decimal::ZERO,
            status,
            period: None,
        }
    }

    /// True when settlement falls inside a coupon period.
    pub fn is_meaningful(&self) -> bool {
        self.status == AccrualStatus::Accruing
    }
}

/// Accrued interest of `terms` at `settlement`.
///
/// Generates the coupon schedule for this settlement date. Matured and
/// pre-issue dates return a zero amount flagged by
/// [`AccruedInterest::status`] rather than an error.
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
///
/// // 91 days into a 182-day period
/// let ai = accrued_interest(&terms, Date::from_ymd(2027, 12, 1).unwrap()).unwrap();
/// assert_eq!(ai.amount, dec!(20));
/// ```
pub fn accrued_interest(terms: &BondTerms, settlement: Date) -> BondResult<AccruedInterest> {
    if settlement >= terms.maturity_date() {
        return Ok(AccruedInterest::undefined(AccrualStatus::Matured));
    }
    let schedule = CouponSchedule::generate(terms, settlement)?;
    Ok(accrued_interest_with_schedule(terms, &schedule, settlement))
}

/// Accrued interest of `terms` at `settlement` using a pre-built schedule.
///
/// The schedule must belong to `terms` and cover `settlement`; an uncovered
/// date reports `PreIssue`.
pub fn accrued_interest_with_schedule(
    terms: &BondTerms,
    schedule: &CouponSchedule,
    settlement: Date,
) -> AccruedInterest {
    if settlement >= terms.maturity_date() {
        return AccruedInterest::undefined(AccrualStatus::Matured);
    }
    if terms.issue_date().is_some_and(|issue| settlement < issue) {
        return AccruedInterest::undefined(AccrualStatus::PreIssue);
    }
    let Some(period) = schedule.period_for(settlement) else {
        return AccruedInterest::undefined(AccrualStatus::PreIssue);
    };

    let dc = terms.day_count();
    let freq = terms.frequency();
    // a short first period accrues from issue, not from the notional start
    let accrual_start = terms
        .issue_date()
        .filter(|&issue| issue > period.start)
        .unwrap_or(period.start);
    let fraction = dc
        .accrual_fraction_from(accrual_start, settlement, period.start, period.end, freq)
        .max(Decimal::ZERO);

    AccruedInterest {
        amount: terms.coupon_amount() * fraction,
        fraction,
        status: AccrualStatus::Accruing,
        period: Some(period),
    }
}
