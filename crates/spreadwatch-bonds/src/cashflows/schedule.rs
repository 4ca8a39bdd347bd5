//! Coupon schedule generation.

use serde::Serialize;

use spreadwatch_core::{Date, Frequency};

use crate::error::BondResult;
use crate::terms::BondTerms;

/// Extra days generated before the reference date's coupon period.
pub const DEFAULT_LOOKBACK_MARGIN_DAYS: i64 = 31;

/// One regular coupon period, `start <= date < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CouponPeriod {
    /// Last coupon date on or before the date of interest.
    pub start: Date,
    /// Next coupon date after it.
    pub end: Date,
}

impl CouponPeriod {
    /// Checks whether `date` falls inside the period.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date < self.end
    }
}

/// Ascending coupon dates of a bond, ending at maturity.
///
/// Every date is computed as `maturity − k × (12 / f)` months directly from
/// maturity, so month-end clamping never accumulates. Derived data: never
/// mutated, regenerated whenever the terms or the required coverage change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CouponSchedule {
    dates: Vec<Date>,
    frequency: Frequency,
    issue_date: Option<Date>,
    reaches_issue: bool,
}

impl CouponSchedule {
    /// Generates the schedule needed to value `terms` at `reference`.
    pub fn generate(terms: &BondTerms, reference: Date) -> BondResult<Self> {
        Self::generate_with_margin(terms, reference, DEFAULT_LOOKBACK_MARGIN_DAYS)
    }

    /// Generates coupon dates back from maturity until one falls strictly
    /// before `reference − one period − margin_days`, or on/before the issue
    /// date when that is known.
    pub fn generate_with_margin(
        terms: &BondTerms,
        reference: Date,
        margin_days: i64,
    ) -> BondResult<Self> {
        let maturity = terms.maturity_date();
        let months = terms.frequency().months_per_period() as i32;
        let earliest_needed = reference.add_months(-months)?.add_days(-margin_days.max(0));

        let mut dates = vec![maturity];
        let mut reaches_issue = false;
        let mut step = 1;

        loop {
            let current = dates[dates.len() - 1];
            if current < earliest_needed {
                break;
            }
            if let Some(issue) = terms.issue_date() {
                if current <= issue {
                    reaches_issue = true;
                    break;
                }
            }
            dates.push(maturity.add_months(-months * step)?);
            step += 1;
        }

        dates.reverse();
        log::debug!(
            "generated {} coupon dates for {} ({} .. {})",
            dates.len(),
            terms.isin(),
            dates[0],
            maturity
        );

        Ok(Self {
            dates,
            frequency: terms.frequency(),
            issue_date: terms.issue_date(),
            reaches_issue,
        })
    }

    /// All coupon dates, ascending. The last one is maturity.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Coupon frequency the schedule was generated with.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Issue date the schedule was bounded by, if any.
    pub fn issue_date(&self) -> Option<Date> {
        self.issue_date
    }

    /// Earliest generated coupon date.
    pub fn first_date(&self) -> Date {
        self.dates[0]
    }

    /// Maturity date.
    pub fn maturity(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }

    /// Checks whether the schedule can answer [`period_for`](Self::period_for)
    /// for `date` without regenerating. Dates before issue are covered once
    /// the schedule reaches back to the issue date: no period exists there.
    pub fn covers(&self, date: Date) -> bool {
        date >= self.first_date() || self.reaches_issue
    }

    /// The coupon period containing `date`: `start <= date < end`.
    ///
    /// On a coupon date the new period starts that day. Returns `None` on or
    /// after maturity and before the first generated date.
    pub fn period_for(&self, date: Date) -> Option<CouponPeriod> {
        // index of the first coupon date strictly after `date`
        let idx = self.dates.partition_point(|&d| d <= date);
        if idx == 0 || idx == self.dates.len() {
            return None;
        }
        Some(CouponPeriod {
            start: self.dates[idx - 1],
            end: self.dates[idx],
        })
    }

    /// Coupon dates strictly after `date`, ascending.
    pub fn remaining_after(&self, date: Date) -> &[Date] {
        let idx = self.dates.partition_point(|&d| d <= date);
        &self.dates[idx..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terms::BondTermsBuilder;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn terms(maturity: Date, freq: i64) -> BondTerms {
        BondTermsBuilder::new("TEST")
            .maturity(maturity)
            .coupon_rate(dec!(6))
            .coupon_frequency(freq)
            .build()
            .unwrap()
    }

    #[test]
    fn test_semi_annual_walk_back() {
        let schedule = CouponSchedule::generate(&terms(d(2030, 3, 15), 2), d(2028, 5, 10)).unwrap();
        let dates = schedule.dates();

        assert_eq!(dates[dates.len() - 1], d(2030, 3, 15));
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert!(dates.contains(&d(2028, 3, 15)));
        assert!(schedule.first_date() < d(2027, 11, 10));

        let period = schedule.period_for(d(2028, 5, 10)).unwrap();
        assert_eq!(period, CouponPeriod { start: d(2028, 3, 15), end: d(2028, 9, 15) });
    }

    #[test]
    fn test_month_end_clamping_does_not_drift() {
        let schedule = CouponSchedule::generate(&terms(d(2030, 8, 31), 4), d(2029, 1, 15)).unwrap();
        let dates = schedule.dates();

        assert!(dates.contains(&d(2030, 2, 28)));
        assert!(dates.contains(&d(2029, 11, 30)));
        // computed from maturity, so August stays on the 31st
        assert!(dates.contains(&d(2029, 8, 31)));
        assert!(dates.contains(&d(2029, 2, 28)));
    }

    #[test]
    fn test_period_on_coupon_date_starts_that_day() {
        let schedule = CouponSchedule::generate(&terms(d(2030, 3, 15), 2), d(2029, 9, 15)).unwrap();
        let period = schedule.period_for(d(2029, 9, 15)).unwrap();
        assert_eq!(period.start, d(2029, 9, 15));
        assert_eq!(period.end, d(2030, 3, 15));
    }

    #[test]
    fn test_no_period_at_or_after_maturity() {
        let t = terms(d(2030, 3, 15), 2);
        let schedule = CouponSchedule::generate(&t, d(2030, 3, 15)).unwrap();
        assert_eq!(schedule.period_for(d(2030, 3, 15)), None);
        assert_eq!(schedule.period_for(d(2031, 1, 1)), None);
        assert!(schedule.remaining_after(d(2030, 3, 15)).is_empty());
    }

    #[test]
    fn test_bounded_by_issue_date() {
        let t = BondTermsBuilder::new("NEW")
            .maturity(d(2030, 6, 1))
            .issue_date(d(2029, 2, 10))
            .coupon_rate(dec!(5))
            .build()
            .unwrap();

        let schedule = CouponSchedule::generate(&t, d(2029, 3, 1)).unwrap();
        assert_eq!(schedule.first_date(), d(2028, 12, 1));
        assert!(schedule.covers(d(2020, 1, 1)));
        assert_eq!(
            schedule.period_for(d(2029, 3, 1)),
            Some(CouponPeriod { start: d(2028, 12, 1), end: d(2029, 6, 1) })
        );
    }

    #[test]
    fn test_remaining_after() {
        let schedule = CouponSchedule::generate(&terms(d(2027, 1, 10), 1), d(2025, 3, 1)).unwrap();
        assert_eq!(
            schedule.remaining_after(d(2025, 3, 1)),
            &[d(2026, 1, 10), d(2027, 1, 10)]
        );
        assert_eq!(schedule.remaining_after(d(2026, 1, 10)), &[d(2027, 1, 10)]);
    }
}
