//! Remaining cash flows of a bond, discounted per coupon period.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use spreadwatch_core::Date;

use crate::cashflows::CouponSchedule;
use crate::error::{BondError, BondResult};
use crate::terms::BondTerms;

/// Converts a currency amount for the floating-point solver.
pub(crate) fn to_f64(value: Decimal) -> BondResult<f64> {
    value
        .to_f64()
        .ok_or_else(|| BondError::invalid_terms(format!("{value} is not representable as f64")))
}

/// Future cash flows as `(periods until payment, amount)` pairs.
#[derive(Debug, Clone)]
pub(crate) struct DiscountedFlows {
    periods_per_year: f64,
    flows: Vec<(f64, f64)>,
}

impl DiscountedFlows {
    /// Collects the cash flows after `settlement`.
    ///
    /// The schedule must cover `settlement`, which must lie before maturity.
    pub(crate) fn new(
        terms: &BondTerms,
        schedule: &CouponSchedule,
        settlement: Date,
    ) -> BondResult<Self> {
        let period = schedule.period_for(settlement).ok_or_else(|| {
            BondError::invalid_terms(format!(
                "{}: no coupon period contains settlement {settlement}",
                terms.isin()
            ))
        })?;

        let dc = terms.day_count().to_day_count();
        let w = to_f64(dc.period_fraction(settlement, period.end, period.start, period.end))?;

        let coupon = to_f64(terms.coupon_amount())?;
        let face = to_f64(terms.face_value())?;
        let remaining = schedule.remaining_after(settlement);
        let last = remaining.len().saturating_sub(1);

        let flows = (0..remaining.len())
            .map(|k| {
                let amount = if k == last { coupon + face } else { coupon };
                (w + k as f64, amount)
            })
            .collect();

        Ok(Self {
            periods_per_year: f64::from(terms.frequency().periods_per_year()),
            flows,
        })
    }

    pub(crate) fn periods_per_year(&self) -> f64 {
        self.periods_per_year
    }

    /// Yields for which the per-period discount base `1 + y/f` is positive.
    pub(crate) fn in_domain(&self, y: f64) -> bool {
        y.is_finite() && 1.0 + y / self.periods_per_year > 0.0
    }

    /// Dirty value in currency at decimal yield `y`.
    pub(crate) fn present_value(&self, y: f64) -> f64 {
        let base = 1.0 + y / self.periods_per_year;
        self.flows
            .iter()
            .map(|&(periods, amount)| amount * base.powf(-periods))
            .sum()
    }

    /// d(PV)/dy.
    pub(crate) fn derivative(&self, y: f64) -> f64 {
        let base = 1.0 + y / self.periods_per_year;
        self.flows
            .iter()
            .map(|&(periods, amount)| {
                -amount * periods / self.periods_per_year * base.powf(-periods - 1.0)
            })
            .sum()
    }

    /// PV-weighted average time to payment, in years.
    pub(crate) fn macaulay(&self, y: f64) -> f64 {
        let base = 1.0 + y / self.periods_per_year;
        let (weighted, total) = self
            .flows
            .iter()
            .fold((0.0, 0.0), |(weighted, total), &(periods, amount)| {
                let pv = amount * base.powf(-periods);
                (weighted + periods / self.periods_per_year * pv, total + pv)
            });
        if total == 0.0 {
            0.0
        } else {
            weighted / total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terms::BondTermsBuilder;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn flows(settlement: Date) -> DiscountedFlows {
        let terms = BondTermsBuilder::new("T")
            .maturity(d(2030, 3, 1))
            .coupon_rate(dec!(6))
            .face_value(dec!(100))
            .build()
            .unwrap();
        let schedule = CouponSchedule::generate(&terms, settlement).unwrap();
        DiscountedFlows::new(&terms, &schedule, settlement).unwrap()
    }

    #[test]
    fn test_flows_on_coupon_date() {
        let f = flows(d(2029, 3, 1));
        assert_eq!(f.flows, vec![(1.0, 3.0), (2.0, 103.0)]);
    }

    #[test]
    fn test_par_value_at_coupon_yield() {
        let f = flows(d(2027, 3, 1));
        assert_relative_eq!(f.present_value(0.06), 100.0, epsilon = 1e-10);
        assert_relative_eq!(f.present_value(0.0), 118.0, epsilon = 1e-10);
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let f = flows(d(2026, 11, 17));
        let h = 1e-6;
        let numeric = (f.present_value(0.07 + h) - f.present_value(0.07 - h)) / (2.0 * h);
        assert_relative_eq!(f.derivative(0.07), numeric, max_relative = 1e-6);
    }

    #[test]
    fn test_domain() {
        let f = flows(d(2027, 3, 1));
        assert!(f.in_domain(-1.9));
        assert!(!f.in_domain(-2.0));
        assert!(!f.in_domain(f64::NAN));
    }
}
