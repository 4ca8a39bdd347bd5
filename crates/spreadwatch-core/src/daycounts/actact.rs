//! Actual/Actual day count conventions.

use chrono::Datelike;
use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// Actual/Actual ICMA day count convention.
///
/// Accrual is measured in actual days against the actual length of the
/// coupon period that contains it (see [`DayCount::period_fraction`]), which
/// is how government bond accrued interest is quoted.
///
/// Without a reference period the year fraction falls back to the
/// calendar-year split of [`ActActIsda`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIcma;

impl DayCount for ActActIcma {
    fn name(&self) -> &'static str {
        "ACT/ACT ICMA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        ActActIsda.year_fraction(start, end)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Actual/Actual ISDA day count convention.
///
/// # Formula
///
/// $$\text{Year Fraction} = \frac{\text{Days in non-leap years}}{365} + \frac{\text{Days in leap years}}{366}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIsda;

impl DayCount for ActActIsda {
    fn name(&self) -> &'static str {
        "ACT/ACT ISDA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        if start > end {
            return -self.year_fraction(end, start);
        }

        let mut total = Decimal::ZERO;
        let mut current = start.as_naive_date();
        let end = end.as_naive_date();

        while current.year() < end.year() {
            let basis = Date::from(current).days_in_year();
            // days from `current` up to and including Dec 31
            let remaining = i64::from(basis - current.ordinal() + 1);
            total += Decimal::from(remaining) / Decimal::from(basis);
            current += chrono::Duration::days(remaining);
        }

        let days = (end - current).num_days();
        total + Decimal::from(days) / Decimal::from(Date::from(current).days_in_year())
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_isda_full_years() {
        assert_eq!(ActActIsda.year_fraction(d(2025, 1, 1), d(2026, 1, 1)), dec!(1));
        assert_eq!(ActActIsda.year_fraction(d(2024, 1, 1), d(2025, 1, 1)), dec!(1));
    }

    #[test]
    fn test_isda_cross_year_split() {
        // 2024-07-01..2025-01-01 = 184 leap days, then 181 normal days
        let yf = ActActIsda.year_fraction(d(2024, 7, 1), d(2025, 7, 1));
        assert_eq!(yf, dec!(184) / dec!(366) + dec!(181) / dec!(365));
    }

    #[test]
    fn test_isda_reversed_is_negative() {
        let a = d(2024, 3, 1);
        let b = d(2026, 9, 30);
        assert_eq!(ActActIsda.year_fraction(b, a), -ActActIsda.year_fraction(a, b));
    }

    #[test]
    fn test_icma_period_fraction() {
        let start = d(2025, 1, 15);
        let end = d(2025, 7, 15);
        let f = ActActIcma.period_fraction(start, d(2025, 4, 15), start, end);
        assert_eq!(f, dec!(90) / dec!(181));
    }
}
