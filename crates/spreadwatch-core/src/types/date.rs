//! Calendar date used for settlement and coupon dates.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// A calendar date.
///
/// Newtype over `chrono::NaiveDate` with the month arithmetic coupon
/// schedules need: stepping by whole months clamps to the last valid day of
/// the target month, so stepping back from the 31st into a 30-day month is
/// deterministic.
///
/// # Example
///
/// ```rust
/// use spreadwatch_core::types::Date;
///
/// let maturity = Date::from_ymd(2030, 8, 31).unwrap();
/// let coupon = maturity.add_months(-6).unwrap();
/// assert_eq!(coupon, Date::from_ymd(2030, 2, 28).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a new date from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the date does not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> CoreResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| CoreError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Parses an ISO 8601 date (`YYYY-MM-DD`).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the string is not a valid date.
    pub fn parse(s: &str) -> CoreResult<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|_| CoreError::invalid_date(format!("cannot parse '{s}'")))
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Checks if the date falls in a leap year.
    pub fn is_leap_year(&self) -> bool {
        self.0.leap_year()
    }

    /// Number of days in the date's year.
    pub fn days_in_year(&self) -> u32 {
        if self.is_leap_year() {
            366
        } else {
            365
        }
    }

    /// Number of days in the date's month.
    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    /// Checks if the date is the last day of its month.
    pub fn is_end_of_month(&self) -> bool {
        self.day() == self.days_in_month()
    }

    /// Adds a (possibly negative) number of days.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Date(self.0 + chrono::Duration::days(days))
    }

    /// Adds a (possibly negative) number of months.
    ///
    /// The day is clamped to the last valid day of the target month.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the result is outside chrono's range.
    pub fn add_months(&self, months: i32) -> CoreResult<Self> {
        let total = self.year() * 12 + self.month() as i32 - 1 + months;
        let year = total.div_euclid(12);
        let month = (total.rem_euclid(12) + 1) as u32;
        let day = self.day().min(days_in_month(year, month));

        Self::from_ymd(year, month, day)
    }

    /// Calendar days from `self` to `other` (negative if `other` is earlier).
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Returns the underlying `NaiveDate`.
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Date {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        date.0
    }
}

impl Sub<Date> for Date {
    type Output = i64;

    /// Calendar days between two dates.
    fn sub(self, other: Date) -> Self::Output {
        other.days_between(&self)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_invalid_date() {
        assert!(Date::from_ymd(2025, 2, 29).is_err());
        assert!(Date::from_ymd(2025, 13, 1).is_err());
        assert!(Date::from_ymd(2024, 2, 29).is_ok());
    }

    #[test]
    fn test_parse_and_display() {
        let date: Date = "2031-03-15".parse().unwrap();
        assert_eq!(date, d(2031, 3, 15));
        assert_eq!(date.to_string(), "2031-03-15");
        assert!(Date::parse("15/03/2031").is_err());
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        assert_eq!(d(2025, 8, 31).add_months(-6).unwrap(), d(2025, 2, 28));
        assert_eq!(d(2024, 8, 31).add_months(-6).unwrap(), d(2024, 2, 29));
        assert_eq!(d(2025, 10, 31).add_months(-1).unwrap(), d(2025, 9, 30));
        assert_eq!(d(2025, 1, 31).add_months(1).unwrap(), d(2025, 2, 28));
    }

    #[test]
    fn test_add_months_across_years() {
        assert_eq!(d(2025, 2, 15).add_months(-3).unwrap(), d(2024, 11, 15));
        assert_eq!(d(2025, 11, 15).add_months(14).unwrap(), d(2027, 1, 15));
        assert_eq!(d(2025, 1, 1).add_months(-12).unwrap(), d(2024, 1, 1));
    }

    #[test]
    fn test_days_between_and_sub() {
        let a = d(2025, 1, 1);
        let b = d(2025, 7, 1);
        assert_eq!(a.days_between(&b), 181);
        assert_eq!(b - a, 181);
        assert_eq!(a - b, -181);
    }

    #[test]
    fn test_end_of_month() {
        assert!(d(2024, 2, 29).is_end_of_month());
        assert!(!d(2025, 2, 27).is_end_of_month());
        assert_eq!(d(2024, 6, 1).days_in_year(), 366);
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&d(2030, 6, 30)).unwrap();
        assert_eq!(json, "\"2030-06-30\"");
        let back: Date = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d(2030, 6, 30));
    }
}
