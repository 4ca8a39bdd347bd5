//! Day count conventions.
//!
//! A convention fixes two things used throughout bond valuation:
//!
//! - how many days lie between two dates ([`DayCount::day_count`])
//! - how a span converts into a year fraction ([`DayCount::year_fraction`])
//!
//! # Supported Conventions
//!
//! - [`ActActIcma`]: Actual/Actual ICMA, period based (default for government bonds)
//! - [`ActActIsda`]: Actual/Actual ISDA, split by calendar year
//! - [`Act365Fixed`]: Actual/365 Fixed
//! - [`Act360`]: Actual/360
//! - [`Thirty360US`]: 30/360 US (Bond Basis) with February month-end rules
//! - [`Thirty360E`]: 30E/360 (Eurobond Basis)
//!
//! # Accrual inside a coupon period
//!
//! [`DayCountConvention::accrual_fraction`] expresses the elapsed part of a
//! coupon period as a fraction of one full period. ACT/ACT ICMA divides
//! actual days elapsed by actual days in the period; every other convention
//! multiplies its year fraction by the coupon frequency.
//!
//! ```rust
//! use spreadwatch_core::daycounts::{DayCount, Thirty360US};
//! use spreadwatch_core::types::Date;
//!
//! let dc = Thirty360US;
//! let start = Date::from_ymd(2025, 1, 15).unwrap();
//! let end = Date::from_ymd(2025, 7, 15).unwrap();
//! assert_eq!(dc.day_count(start, end), 180);
//! ```

mod actact;
mod actual;
mod thirty360;

pub use actact::{ActActIcma, ActActIsda};
pub use actual::{Act360, Act365Fixed};
pub use thirty360::{Thirty360E, Thirty360US};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::{Date, Frequency};

/// Counting rule for the days between two dates.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait DayCount: Send + Sync {
    /// Market name of the convention (e.g. "ACT/360", "30/360 US").
    fn name(&self) -> &'static str;

    /// Fraction of a year between two dates. Negative if `end < start`.
    fn year_fraction(&self, start: Date, end: Date) -> Decimal;

    /// Number of days between two dates under this convention.
    fn day_count(&self, start: Date, end: Date) -> i64;

    /// Share of the reference period `[period_start, period_end]` covered by
    /// `[start, end]`, both measured with [`DayCount::day_count`].
    ///
    /// Returns zero for an empty reference period.
    fn period_fraction(&self, start: Date, end: Date, period_start: Date, period_end: Date) -> Decimal {
        let period_days = self.day_count(period_start, period_end);
        if period_days == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.day_count(start, end)) / Decimal::from(period_days)
    }
}

/// Runtime selection of a day count convention.
///
/// Serialized by its market name; any alias accepted by [`FromStr`] is
/// accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DayCountConvention {
    /// Actual/Actual ICMA - period based, government bonds
    #[default]
    ActActIcma,
    /// Actual/Actual ISDA - calendar-year split
    ActActIsda,
    /// Actual/365 Fixed
    Act365Fixed,
    /// Actual/360
    Act360,
    /// 30/360 US (Bond Basis)
    Thirty360US,
    /// 30E/360 (Eurobond Basis)
    Thirty360E,
}

impl DayCountConvention {
    /// Creates a boxed implementation of the convention.
    #[must_use]
    pub fn to_day_count(&self) -> Box<dyn DayCount> {
        match self {
            DayCountConvention::ActActIcma => Box::new(ActActIcma),
            DayCountConvention::ActActIsda => Box::new(ActActIsda),
            DayCountConvention::Act365Fixed => Box::new(Act365Fixed),
            DayCountConvention::Act360 => Box::new(Act360),
            DayCountConvention::Thirty360US => Box::new(Thirty360US),
            DayCountConvention::Thirty360E => Box::new(Thirty360E),
        }
    }

    /// Market name of the convention.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::ActActIcma => "ACT/ACT ICMA",
            DayCountConvention::ActActIsda => "ACT/ACT ISDA",
            DayCountConvention::Act365Fixed => "ACT/365F",
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Thirty360US => "30/360 US",
            DayCountConvention::Thirty360E => "30E/360",
        }
    }

    /// Returns all supported conventions.
    #[must_use]
    pub fn all() -> &'static [DayCountConvention] {
        &[
            DayCountConvention::ActActIcma,
            DayCountConvention::ActActIsda,
            DayCountConvention::Act365Fixed,
            DayCountConvention::Act360,
            DayCountConvention::Thirty360US,
            DayCountConvention::Thirty360E,
        ]
    }

    /// Days between two dates under this convention.
    #[must_use]
    pub fn day_count(&self, start: Date, end: Date) -> i64 {
        self.to_day_count().day_count(start, end)
    }

    /// Year fraction between two dates under this convention.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        self.to_day_count().year_fraction(start, end)
    }

    /// Elapsed share of the coupon period `[last_coupon, next_coupon)` at
    /// `settlement`, in units of one coupon period.
    ///
    /// Zero on the coupon date itself. ACT/ACT ICMA uses actual days over
    /// actual days in the period; other conventions use
    /// `year_fraction(last_coupon, settlement) * frequency`.
    #[must_use]
    pub fn accrual_fraction(
        &self,
        last_coupon: Date,
        settlement: Date,
        next_coupon: Date,
        frequency: Frequency,
    ) -> Decimal {
        self.accrual_fraction_from(last_coupon, settlement, last_coupon, next_coupon, frequency)
    }

    /// Share of the coupon period `[last_coupon, next_coupon)` accrued from
    /// `accrual_start` to `settlement`.
    ///
    /// Used for a short first period, where interest accrues from the issue
    /// date but ACT/ACT ICMA still divides by the full notional period.
    #[must_use]
    pub fn accrual_fraction_from(
        &self,
        accrual_start: Date,
        settlement: Date,
        last_coupon: Date,
        next_coupon: Date,
        frequency: Frequency,
    ) -> Decimal {
        let dc = self.to_day_count();
        match self {
            DayCountConvention::ActActIcma => {
                dc.period_fraction(accrual_start, settlement, last_coupon, next_coupon)
            }
            _ => {
                dc.year_fraction(accrual_start, settlement)
                    * Decimal::from(frequency.periods_per_year())
            }
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DayCountConvention {
    type Err = CoreError;

    /// Parses a convention name.
    ///
    /// Accepts market names ("ACT/ACT ICMA", "30/360 US"), enum-style names
    /// ("ActActIcma") and the common short aliases. Bare "ACT/ACT" maps to
    /// ICMA, the bond-market reading.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "ACT/ACT" | "ACT/ACT ICMA" | "ACTUAL/ACTUAL" | "ACTUAL/ACTUAL ICMA" | "ACTACTICMA"
            | "ACTACT" | "ISMA" | "ICMA" => Ok(DayCountConvention::ActActIcma),

            "ACT/ACT ISDA" | "ACTUAL/ACTUAL ISDA" | "ACTACTISDA" | "ISDA" => {
                Ok(DayCountConvention::ActActIsda)
            }

            "ACT/365" | "ACT/365F" | "ACT/365 FIXED" | "ACTUAL/365" | "ACTUAL/365 FIXED"
            | "ACT365FIXED" | "ACT365" => Ok(DayCountConvention::Act365Fixed),

            "ACT/360" | "ACTUAL/360" | "ACT360" => Ok(DayCountConvention::Act360),

            "30/360" | "30/360 US" | "30U/360" | "BOND" | "THIRTY360US" | "30/360US" => {
                Ok(DayCountConvention::Thirty360US)
            }

            "30E/360" | "30/360 ICMA" | "EUROBOND" | "THIRTY360E" | "30E360" => {
                Ok(DayCountConvention::Thirty360E)
            }

            _ => Err(CoreError::unknown_day_count(s)),
        }
    }
}

impl TryFrom<String> for DayCountConvention {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayCountConvention> for String {
    fn from(dc: DayCountConvention) -> Self {
        dc.name().to_string()
    }
}
