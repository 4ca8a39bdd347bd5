//! Bond terms: the immutable description of a bond's cash-flow structure.

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use spreadwatch_core::{Date, DayCountConvention, Frequency};

use crate::error::{BondError, BondResult};

/// Default face value in currency units.
pub const DEFAULT_FACE_VALUE: Decimal = Decimal::ONE_THOUSAND;

/// Immutable terms of a fixed-coupon bond.
///
/// Only constructible through [`BondTermsBuilder`] or one of the named
/// conversions built on it, so every instance has passed validation:
/// positive face value, non-negative coupon, a supported frequency and an
/// issue date (when known) before maturity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BondTerms {
    isin: String,
    name: Option<String>,
    issue_date: Option<Date>,
    maturity_date: Date,
    coupon_rate: Decimal,
    face_value: Decimal,
    frequency: Frequency,
    day_count: DayCountConvention,
}

impl BondTerms {
    /// Starts a builder for the given ISIN.
    pub fn builder(isin: impl Into<String>) -> BondTermsBuilder {
        BondTermsBuilder::new(isin)
    }

    /// ISIN identifier.
    pub fn isin(&self) -> &str {
        &self.isin
    }

    /// Display name, falling back to the ISIN.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.isin)
    }

    /// Issue date, if known.
    pub fn issue_date(&self) -> Option<Date> {
        self.issue_date
    }

    /// Maturity date.
    pub fn maturity_date(&self) -> Date {
        self.maturity_date
    }

    /// Annual coupon rate in percent (8.15 means 8.15% per year).
    pub fn coupon_rate(&self) -> Decimal {
        self.coupon_rate
    }

    /// Face value redeemed at maturity, in currency units.
    pub fn face_value(&self) -> Decimal {
        self.face_value
    }

    /// Coupon frequency.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Day count convention.
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Coupon paid each period, in currency units.
    pub fn coupon_amount(&self) -> Decimal {
        self.face_value * self.coupon_rate
            / Decimal::ONE_HUNDRED
            / Decimal::from(self.frequency.periods_per_year())
    }

    /// Checks that a settlement date can be valued against these terms.
    ///
    /// # Errors
    ///
    /// - `MaturedInstrument` if `settlement >= maturity`
    /// - `InvalidBondTerms` if `settlement` precedes the issue date
    pub fn check_settlement(&self, settlement: Date) -> BondResult<()> {
        if settlement >= self.maturity_date {
            return Err(BondError::matured(settlement, self.maturity_date));
        }
        if let Some(issue) = self.issue_date {
            if settlement < issue {
                return Err(BondError::invalid_terms(format!(
                    "settlement {settlement} precedes issue date {issue}"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for BondTerms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}% {} ({}, {})",
            self.display_name(),
            self.coupon_rate,
            self.maturity_date,
            self.frequency,
            self.day_count
        )
    }
}

/// Builder for [`BondTerms`].
///
/// Defaults: face value 1000, two coupons per year, ACT/ACT ICMA.
/// Maturity and coupon rate are required.
///
/// ```rust
/// use spreadwatch_bonds::BondTermsBuilder;
/// use spreadwatch_core::Date;
/// use rust_decimal_macros::dec;
///
/// let terms = BondTermsBuilder::new("SU26238RMFS4")
///     .name("OFZ 26238")
///     .maturity(Date::from_ymd(2041, 5, 15).unwrap())
///     .coupon_rate(dec!(7.1))
///     .build()
///     .unwrap();
/// assert_eq!(terms.face_value(), dec!(1000));
/// ```
#[derive(Debug, Clone)]
pub struct BondTermsBuilder {
    isin: String,
    name: Option<String>,
    issue_date: Option<Date>,
    maturity_date: Option<Date>,
    coupon_rate: Option<Decimal>,
    face_value: Decimal,
    periods_per_year: i64,
    day_count: DayCountConvention,
}

impl BondTermsBuilder {
    /// Creates a builder for the given ISIN.
    pub fn new(isin: impl Into<String>) -> Self {
        Self {
            isin: isin.into(),
            name: None,
            issue_date: None,
            maturity_date: None,
            coupon_rate: None,
            face_value: DEFAULT_FACE_VALUE,
            periods_per_year: 2,
            day_count: DayCountConvention::default(),
        }
    }

    /// Sets the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the issue date.
    pub fn issue_date(mut self, date: Date) -> Self {
        self.issue_date = Some(date);
        self
    }

    /// Sets the maturity date.
    pub fn maturity(mut self, date: Date) -> Self {
        self.maturity_date = Some(date);
        self
    }

    /// Sets the annual coupon rate in percent.
    pub fn coupon_rate(mut self, rate_percent: Decimal) -> Self {
        self.coupon_rate = Some(rate_percent);
        self
    }

    /// Sets the face value.
    pub fn face_value(mut self, face_value: Decimal) -> Self {
        self.face_value = face_value;
        self
    }

    /// Sets the coupon frequency.
    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.periods_per_year = i64::from(frequency.periods_per_year());
        self
    }

    /// Sets the coupon frequency from a raw payments-per-year count;
    /// validated in [`build`](Self::build).
    pub fn coupon_frequency(mut self, periods_per_year: i64) -> Self {
        self.periods_per_year = periods_per_year;
        self
    }

    /// Sets the day count convention.
    pub fn day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Validates and builds the terms.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBondTerms` naming the first violated rule.
    pub fn build(self) -> BondResult<BondTerms> {
        let isin = self.isin.trim().to_string();
        if isin.is_empty() {
            return Err(BondError::invalid_terms("ISIN must not be empty"));
        }

        let maturity_date = self
            .maturity_date
            .ok_or_else(|| BondError::invalid_terms(format!("{isin}: missing maturity date")))?;

        let coupon_rate = self
            .coupon_rate
            .ok_or_else(|| BondError::invalid_terms(format!("{isin}: missing coupon rate")))?;
        if coupon_rate < Decimal::ZERO {
            return Err(BondError::invalid_terms(format!(
                "{isin}: coupon rate {coupon_rate} is negative"
            )));
        }

        if self.face_value <= Decimal::ZERO {
            return Err(BondError::invalid_terms(format!(
                "{isin}: face value {} must be positive",
                self.face_value
            )));
        }

        let frequency = Frequency::from_periods_per_year(self.periods_per_year)
            .map_err(|e| BondError::invalid_terms(format!("{isin}: {e}")))?;

        if let Some(issue) = self.issue_date {
            if issue >= maturity_date {
                return Err(BondError::invalid_terms(format!(
                    "{isin}: issue date {issue} is not before maturity {maturity_date}"
                )));
            }
        }

        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(BondTerms {
            isin,
            name,
            issue_date: self.issue_date,
            maturity_date,
            coupon_rate,
            face_value: self.face_value,
            frequency,
            day_count: self.day_count,
        })
    }
}
