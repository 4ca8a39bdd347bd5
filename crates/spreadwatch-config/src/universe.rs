//! Bond universe and spread pairs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use spreadwatch_analytics::spreads::SpreadPair;
use spreadwatch_bonds::{BondResult, BondTerms, BondTermsBuilder};
use spreadwatch_core::{Date, DayCountConvention};

use crate::error::{Validate, ValidationError};

/// One bond of the universe.
///
/// Dates are quoted strings (`maturity_date = "2041-05-15"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondEntry {
    /// ISIN.
    pub isin: String,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Maturity date.
    pub maturity_date: Date,

    /// Issue date, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<Date>,

    /// Annual coupon rate in percent.
    pub coupon_rate: Decimal,

    /// Face value.
    #[serde(default = "default_face_value")]
    pub face_value: Decimal,

    /// Coupon payments per year.
    #[serde(default = "default_coupon_frequency")]
    pub coupon_frequency: i64,

    /// Day count convention name.
    #[serde(default, alias = "day_count_convention")]
    pub day_count: DayCountConvention,
}

fn default_face_value() -> Decimal {
    Decimal::ONE_THOUSAND
}

fn default_coupon_frequency() -> i64 {
    2
}

impl BondEntry {
    /// Converts the entry into validated terms.
    pub fn to_terms(&self) -> BondResult<BondTerms> {
        let mut builder = BondTermsBuilder::new(&self.isin)
            .maturity(self.maturity_date)
            .coupon_rate(self.coupon_rate)
            .face_value(self.face_value)
            .coupon_frequency(self.coupon_frequency)
            .day_count(self.day_count);

        if let Some(ref name) = self.name {
            builder = builder.name(name);
        }
        if let Some(issue) = self.issue_date {
            builder = builder.issue_date(issue);
        }

        builder.build()
    }
}

impl From<&BondTerms> for BondEntry {
    fn from(terms: &BondTerms) -> Self {
        Self {
            isin: terms.isin().to_string(),
            name: Some(terms.display_name().to_string()),
            maturity_date: terms.maturity_date(),
            issue_date: terms.issue_date(),
            coupon_rate: terms.coupon_rate(),
            face_value: terms.face_value(),
            coupon_frequency: i64::from(terms.frequency().periods_per_year()),
            day_count: terms.day_count(),
        }
    }
}

impl Validate for BondEntry {
    fn validate(&self) -> Vec<ValidationError> {
        match self.to_terms() {
            Ok(_) => Vec::new(),
            Err(err) => vec![ValidationError::with_rule("terms", err.to_string(), "valid_terms")],
        }
    }
}

/// Two bonds whose yield difference is tracked.
///
/// The spread is `ytm(isin_a) − ytm(isin_b)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairEntry {
    /// Pair name used on the command line.
    pub name: String,
    /// First bond (minuend).
    pub isin_a: String,
    /// Second bond (subtrahend).
    pub isin_b: String,
}

impl PairEntry {
    /// Creates a pair.
    pub fn new(name: impl Into<String>, isin_a: impl Into<String>, isin_b: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            isin_a: isin_a.into(),
            isin_b: isin_b.into(),
        }
    }

    /// The pair as the analytics crate identifies it.
    pub fn to_pair(&self) -> SpreadPair {
        SpreadPair::new(&self.name, &self.isin_a, &self.isin_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry() -> BondEntry {
        BondEntry {
            isin: "SU26238RMFS4".into(),
            name: Some("OFZ 26238".into()),
            maturity_date: Date::from_ymd(2041, 5, 15).unwrap(),
            issue_date: None,
            coupon_rate: dec!(7.1),
            face_value: default_face_value(),
            coupon_frequency: 2,
            day_count: DayCountConvention::default(),
        }
    }

    #[test]
    fn test_to_terms() {
        let terms = entry().to_terms().unwrap();
        assert_eq!(terms.isin(), "SU26238RMFS4");
        assert_eq!(terms.display_name(), "OFZ 26238");
        assert_eq!(terms.coupon_amount(), dec!(35.5));
    }

    #[test]
    fn test_bad_frequency_is_invalid() {
        let bad = BondEntry {
            coupon_frequency: 5,
            ..entry()
        };
        assert!(bad.to_terms().is_err());
        assert_eq!(bad.validate()[0].rule.as_deref(), Some("valid_terms"));
    }

    #[test]
    fn test_round_trip_through_terms() {
        let terms = entry().to_terms().unwrap();
        assert_eq!(BondEntry::from(&terms), entry());
    }
}
