//! Named conversions from external record shapes into [`BondTerms`].
//!
//! Each source shape gets its own conversion function; nothing inspects a
//! value at runtime to guess what it is.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use spreadwatch_core::{Date, DayCountConvention};

use crate::error::{BondError, BondResult};
use crate::terms::{BondTerms, BondTermsBuilder};

/// Flat bond metadata row as a storage layer or exchange reference feed
/// would hand it over: dates as ISO strings, every field optional except
/// the ISIN, empty strings meaning "unknown".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BondRecord {
    /// ISIN identifier.
    pub isin: String,
    /// Full name.
    #[serde(default)]
    pub name: Option<String>,
    /// Short trading name, used when `name` is blank.
    #[serde(default)]
    pub short_name: Option<String>,
    /// Annual coupon rate in percent.
    #[serde(default)]
    pub coupon_rate: Option<f64>,
    /// Maturity date, `YYYY-MM-DD`.
    #[serde(default)]
    pub maturity_date: Option<String>,
    /// Issue date, `YYYY-MM-DD`.
    #[serde(default)]
    pub issue_date: Option<String>,
    /// Face value in currency units.
    #[serde(default)]
    pub face_value: Option<f64>,
    /// Coupon payments per year.
    #[serde(default)]
    pub coupon_frequency: Option<i64>,
    /// Day count convention name.
    #[serde(default, alias = "day_count")]
    pub day_count_convention: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn decimal_field(isin: &str, field: &str, value: f64) -> BondResult<Decimal> {
    if !value.is_finite() {
        return Err(BondError::invalid_terms(format!("{isin}: {field} is not finite")));
    }
    Decimal::from_f64(value)
        .ok_or_else(|| BondError::invalid_terms(format!("{isin}: {field} {value} out of range")))
}

impl TryFrom<&BondRecord> for BondTerms {
    type Error = BondError;

    fn try_from(record: &BondRecord) -> BondResult<Self> {
        let isin = record.isin.trim();
        let mut builder = BondTermsBuilder::new(isin);

        if let Some(name) =
            non_blank(record.name.as_ref()).or_else(|| non_blank(record.short_name.as_ref()))
        {
            builder = builder.name(name);
        }
        if let Some(maturity) = non_blank(record.maturity_date.as_ref()) {
            builder = builder.maturity(Date::parse(maturity)?);
        }
        if let Some(issue) = non_blank(record.issue_date.as_ref()) {
            builder = builder.issue_date(Date::parse(issue)?);
        }
        if let Some(rate) = record.coupon_rate {
            builder = builder.coupon_rate(decimal_field(isin, "coupon rate", rate)?);
        }
        if let Some(face) = record.face_value {
            builder = builder.face_value(decimal_field(isin, "face value", face)?);
        }
        if let Some(freq) = record.coupon_frequency {
            builder = builder.coupon_frequency(freq);
        }
        if let Some(dc) = non_blank(record.day_count_convention.as_ref()) {
            builder = builder.day_count(dc.parse::<DayCountConvention>()?);
        }

        builder.build()
    }
}

impl TryFrom<BondRecord> for BondTerms {
    type Error = BondError;

    fn try_from(record: BondRecord) -> BondResult<Self> {
        BondTerms::try_from(&record)
    }
}

impl From<&BondTerms> for BondRecord {
    fn from(terms: &BondTerms) -> Self {
        use rust_decimal::prelude::ToPrimitive;

        BondRecord {
            isin: terms.isin().to_string(),
            name: Some(terms.display_name().to_string()),
            short_name: None,
            coupon_rate: terms.coupon_rate().to_f64(),
            maturity_date: Some(terms.maturity_date().to_string()),
            issue_date: terms.issue_date().map(|d| d.to_string()),
            face_value: terms.face_value().to_f64(),
            coupon_frequency: Some(i64::from(terms.frequency().periods_per_year())),
            day_count_convention: Some(terms.day_count().name().to_string()),
        }
    }
}
