//! Observation types flowing through the analytics pipeline.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use spreadwatch_bonds::BondError;
use spreadwatch_core::Date;

/// One market price: clean price in percent of face at a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Observation time. Its calendar date is the settlement date.
    pub timestamp: NaiveDateTime,
    /// Clean price in percent of face (95.5 means 955 per 1000 face).
    pub clean_price_percent: f64,
}

impl PriceObservation {
    /// Creates an observation.
    pub fn new(timestamp: NaiveDateTime, clean_price_percent: f64) -> Self {
        Self {
            timestamp,
            clean_price_percent,
        }
    }

    /// Creates a daily observation stamped at midnight.
    pub fn daily(date: NaiveDate, clean_price_percent: f64) -> Self {
        Self::new(date.and_time(NaiveTime::MIN), clean_price_percent)
    }

    /// Settlement date used to value this observation.
    pub fn settlement(&self) -> Date {
        Date::from(self.timestamp.date())
    }
}

/// Outcome of valuing one price observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationStatus {
    /// A yield was solved.
    Solved,
    /// No bond terms were available for the point.
    MissingTerms,
    /// Settlement on or after maturity.
    Matured,
    /// Price or terms rejected before solving.
    InvalidInput,
    /// Solver exhausted its iteration bound.
    NotConverged,
}

impl ValuationStatus {
    /// Status recorded for a valuation error.
    pub fn from_error(error: &BondError) -> Self {
        match error {
            BondError::MaturedInstrument { .. } => ValuationStatus::Matured,
            BondError::ConvergenceFailure { .. } => ValuationStatus::NotConverged,
            BondError::InvalidBondTerms { .. } | BondError::Core(_) => ValuationStatus::InvalidInput,
        }
    }
}

impl fmt::Display for ValuationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValuationStatus::Solved => "solved",
            ValuationStatus::MissingTerms => "missing terms",
            ValuationStatus::Matured => "matured",
            ValuationStatus::InvalidInput => "invalid input",
            ValuationStatus::NotConverged => "not converged",
        };
        write!(f, "{s}")
    }
}

/// Yield of one bond at one timestamp.
///
/// `ytm_percent` is `None` whenever `status` is not `Solved`; the point is
/// kept so consumers can report coverage gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldObservation {
    /// Observation time.
    pub timestamp: NaiveDateTime,
    /// Bond ISIN.
    pub isin: String,
    /// Yield to maturity in percent.
    pub ytm_percent: Option<f64>,
    /// Valuation outcome.
    pub status: ValuationStatus,
}

impl YieldObservation {
    /// A solved point.
    pub fn solved(timestamp: NaiveDateTime, isin: impl Into<String>, ytm_percent: f64) -> Self {
        Self {
            timestamp,
            isin: isin.into(),
            ytm_percent: Some(ytm_percent),
            status: ValuationStatus::Solved,
        }
    }

    /// A failed point.
    pub fn failed(timestamp: NaiveDateTime, isin: impl Into<String>, status: ValuationStatus) -> Self {
        Self {
            timestamp,
            isin: isin.into(),
            ytm_percent: None,
            status,
        }
    }

    /// The yield, if solved and finite.
    pub fn value(&self) -> Option<f64> {
        self.ytm_percent.filter(|y| y.is_finite())
    }
}

/// Yield spread between two bonds at one timestamp, in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadObservation {
    /// Aligned timestamp.
    pub timestamp: NaiveDateTime,
    /// `(ytm_a − ytm_b) × 100`.
    pub spread_bp: f64,
}

impl SpreadObservation {
    /// Creates a spread observation.
    pub fn new(timestamp: NaiveDateTime, spread_bp: f64) -> Self {
        Self {
            timestamp,
            spread_bp,
        }
    }
}

/// Solved / failed counts of a yield series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Coverage {
    /// Points in the series.
    pub total: usize,
    /// Points with a yield.
    pub solved: usize,
    /// Points without bond terms.
    pub missing_terms: usize,
    /// Points on or after maturity.
    pub matured: usize,
    /// Points rejected before solving.
    pub invalid_input: usize,
    /// Points where the solver gave up.
    pub not_converged: usize,
}

impl Coverage {
    /// Points without a yield.
    pub fn failed(&self) -> usize {
        self.total - self.solved
    }

    /// Solved share in [0, 1]; `None` for an empty series.
    pub fn ratio(&self) -> Option<f64> {
        (self.total > 0).then(|| self.solved as f64 / self.total as f64)
    }
}

/// Counts valuation outcomes over a yield series.
pub fn coverage(series: &[YieldObservation]) -> Coverage {
    series.iter().fold(
        Coverage {
            total: series.len(),
            ..Coverage::default()
        },
        |mut acc, obs| {
            match obs.status {
                ValuationStatus::Solved => acc.solved += 1,
                ValuationStatus::MissingTerms => acc.missing_terms += 1,
                ValuationStatus::Matured => acc.matured += 1,
                ValuationStatus::InvalidInput => acc.invalid_input += 1,
                ValuationStatus::NotConverged => acc.not_converged += 1,
            }
            acc
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_settlement_is_calendar_date() {
        let obs = PriceObservation::new(ts(14), 97.2);
        assert_eq!(obs.settlement(), Date::from_ymd(2025, 3, 14).unwrap());
    }

    #[test]
    fn test_status_from_error() {
        let d = Date::from_ymd(2025, 1, 1).unwrap();
        assert_eq!(
            ValuationStatus::from_error(&BondError::matured(d, d)),
            ValuationStatus::Matured
        );
        assert_eq!(
            ValuationStatus::from_error(&BondError::convergence_failure(100, 1.0)),
            ValuationStatus::NotConverged
        );
        assert_eq!(
            ValuationStatus::from_error(&BondError::invalid_terms("x")),
            ValuationStatus::InvalidInput
        );
    }

    #[test]
    fn test_coverage() {
        let series = vec![
            YieldObservation::solved(ts(1), "A", 8.1),
            YieldObservation::failed(ts(2), "A", ValuationStatus::NotConverged),
            YieldObservation::solved(ts(3), "A", 8.3),
            YieldObservation::failed(ts(4), "A", ValuationStatus::MissingTerms),
        ];
        let c = coverage(&series);
        assert_eq!(c.total, 4);
        assert_eq!(c.solved, 2);
        assert_eq!(c.failed(), 2);
        assert_eq!(c.not_converged, 1);
        assert_eq!(c.missing_terms, 1);
        assert_eq!(c.ratio(), Some(0.5));
        assert_eq!(coverage(&[]).ratio(), None);
    }

    #[test]
    fn test_failed_point_serializes_null() {
        let obs = YieldObservation::failed(ts(2), "A", ValuationStatus::Matured);
        let json = serde_json::to_value(&obs).unwrap();
        assert!(json["ytm_percent"].is_null());
        assert_eq!(json["status"], "matured");
    }
}
