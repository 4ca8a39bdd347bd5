//! Coupon payment frequency.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Coupon payments per year.
///
/// Only frequencies that divide a year into whole months are representable,
/// so every coupon date lands exactly `12 / n` months from its neighbours.
/// Serialized as the plain number of payments per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Frequency {
    /// 1 payment per year
    Annual,
    /// 2 payments per year
    #[default]
    SemiAnnual,
    /// 3 payments per year
    TriAnnual,
    /// 4 payments per year
    Quarterly,
    /// 6 payments per year
    BiMonthly,
    /// 12 payments per year
    Monthly,
}

impl Frequency {
    /// Builds a frequency from a payments-per-year count.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidFrequency` for zero, negative, or values
    /// that do not divide twelve months evenly.
    pub fn from_periods_per_year(n: i64) -> CoreResult<Self> {
        match n {
            1 => Ok(Frequency::Annual),
            2 => Ok(Frequency::SemiAnnual),
            3 => Ok(Frequency::TriAnnual),
            4 => Ok(Frequency::Quarterly),
            6 => Ok(Frequency::BiMonthly),
            12 => Ok(Frequency::Monthly),
            other => Err(CoreError::invalid_frequency(other)),
        }
    }

    /// Number of coupon periods per year.
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::TriAnnual => 3,
            Frequency::Quarterly => 4,
            Frequency::BiMonthly => 6,
            Frequency::Monthly => 12,
        }
    }

    /// Number of months in one coupon period.
    pub fn months_per_period(&self) -> u32 {
        12 / self.periods_per_year()
    }
}

impl TryFrom<u32> for Frequency {
    type Error = CoreError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_periods_per_year(i64::from(value))
    }
}

impl From<Frequency> for u32 {
    fn from(freq: Frequency) -> Self {
        freq.periods_per_year()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Annual => "Annual",
            Frequency::SemiAnnual => "Semi-Annual",
            Frequency::TriAnnual => "Tri-Annual",
            Frequency::Quarterly => "Quarterly",
            Frequency::BiMonthly => "Bi-Monthly",
            Frequency::Monthly => "Monthly",
        };
        write!(f, "{name}")
    }
}
