//! Price file loading.
//!
//! The file is CSV with a header row `timestamp,isin,price`. Timestamps are
//! `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`; prices are clean, in percent of
//! face value.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use spreadwatch_analytics::observations::PriceObservation;

use crate::error::{CliError, CliResult};

#[derive(Debug, Deserialize)]
struct PriceRow {
    timestamp: String,
    isin: String,
    price: f64,
}

/// Clean prices per ISIN, ascending by timestamp.
#[derive(Debug, Default)]
pub struct PriceBook {
    series: BTreeMap<String, Vec<PriceObservation>>,
}

impl PriceBook {
    /// Reads a price file.
    pub fn load(path: &Path) -> CliResult<Self> {
        let file_error = |reason: String| CliError::PriceFile {
            path: path.to_path_buf(),
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| file_error(e.to_string()))?;

        let mut book = Self::default();
        for record in reader.deserialize::<PriceRow>() {
            let row = record.map_err(|e| file_error(e.to_string()))?;
            let timestamp = parse_timestamp(&row.timestamp).ok_or_else(|| CliError::InvalidTimestamp {
                line: book.len() as u64 + 2,
                value: row.timestamp.clone(),
            })?;
            book.series
                .entry(row.isin)
                .or_default()
                .push(PriceObservation::new(timestamp, row.price));
        }

        for series in book.series.values_mut() {
            series.sort_by_key(|p| p.timestamp);
        }
        if book.is_empty() {
            tracing::warn!("{} holds no prices", path.display());
        }
        tracing::info!("loaded {} prices for {} bonds from {}", book.len(), book.series.len(), path.display());
        Ok(book)
    }

    /// Prices for one ISIN.
    pub fn series(&self, isin: &str) -> CliResult<&[PriceObservation]> {
        self.series
            .get(isin)
            .map(Vec::as_slice)
            .ok_or_else(|| CliError::NoPrices(isin.to_string()))
    }

    /// Total number of prices.
    pub fn len(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    /// True when the file held no prices.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Parses `YYYY-MM-DD` (midnight) or `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}
