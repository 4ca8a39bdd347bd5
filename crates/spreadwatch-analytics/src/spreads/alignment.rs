//! Timestamp alignment of two yield series.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::observations::YieldObservation;

/// How two series are matched before subtraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    /// Identical timestamps.
    #[default]
    Exact,
    /// Same calendar date, taking the last solved observation of the day on
    /// each side. Output timestamps are midnight of the date.
    CalendarDay,
}

/// Both yields at one aligned timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignedPair {
    /// Aligned timestamp.
    pub timestamp: NaiveDateTime,
    /// Yield of the first series, percent.
    pub a: f64,
    /// Yield of the second series, percent.
    pub b: f64,
}

/// One row of an outer join; either side may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OuterRow {
    /// Timestamp present in at least one series.
    pub timestamp: NaiveDateTime,
    /// Yield of the first series, if solved there.
    pub a: Option<f64>,
    /// Yield of the second series, if solved there.
    pub b: Option<f64>,
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Solved values keyed by join key; the latest observation per key wins.
fn keyed(series: &[YieldObservation], join: JoinKind) -> BTreeMap<NaiveDateTime, f64> {
    let mut latest: BTreeMap<NaiveDateTime, (NaiveDateTime, f64)> = BTreeMap::new();

    for obs in series {
        let Some(value) = obs.value() else { continue };
        let key = match join {
            JoinKind::Exact => obs.timestamp,
            JoinKind::CalendarDay => midnight(obs.timestamp.date()),
        };
        match latest.get(&key) {
            Some(&(seen, _)) if seen > obs.timestamp => {}
            _ => {
                latest.insert(key, (obs.timestamp, value));
            }
        }
    }
    latest.into_iter().map(|(key, (_, value))| (key, value)).collect()
}

/// Inner join of the solved points of two series, ascending by timestamp.
pub fn align(a: &[YieldObservation], b: &[YieldObservation], join: JoinKind) -> Vec<AlignedPair> {
    let right = keyed(b, join);
    keyed(a, join)
        .into_iter()
        .filter_map(|(timestamp, a)| right.get(&timestamp).map(|&b| AlignedPair { timestamp, a, b }))
        .collect()
}

/// Outer join of two series, ascending by timestamp.
///
/// Unsolved points appear as `None`; useful for reporting where the pair
/// has gaps.
pub fn outer_join(a: &[YieldObservation], b: &[YieldObservation], join: JoinKind) -> Vec<OuterRow> {
    let key = |obs: &YieldObservation| match join {
        JoinKind::Exact => obs.timestamp,
        JoinKind::CalendarDay => midnight(obs.timestamp.date()),
    };

    let mut rows: BTreeMap<NaiveDateTime, OuterRow> = BTreeMap::new();
    for obs in a {
        let ts = key(obs);
        rows.entry(ts)
            .or_insert(OuterRow { timestamp: ts, a: None, b: None });
    }
    for obs in b {
        let ts = key(obs);
        rows.entry(ts)
            .or_insert(OuterRow { timestamp: ts, a: None, b: None });
    }
    for (ts, value) in keyed(a, join) {
        if let Some(row) = rows.get_mut(&ts) {
            row.a = Some(value);
        }
    }
    for (ts, value) in keyed(b, join) {
        if let Some(row) = rows.get_mut(&ts) {
            row.b = Some(value);
        }
    }
    rows.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observations::ValuationStatus;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn obs(ts: NaiveDateTime, y: f64) -> YieldObservation {
        YieldObservation::solved(ts, "X", y)
    }

    #[test]
    fn test_exact_join_skips_unmatched_and_unsolved() {
        let a = vec![
            obs(at(2, 0), 5.0),
            obs(at(3, 0), 5.1),
            YieldObservation::failed(at(4, 0), "X", ValuationStatus::NotConverged),
        ];
        let b = vec![obs(at(3, 0), 4.9), obs(at(4, 0), 4.8), obs(at(5, 0), 4.7)];

        let pairs = align(&a, &b, JoinKind::Exact);
        assert_eq!(pairs, vec![AlignedPair { timestamp: at(3, 0), a: 5.1, b: 4.9 }]);
    }

    #[test]
    fn test_calendar_day_uses_last_of_day() {
        let a = vec![obs(at(2, 11), 5.0), obs(at(2, 15), 5.2), obs(at(3, 12), 5.3)];
        let b = vec![obs(at(2, 0), 4.0), obs(at(3, 0), 4.1)];

        let pairs = align(&a, &b, JoinKind::CalendarDay);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].timestamp, at(2, 0));
        assert_eq!(pairs[0].a, 5.2);
        assert_eq!(pairs[1].a, 5.3);
    }

    #[test]
    fn test_unsorted_input_still_takes_latest() {
        let a = vec![obs(at(2, 15), 5.2), obs(at(2, 11), 5.0)];
        let b = vec![obs(at(2, 0), 4.0)];
        let pairs = align(&a, &b, JoinKind::CalendarDay);
        assert_eq!(pairs[0].a, 5.2);
    }

    #[test]
    fn test_outer_join_reports_gaps() {
        let a = vec![
            obs(at(1, 0), 5.0),
            YieldObservation::failed(at(2, 0), "X", ValuationStatus::Matured),
        ];
        let b = vec![obs(at(2, 0), 4.0), obs(at(3, 0), 4.1)];

        let rows = outer_join(&a, &b, JoinKind::Exact);
        assert_eq!(rows.len(), 3);
        assert_eq!((rows[0].a, rows[0].b), (Some(5.0), None));
        assert_eq!((rows[1].a, rows[1].b), (None, Some(4.0)));
        assert_eq!((rows[2].a, rows[2].b), (None, Some(4.1)));
    }
}
