//! Explicit schedule cache.

use std::collections::HashMap;
use std::sync::Arc;

use spreadwatch_core::{Date, Frequency};

use crate::error::BondResult;
use crate::terms::BondTerms;

use super::schedule::CouponSchedule;

/// Inputs that determine a coupon schedule's dates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScheduleKey {
    /// ISIN identifier.
    pub isin: String,
    /// Coupon frequency.
    pub frequency: Frequency,
    /// Maturity date.
    pub maturity: Date,
}

impl ScheduleKey {
    /// Key for the given terms.
    pub fn for_terms(terms: &BondTerms) -> Self {
        Self {
            isin: terms.isin().to_string(),
            frequency: terms.frequency(),
            maturity: terms.maturity_date(),
        }
    }
}

/// Cache of coupon schedules owned by the caller.
///
/// Entries are keyed by `(isin, frequency, maturity)`. A cached schedule is
/// regenerated when it does not reach back far enough for the requested
/// reference date, or when the terms' issue date differs from the one it
/// was built with. Nothing is shared between caches.
#[derive(Debug, Default)]
pub struct ScheduleCache {
    entries: HashMap<ScheduleKey, Arc<CouponSchedule>>,
    hits: u64,
    misses: u64,
}

impl ScheduleCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a schedule for `terms` that covers `reference`, generating
    /// and storing one if needed.
    pub fn get_or_generate(
        &mut self,
        terms: &BondTerms,
        reference: Date,
    ) -> BondResult<Arc<CouponSchedule>> {
        let key = ScheduleKey::for_terms(terms);

        if let Some(schedule) = self.entries.get(&key) {
            if schedule.covers(reference) && schedule.issue_date() == terms.issue_date() {
                self.hits += 1;
                return Ok(Arc::clone(schedule));
            }
        }

        self.misses += 1;
        log::debug!("schedule cache miss for {} at {}", terms.isin(), reference);

        // widen to the earliest reference seen for this key
        let start = match self.entries.get(&key) {
            Some(old) if old.issue_date() == terms.issue_date() => reference.min(old.first_date()),
            _ => reference,
        };
        let schedule = Arc::new(CouponSchedule::generate(terms, start)?);
        self.entries.insert(key, Arc::clone(&schedule));
        Ok(schedule)
    }

    /// Drops every schedule cached for an ISIN.
    pub fn invalidate(&mut self, isin: &str) {
        self.entries.retain(|key, _| key.isin != isin);
    }

    /// Drops all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached schedules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terms::BondTermsBuilder;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn terms() -> BondTerms {
        BondTermsBuilder::new("SU26230RMFS1")
            .maturity(d(2039, 3, 16))
            .coupon_rate(dec!(7.7))
            .build()
            .unwrap()
    }

    #[test]
    fn test_hit_for_later_reference() {
        let mut cache = ScheduleCache::new();
        let t = terms();

        let first = cache.get_or_generate(&t, d(2025, 1, 10)).unwrap();
        let second = cache.get_or_generate(&t, d(2025, 6, 1)).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats(), (1, 1));
    }

    #[test]
    fn test_regenerates_for_earlier_reference() {
        let mut cache = ScheduleCache::new();
        let t = terms();

        cache.get_or_generate(&t, d(2025, 6, 1)).unwrap();
        let older = cache.get_or_generate(&t, d(2020, 2, 3)).unwrap();

        assert!(older.period_for(d(2020, 2, 3)).is_some());
        assert_eq!(cache.stats(), (0, 2));
        assert_eq!(cache.len(), 1);

        // the widened schedule still serves the later date
        cache.get_or_generate(&t, d(2025, 6, 1)).unwrap();
        assert_eq!(cache.stats(), (1, 2));
    }

    #[test]
    fn test_issue_date_change_invalidates() {
        let mut cache = ScheduleCache::new();
        let t = terms();
        cache.get_or_generate(&t, d(2025, 6, 1)).unwrap();

        let reissued = BondTermsBuilder::new("SU26230RMFS1")
            .maturity(d(2039, 3, 16))
            .coupon_rate(dec!(7.7))
            .issue_date(d(2019, 4, 10))
            .build()
            .unwrap();
        let schedule = cache.get_or_generate(&reissued, d(2025, 6, 1)).unwrap();

        assert_eq!(schedule.issue_date(), Some(d(2019, 4, 10)));
        assert_eq!(cache.stats(), (0, 2));
    }

    #[test]
    fn test_invalidate_and_clear() {
        let mut cache = ScheduleCache::new();
        cache.get_or_generate(&terms(), d(2025, 6, 1)).unwrap();
        assert!(!cache.is_empty());

        cache.invalidate("OTHER");
        assert_eq!(cache.len(), 1);
        cache.invalidate("SU26230RMFS1");
        assert!(cache.is_empty());

        cache.get_or_generate(&terms(), d(2025, 6, 1)).unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}
