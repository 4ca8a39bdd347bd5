//! End-to-end behaviour: prices to yields to spreads to signals.

use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use rust_decimal_macros::dec;

use spreadwatch_analytics::prelude::*;
use spreadwatch_bonds::prelude::*;
use spreadwatch_core::Date;

fn ts(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

fn yields(isin: &str, values: &[f64]) -> Vec<YieldObservation> {
    values
        .iter()
        .enumerate()
        .map(|(i, &y)| YieldObservation::solved(ts(i as u32 + 1), isin, y))
        .collect()
}

fn ofz(isin: &str, maturity: Date, coupon: rust_decimal::Decimal) -> BondTerms {
    BondTermsBuilder::new(isin)
        .maturity(maturity)
        .coupon_rate(coupon)
        .build()
        .unwrap()
}

// =============================================================================
// SPREADS
// =============================================================================

#[test]
fn spread_of_three_aligned_points() {
    let a = yields("A", &[5.0, 5.2, 5.1]);
    let b = yields("B", &[4.8, 4.9, 5.0]);

    let spreads = compute_spread(&a, &b);
    let values: Vec<f64> = spreads.iter().map(|s| s.spread_bp).collect();

    assert_eq!(values.len(), 3);
    for (got, want) in values.iter().zip([20.0, 30.0, 10.0]) {
        assert_relative_eq!(*got, want, epsilon = 1e-9);
    }

    let stats = summarize(&spreads, Window::Full);
    assert_relative_eq!(stats.mean.unwrap(), 20.0, epsilon = 1e-9);
    assert_relative_eq!(stats.std.unwrap(), 10.0, epsilon = 1e-9);
    assert_relative_eq!(stats.z_score.unwrap(), -1.0, epsilon = 1e-9);
    assert_eq!(classify(stats.z_score, 2.0), Signal::Neutral);
}

#[test]
fn empty_inputs_give_empty_outputs() {
    let none: Vec<YieldObservation> = Vec::new();
    let a = yields("A", &[5.0]);

    assert!(compute_spread(&none, &a).is_empty());
    assert!(compute_spread(&a, &none).is_empty());
    assert!(compute_rolling_stats(&[], Window::default()).is_empty());
    assert!(matches!(
        compute_spread_checked(&none, &none, JoinKind::Exact),
        Err(AnalyticsError::InsufficientData { .. })
    ));

    let stats = summarize(&[], Window::Full);
    assert!(!stats.is_defined());
    assert_eq!(classify(stats.z_score, 2.0), Signal::Neutral);
}

#[test]
fn failed_yields_drop_out_of_the_spread() {
    let mut a = yields("A", &[5.0, 5.2, 5.1]);
    a[1] = YieldObservation::failed(ts(2), "A", ValuationStatus::NotConverged);
    let b = yields("B", &[4.8, 4.9, 5.0]);

    let spreads = compute_spread(&a, &b);
    let stamps: Vec<NaiveDateTime> = spreads.iter().map(|s| s.timestamp).collect();
    assert_eq!(stamps, vec![ts(1), ts(3)]);
}

#[test]
fn single_point_window_is_undefined() {
    let spreads = compute_spread(&yields("A", &[5.0]), &yields("B", &[4.0]));
    let stats = compute_rolling_stats(&spreads, Window::default());

    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].mean, None);
    assert_eq!(stats[0].z_score, None);
    assert_eq!(classify_stats(&stats[0], 2.0), Signal::Neutral);
}

// =============================================================================
// SIGNAL BOUNDARIES
// =============================================================================

#[test]
fn z_exactly_at_threshold_is_neutral() {
    assert_eq!(classify(Some(2.0), 2.0), Signal::Neutral);
    assert_eq!(classify(Some(-2.0), 2.0), Signal::Neutral);
    assert_eq!(classify(Some(2.0001), 2.0), Signal::Sell);
    assert_eq!(classify(Some(-2.0001), 2.0), Signal::Buy);
}

#[test]
fn zero_variance_window_is_neutral() {
    let spreads = compute_spread(&yields("A", &[5.0, 5.0, 5.0]), &yields("B", &[4.0, 4.0, 4.0]));
    let stats = summarize(&spreads, Window::Full);

    assert_relative_eq!(stats.std.unwrap(), 0.0, epsilon = 1e-9);
    assert_eq!(stats.z_score, None);
    assert_eq!(classify(stats.z_score, 1.0), Signal::Neutral);
}

// =============================================================================
// FROM PRICES
// =============================================================================

#[test]
fn prices_to_signal() {
    let long = ofz("LONG", Date::from_ymd(2036, 6, 15).unwrap(), dec!(7.5));
    let short = ofz("SHORT", Date::from_ymd(2029, 6, 15).unwrap(), dec!(6.0));

    let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
    let days: Vec<NaiveDate> = (0..40).map(|i| start + chrono::Duration::days(i)).collect();

    let long_prices: Vec<PriceObservation> = days
        .iter()
        .enumerate()
        .map(|(i, &d)| PriceObservation::daily(d, 90.0 + if i % 2 == 0 { 0.1 } else { -0.1 }))
        .collect();
    let mut short_prices: Vec<PriceObservation> =
        days.iter().map(|&d| PriceObservation::daily(d, 97.0)).collect();
    // the short bond rallies on the last day: its yield drops, the spread widens
    short_prices[39] = PriceObservation::daily(days[39], 100.0);

    let universe = vec![(long, long_prices), (short, short_prices)];
    let series = value_universe(&universe);
    assert_eq!(series.len(), 2);
    assert!(series.iter().all(|s| coverage(s).solved == 40));

    let spreads = compute_spread(&series[0], &series[1]);
    assert_eq!(spreads.len(), 40);

    let stats = compute_rolling_stats(&spreads, Window::CalendarDays(30));
    let last = stats.last().unwrap();
    assert!(last.z_score.unwrap() > 2.0);
    assert_eq!(classify_stats(last, 2.0), Signal::Sell);

    let signal = SignalGenerator::default().generate("LONG/SHORT", "LONG", "SHORT", &spreads);
    assert_eq!(signal.strength, PercentileSignal::StrongSell);
    assert_eq!(signal.direction, SignalDirection::ShortLong);
    assert!(signal.expected_return_bp > 0.0);
}

#[test]
fn missing_terms_are_recorded_per_point() {
    let terms = ofz("KNOWN", Date::from_ymd(2031, 2, 1).unwrap(), dec!(7.0));
    let prices: Vec<PriceObservation> = (1..=5)
        .map(|d| PriceObservation::daily(NaiveDate::from_ymd_opt(2025, 3, d).unwrap(), 95.0))
        .collect();
    let cutoff = ts(3);

    let series = compute_yield_series_with(&prices, "KNOWN", |_, at| (at >= cutoff).then_some(&terms));

    let statuses: Vec<ValuationStatus> = series.iter().map(|y| y.status).collect();
    assert_eq!(
        statuses,
        vec![
            ValuationStatus::MissingTerms,
            ValuationStatus::MissingTerms,
            ValuationStatus::Solved,
            ValuationStatus::Solved,
            ValuationStatus::Solved,
        ]
    );
    let cov = coverage(&series);
    assert_eq!((cov.solved, cov.missing_terms), (3, 2));
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn spread_is_antisymmetric(
        pairs in prop::collection::vec((-5.0f64..30.0, -5.0f64..30.0), 1..40)
    ) {
        let a: Vec<f64> = pairs.iter().map(|p| p.0).collect();
        let b: Vec<f64> = pairs.iter().map(|p| p.1).collect();
        let ab = compute_spread(&yields("A", &a), &yields("B", &b));
        let ba = compute_spread(&yields("B", &b), &yields("A", &a));

        prop_assert_eq!(ab.len(), ba.len());
        for (x, y) in ab.iter().zip(&ba) {
            prop_assert_eq!(x.timestamp, y.timestamp);
            prop_assert!((x.spread_bp + y.spread_bp).abs() < 1e-9);
        }
    }

    #[test]
    fn percentiles_stay_within_range(
        values in prop::collection::vec(-500.0f64..500.0, 2..28)
    ) {
        let spreads: Vec<SpreadObservation> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| SpreadObservation::new(ts(i as u32 + 1), v))
            .collect();
        let stats = summarize(&spreads, Window::Full);
        let (min, max) = (stats.min.unwrap(), stats.max.unwrap());

        for p in [stats.p10, stats.p25, stats.p50, stats.p75, stats.p90] {
            let p = p.unwrap();
            prop_assert!(p >= min && p <= max);
        }
        prop_assert!(stats.p25.unwrap() <= stats.p75.unwrap());

        let rank = percentile_rank(values[0], &spreads).unwrap();
        prop_assert!((0.0..=100.0).contains(&rank));
    }
}
