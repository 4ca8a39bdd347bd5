//! Properties of the yield solver and accrued interest across many inputs.

use approx::assert_relative_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use spreadwatch_bonds::prelude::*;
use spreadwatch_core::{Date, DayCountConvention};

fn d(y: i32, m: u32, day: u32) -> Date {
    Date::from_ymd(y, m, day).unwrap()
}

fn bond(coupon: Decimal, freq: i64, dc: DayCountConvention) -> BondTerms {
    BondTermsBuilder::new("PROP")
        .maturity(d(2034, 10, 31))
        .coupon_rate(coupon)
        .coupon_frequency(freq)
        .day_count(dc)
        .build()
        .unwrap()
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn five_year_discount_bond() {
    let terms = BondTermsBuilder::new("SCENARIO")
        .maturity(d(2032, 9, 1))
        .coupon_rate(dec!(8))
        .build()
        .unwrap();
    // last coupon 2027-09-01, next 2028-03-01, 91 of 182 days elapsed
    let settlement = d(2027, 12, 1);

    let ai = accrued_interest(&terms, settlement).unwrap();
    assert_eq!(ai.amount, dec!(20.00));

    let result = YieldSolver::new().solve(95.0, &terms, settlement).unwrap();
    assert!(result.yield_percent > 8.0);
    assert_eq!(result.accrued, ai.amount);
}

#[test]
fn par_on_coupon_date_for_every_frequency() {
    for freq in [1, 2, 4, 12] {
        let terms = bond(dec!(6.5), freq, DayCountConvention::ActActIcma);
        let settlement = d(2029, 10, 31);
        assert_eq!(accrued_interest(&terms, settlement).unwrap().amount, Decimal::ZERO);

        let y = YieldSolver::new().solve(100.0, &terms, settlement).unwrap().yield_percent;
        assert_relative_eq!(y, 6.5, epsilon = 1e-4);
    }
}

#[test]
fn yield_decreases_with_price() {
    let terms = bond(dec!(7), 2, DayCountConvention::ActActIcma);
    let settlement = d(2026, 2, 11);
    let solver = YieldSolver::new();

    let yields: Vec<f64> = [80.0, 92.5, 100.0, 104.0, 121.0]
        .iter()
        .map(|&p| solver.solve(p, &terms, settlement).unwrap().yield_percent)
        .collect();

    assert!(yields.windows(2).all(|w| w[0] > w[1]), "{yields:?}");
}

#[test]
fn accrued_restarts_at_each_coupon() {
    let terms = bond(dec!(9), 2, DayCountConvention::ActActIcma);
    let coupon_date = d(2030, 4, 30);

    let before = accrued_interest(&terms, coupon_date.add_days(-1)).unwrap().amount;
    let on = accrued_interest(&terms, coupon_date).unwrap().amount;
    let after = accrued_interest(&terms, coupon_date.add_days(1)).unwrap().amount;

    assert!(before > dec!(44));
    assert_eq!(on, Decimal::ZERO);
    assert!(after > Decimal::ZERO && after < dec!(1));
}

#[test]
fn historical_series_uses_each_settlement_date() {
    let terms = bond(dec!(8), 2, DayCountConvention::ActActIcma);
    let dates = [d(2025, 1, 15), d(2025, 3, 1), d(2025, 6, 20), d(2025, 11, 2)];

    let accrued: Vec<Decimal> = dates
        .iter()
        .map(|&date| accrued_interest(&terms, date).unwrap().amount)
        .collect();

    // same clean price, different settlement, different yields
    let solver = YieldSolver::new();
    let yields: Vec<f64> = dates
        .iter()
        .map(|&date| solver.solve(97.0, &terms, date).unwrap().yield_percent)
        .collect();

    for (i, &date) in dates.iter().enumerate() {
        assert_eq!(
            solver.solve(97.0, &terms, date).unwrap().accrued,
            accrued[i],
            "accrued for {date}"
        );
    }
    assert!(yields.windows(2).all(|w| w[0] != w[1]));
}

#[test]
fn cached_schedule_gives_identical_results() {
    let terms = bond(dec!(5.25), 4, DayCountConvention::Thirty360US);
    let solver = YieldSolver::new();
    let mut cache = ScheduleCache::new();

    for offset in [400, 10, 250, 0, 900] {
        let settlement = d(2025, 6, 1).add_days(offset);
        let schedule = cache.get_or_generate(&terms, settlement).unwrap();
        let cached = solver
            .solve_with_schedule(99.0, &terms, &schedule, settlement)
            .unwrap();
        let fresh = solver.solve(99.0, &terms, settlement).unwrap();

        assert_eq!(cached.accrued, fresh.accrued);
        assert_relative_eq!(cached.yield_percent, fresh.yield_percent, epsilon = 1e-9);
    }
    assert_eq!(cache.len(), 1);
}

#[test]
fn typed_errors_before_solving() {
    let terms = bond(dec!(7), 2, DayCountConvention::ActActIcma);
    let solver = YieldSolver::new();

    assert!(matches!(
        solver.solve(0.0, &terms, d(2026, 1, 1)),
        Err(BondError::InvalidBondTerms { .. })
    ));
    assert!(matches!(
        solver.solve(99.0, &terms, d(2035, 1, 1)),
        Err(BondError::MaturedInstrument { .. })
    ));

    let matured = accrued_interest(&terms, d(2034, 10, 31)).unwrap();
    assert_eq!(matured.status, AccrualStatus::Matured);
    assert!(!matured.is_meaningful());
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

fn day_count() -> impl Strategy<Value = DayCountConvention> {
    prop::sample::select(DayCountConvention::all().to_vec())
}

proptest! {
    #[test]
    fn prop_yield_strictly_decreasing_in_price(
        coupon_bp in 0u32..1500,
        freq in prop::sample::select(vec![1i64, 2, 4, 12]),
        dc in day_count(),
        offset in 0i64..3000,
        p1 in 50.0f64..150.0,
        gap in 0.5f64..20.0,
    ) {
        let terms = bond(Decimal::new(i64::from(coupon_bp), 2), freq, dc);
        let settlement = d(2025, 1, 1).add_days(offset);
        let solver = YieldSolver::new();

        let y1 = solver.solve(p1, &terms, settlement).unwrap().yield_percent;
        let y2 = solver.solve(p1 + gap, &terms, settlement).unwrap().yield_percent;
        prop_assert!(y1 > y2);
    }

    #[test]
    fn prop_price_yield_round_trip(
        coupon_bp in 0u32..1200,
        dc in day_count(),
        offset in 0i64..3000,
        price in 60.0f64..140.0,
    ) {
        let terms = bond(Decimal::new(i64::from(coupon_bp), 2), 2, dc);
        let settlement = d(2025, 1, 1).add_days(offset);

        let y = YieldSolver::new().solve(price, &terms, settlement).unwrap().yield_percent;
        let back = price_from_yield(y, &terms, settlement).unwrap();
        prop_assert!((back - price).abs() < 1e-6);
    }

    #[test]
    fn prop_accrued_within_one_coupon(
        coupon_bp in 0u32..1500,
        dc in day_count(),
        offset in 0i64..3500,
    ) {
        let terms = bond(Decimal::new(i64::from(coupon_bp), 2), 2, dc);
        let ai = accrued_interest(&terms, d(2025, 1, 1).add_days(offset)).unwrap();

        prop_assert!(ai.amount >= Decimal::ZERO);
        // year-basis conventions run slightly past one coupon in long periods
        prop_assert!(ai.amount <= terms.coupon_amount() * dec!(1.02));
    }
}
