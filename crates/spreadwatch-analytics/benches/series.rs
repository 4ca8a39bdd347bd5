//! Benchmarks for series valuation and spread statistics.
//!
//! Run with: cargo bench -p spreadwatch-analytics

use std::hint::black_box;

use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal_macros::dec;

use spreadwatch_analytics::prelude::*;
use spreadwatch_bonds::prelude::*;
use spreadwatch_core::Date;

fn bond(isin: &str, year: i32) -> BondTerms {
    BondTermsBuilder::new(isin)
        .maturity(Date::from_ymd(year, 5, 15).unwrap())
        .coupon_rate(dec!(7.1))
        .build()
        .unwrap()
}

fn prices(n: usize, level: f64) -> Vec<PriceObservation> {
    let start = NaiveDate::from_ymd_opt(2022, 1, 10).unwrap();
    (0..n)
        .map(|i| {
            let drift = (i as f64 / 40.0).sin() * 5.0;
            PriceObservation::daily(start + chrono::Duration::days(i as i64), level + drift)
        })
        .collect()
}

fn bench_yield_series(c: &mut Criterion) {
    let terms = bond("SU26238RMFS4", 2041);
    let mut group = c.benchmark_group("yield_series");

    for size in [100usize, 1000] {
        let series = prices(size, 72.0);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &series, |b, series| {
            b.iter(|| compute_yield_series(black_box(series), black_box(&terms)));
        });
    }

    group.finish();
}

fn bench_spread_stats(c: &mut Criterion) {
    let a = compute_yield_series(&prices(1000, 72.0), &bond("SU26238RMFS4", 2041));
    let b = compute_yield_series(&prices(1000, 94.0), &bond("SU26243RMFS4", 2029));
    let spreads = compute_spread(&a, &b);

    let mut group = c.benchmark_group("spread_stats");
    group.throughput(Throughput::Elements(spreads.len() as u64));

    group.bench_function("compute_spread", |bench| {
        bench.iter(|| compute_spread(black_box(&a), black_box(&b)));
    });
    group.bench_function("rolling_30d", |bench| {
        bench.iter(|| compute_rolling_stats(black_box(&spreads), Window::CalendarDays(30)));
    });
    group.bench_function("backtest", |bench| {
        bench.iter(|| run_backtest(black_box(&spreads), &BacktestConfig::default()));
    });

    group.finish();
}

criterion_group!(benches, bench_yield_series, bench_spread_stats);
criterion_main!(benches);
