#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmark for the statistics behind the dashboard pages.

use claim_explorer::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const CAR_TYPES: [&str; 6] = ["Minivan", "SUV", "Pickup", "Sports Car", "Van", "Panel Truck"];

/// Deterministic claims-like table of `size` rows.
fn claims(size: usize) -> Table {
    let age: Vec<f64> = (0..size).map(|i| 18.0 + (i * 7 % 63) as f64).collect();
    let income: Vec<f64> = (0..size).map(|i| 20_000.0 + (i * 131 % 900) as f64 * 100.0).collect();
    let clm_amt: Vec<f64> = (0..size).map(|i| if i % 4 == 0 { (i % 97) as f64 * 60.0 } else { 0.0 }).collect();
    Table::from_columns(vec![
        Column::numeric("age", age),
        Column::numeric("income", income),
        Column::numeric("clm_amt", clm_amt),
        Column::categorical("car_type", (0..size).map(|i| CAR_TYPES[i % CAR_TYPES.len()])),
    ])
    .unwrap()
}

fn stats_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("stats");

    for size in [1_000, 10_000, 100_000] {
        let table = claims(size);

        group.bench_with_input(BenchmarkId::new("describe", size), &table, |b, t| {
            b.iter(|| describe(black_box(t), "clm_amt").unwrap());
        });
        group.bench_with_input(BenchmarkId::new("value_counts", size), &table, |b, t| {
            b.iter(|| value_counts(black_box(t), "car_type").unwrap());
        });
        group.bench_with_input(BenchmarkId::new("group_by", size), &table, |b, t| {
            b.iter(|| group_by(black_box(t), "car_type", &[Agg::mean("clm_amt")], GroupOrder::KeyAscending).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("corr", size), &table, |b, t| {
            b.iter(|| corr(black_box(t), "age", "clm_amt").unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, stats_benchmark);
criterion_main!(benches);
