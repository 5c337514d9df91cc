use bootstrapped::*;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::hint::black_box;

const ROWS: usize = 1_000;
const RESAMPLES: usize = 1_000;

fn observed(columns: usize) -> Vec<Vec<f64>> {
    (0..columns)
        .map(|c| (0..ROWS).map(|i| ((i * (c + 3)) % 100) as f64).collect())
        .collect()
}

/// 1. INDEX MATRIX: StdRng vs Xoshiro256++
fn bench_index_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_matrix");
    group.throughput(Throughput::Elements((ROWS * RESAMPLES) as u64));

    let plan = IndexPlan::new(ROWS, RESAMPLES).seed(7);
    group.bench_function("std_rng", |b| {
        b.iter(|| black_box(create_index_matrix(ROWS, RESAMPLES, 1.0, 7, true)))
    });
    group.bench_function("xoshiro", |b| {
        b.iter(|| black_box(create_index_matrix_with::<Xoshiro256PlusPlus>(black_box(&plan))))
    });
    group.bench_function("without_replacement", |b| {
        b.iter(|| black_box(create_index_matrix(ROWS, RESAMPLES, 0.5, 7, false)))
    });
    group.finish();
}

/// 2. GATHER: materializing resampled tables
fn bench_gather(c: &mut Criterion) {
    let mut group = c.benchmark_group("gather");

    for &columns in &[1, 4, 16] {
        let table = observed(columns).to_table().unwrap();
        let matrix = create_index_matrix(ROWS, 100, 1.0, 7, true).unwrap();
        group.bench_with_input(BenchmarkId::new("columns", columns), &table, |b, table| {
            b.iter(|| {
                for resampled in matrix.re(table) {
                    black_box(resampled.unwrap());
                }
            })
        });
    }
    group.finish();
}

/// 3. FULL SIMULATION: mean and median over two columns
fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation");
    group.sample_size(20);

    let table = observed(2).to_table().unwrap();
    let stats = [NamedStatistic::mean(), NamedStatistic::median()];
    for &n_bootstraps in &[100, RESAMPLES] {
        group.bench_with_input(BenchmarkId::new("resamples", n_bootstraps), &n_bootstraps, |b, &n| {
            b.iter(|| black_box(bootstrap_simulation(&table, &stats, 0.95, n, 10).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_index_matrix, bench_gather, bench_simulation);
criterion_main!(benches);
