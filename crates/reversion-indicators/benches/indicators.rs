//! Benchmarks for indicator implementations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use reversion_core::traits::{Indicator, MultiOutputIndicator};
use reversion_indicators::{BollingerBands, IndicatorSnapshot, Rsi, Sma};

fn generate_test_data(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 100.0 + (i as f64 * 0.1).sin() * 10.0)
        .collect()
}

fn benchmark_sma(c: &mut Criterion) {
    let mut group = c.benchmark_group("SMA");

    for size in [252, 1000, 10000].iter() {
        let data = generate_test_data(*size);
        group.bench_with_input(BenchmarkId::new("standard", size), &data, |b, data| {
            let sma = Sma::new(50);
            b.iter(|| sma.calculate(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_rsi(c: &mut Criterion) {
    let mut group = c.benchmark_group("RSI");

    for size in [252, 1000, 10000].iter() {
        let data = generate_test_data(*size);
        group.bench_with_input(BenchmarkId::new("standard", size), &data, |b, data| {
            let rsi = Rsi::new(14);
            b.iter(|| rsi.calculate(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_bollinger(c: &mut Criterion) {
    let mut group = c.benchmark_group("Bollinger");

    for size in [252, 1000, 10000].iter() {
        let data = generate_test_data(*size);
        group.bench_with_input(BenchmarkId::new("standard", size), &data, |b, data| {
            let bb = BollingerBands::with_params(30, 2.0);
            b.iter(|| bb.calculate(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_snapshot(c: &mut Criterion) {
    // One year of daily bars, the size a screening run works with
    let data = generate_test_data(252);

    c.bench_function("snapshot_1y", |b| {
        b.iter(|| IndicatorSnapshot::compute(black_box(&data), &[14, 30, 50, 200], 2.0))
    });
}

criterion_group!(
    benches,
    benchmark_sma,
    benchmark_rsi,
    benchmark_bollinger,
    benchmark_snapshot
);
criterion_main!(benches);
