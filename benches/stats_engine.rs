//! Stats engine and export rendering overhead.
//!
//! These run between measured iterations only, never inside a timed window,
//! but a full-profile session computes them for every algorithm.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pqc_bench::export::csv::{render_raw, render_summary};
use pqc_bench::protocol::{Benchmark, KemOps};
use pqc_bench::provider::KemScheme;
use pqc_bench::schema::{Category, StatsSummary};
use pqc_bench::catalog::AlgorithmDescriptor;
use pqc_bench::error::ProviderError;
use pqc_bench::harness::BenchConfig;
use rand::{Rng, SeedableRng};

fn samples(n: usize) -> Vec<f64> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    (0..n).map(|_| rng.gen_range(0.05..5.0)).collect()
}

fn bench_from_samples(c: &mut Criterion) {
    let mut group = c.benchmark_group("stats_from_samples");
    for n in [20usize, 100, 1_000, 10_000] {
        let data = samples(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &data, |b, data| {
            b.iter(|| StatsSummary::from_samples(black_box(data)))
        });
    }
    group.finish();
}

/// KEM whose operations cost nothing, so the harness itself is what gets timed.
struct NullKem;

impl KemScheme for NullKem {
    type PublicKey = ();
    type SecretKey = ();
    type Ciphertext = ();
    type SharedSecret = u8;

    fn keygen(&mut self) -> Result<((), ()), ProviderError> {
        Ok(((), ()))
    }

    fn public_key_len(&self, _pk: &()) -> Result<usize, ProviderError> {
        Ok(0)
    }

    fn encapsulate(&mut self, _pk: &()) -> Result<((), u8), ProviderError> {
        Ok(((), 1))
    }

    fn decapsulate(&mut self, _sk: &(), _ct: &()) -> Result<u8, ProviderError> {
        Ok(1)
    }
}

fn bench_protocol_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("protocol_overhead");
    let descriptor = AlgorithmDescriptor::new("NULL", Category::MlKem);
    for n in [20usize, 100] {
        let cfg = BenchConfig::default().with_iterations(n);
        group.bench_with_input(BenchmarkId::new("null_kem", n), &cfg, |b, cfg| {
            let mut ops = KemOps::new(NullKem);
            b.iter(|| ops.run(&descriptor, cfg))
        });
    }
    group.finish();
}

fn bench_csv_render(c: &mut Criterion) {
    let mut ops = KemOps::new(NullKem);
    let descriptor = AlgorithmDescriptor::new("NULL", Category::MlKem);
    let Ok(run) = ops.run(&descriptor, &BenchConfig::default()) else {
        return;
    };

    let mut group = c.benchmark_group("csv_render");
    group.bench_function("summary", |b| b.iter(|| render_summary(black_box(&run.result))));
    group.bench_function("raw_100", |b| b.iter(|| render_raw(black_box(&run.raw))));
    group.finish();
}

criterion_group!(
    benches,
    bench_from_samples,
    bench_protocol_overhead,
    bench_csv_render
);
criterion_main!(benches);
