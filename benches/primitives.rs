//! Per-primitive criterion baselines, for cross-checking the harness numbers.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pqc_bench::harness::{DEFAULT_MESSAGE_LEN, MESSAGE_BYTE};
use pqc_bench::provider::classic_sig::{EcdsaP256, Ed25519};
use pqc_bench::provider::ml_dsa::{MlDsa44, MlDsa65, MlDsa87};
use pqc_bench::provider::ml_kem::{MlKem1024, MlKem512, MlKem768};
use pqc_bench::provider::slh_dsa::Sha2_128f;
use pqc_bench::provider::{KemScheme, SignatureScheme};

fn kem_group<K: KemScheme>(c: &mut Criterion, name: &str, mut kem: K) {
    let mut group = c.benchmark_group("kem");
    let Ok((pk, sk)) = kem.keygen() else {
        return;
    };
    let Ok((ct, _)) = kem.encapsulate(&pk) else {
        return;
    };

    group.bench_function(BenchmarkId::new("keygen", name), |b| b.iter(|| kem.keygen()));
    group.bench_function(BenchmarkId::new("encap", name), |b| {
        b.iter(|| kem.encapsulate(black_box(&pk)))
    });
    group.bench_function(BenchmarkId::new("decap", name), |b| {
        b.iter(|| kem.decapsulate(black_box(&sk), black_box(&ct)))
    });
    group.finish();
}

fn sig_group<S: SignatureScheme>(c: &mut Criterion, name: &str, mut scheme: S) {
    let message = vec![MESSAGE_BYTE; DEFAULT_MESSAGE_LEN];
    let mut group = c.benchmark_group("signature");
    let Ok((sk, vk)) = scheme.keygen() else {
        return;
    };
    let Ok(sig) = scheme.sign(&sk, &message) else {
        return;
    };

    group.bench_function(BenchmarkId::new("keygen", name), |b| b.iter(|| scheme.keygen()));
    group.bench_function(BenchmarkId::new("sign", name), |b| {
        b.iter(|| scheme.sign(black_box(&sk), black_box(&message)))
    });
    group.bench_function(BenchmarkId::new("verify", name), |b| {
        b.iter(|| scheme.verify(black_box(&vk), black_box(&message), black_box(&sig)))
    });
    group.finish();
}

fn bench_ml_kem(c: &mut Criterion) {
    kem_group(c, "ML-KEM-512", MlKem512);
    kem_group(c, "ML-KEM-768", MlKem768);
    kem_group(c, "ML-KEM-1024", MlKem1024);
}

fn bench_ml_dsa(c: &mut Criterion) {
    sig_group(c, "ML-DSA-44", MlDsa44);
    sig_group(c, "ML-DSA-65", MlDsa65);
    sig_group(c, "ML-DSA-87", MlDsa87);
}

fn bench_classical_sig(c: &mut Criterion) {
    sig_group(c, "ECDSA-P256", EcdsaP256);
    sig_group(c, "Ed25519", Ed25519);
}

#[cfg(feature = "hqc")]
fn bench_hqc(c: &mut Criterion) {
    use pqc_bench::provider::hqc::Hqc128;
    kem_group(c, "HQC-128", Hqc128);
}

#[cfg(not(feature = "hqc"))]
fn bench_hqc(_c: &mut Criterion) {}

fn slow_config() -> Criterion {
    Criterion::default().sample_size(10)
}

fn bench_slh_dsa(c: &mut Criterion) {
    sig_group(c, "SLH-DSA-SHA2-128f", Sha2_128f);
}

criterion_group!(
    benches,
    bench_ml_kem,
    bench_ml_dsa,
    bench_classical_sig,
    bench_hqc
);
criterion_group! {
    name = slow;
    config = slow_config();
    targets = bench_slh_dsa
}
criterion_main!(benches, slow);
