//! The benchmark protocol shared by every algorithm family.
//!
//! A run moves through `Validated -> WarmedUp -> Measuring(1..=N) -> Finalized`,
//! or ends in `Aborted` when setup, warmup or a measured primitive call fails.
//! Families differ only in the [`OperationSet`] they plug in: [`KemOps`] wraps
//! any [`KemScheme`], [`SignatureOps`] any [`SignatureScheme`].

use tracing::{debug, trace, warn};

use crate::catalog::AlgorithmDescriptor;
use crate::error::{BenchError, ProviderError, Result};
use crate::harness::{self, time_op, BenchConfig};
use crate::provider::{KemScheme, SignatureScheme};
use crate::schema::{
    BenchmarkResult, BenchmarkRun, OperationShape, OperationStats, RawTimings, StatsSummary,
};
use crate::stats::round6;

/// One full cycle of an algorithm: keygen, a primary operation on the fresh
/// key, and a secondary operation consuming the primary's output.
pub trait OperationSet {
    type Keys;
    type Output;
    type Recovered;

    const SHAPE: OperationShape;

    fn keygen(&mut self) -> Result<Self::Keys, ProviderError>;

    /// Untimed preparation right before each `primary` call.
    fn prepare_primary(&mut self) -> Result<(), ProviderError> {
        Ok(())
    }

    fn primary(&mut self, keys: &Self::Keys, message: &[u8]) -> Result<Self::Output, ProviderError>;

    fn secondary(
        &mut self,
        keys: &Self::Keys,
        output: &Self::Output,
        message: &[u8],
    ) -> Result<Self::Recovered, ProviderError>;

    /// Correctness outcome of one cycle.
    fn is_correct(&self, output: &Self::Output, recovered: &Self::Recovered) -> bool;

    fn key_size(&self, keys: &Self::Keys) -> Result<usize, ProviderError>;

    fn signature_size(&self, output: &Self::Output) -> Option<usize>;
}

/// Object-safe entry point the orchestrator drives.
pub trait Benchmark {
    fn run(&mut self, descriptor: &AlgorithmDescriptor, cfg: &BenchConfig) -> Result<BenchmarkRun>;
}

impl<O: OperationSet> Benchmark for O {
    fn run(&mut self, descriptor: &AlgorithmDescriptor, cfg: &BenchConfig) -> Result<BenchmarkRun> {
        ProtocolRun::new(descriptor, cfg)?.execute(self)
    }
}

pub struct KemOps<K> {
    scheme: K,
}

impl<K: KemScheme> KemOps<K> {
    pub fn new(scheme: K) -> Self {
        Self { scheme }
    }
}

impl<K: KemScheme> OperationSet for KemOps<K> {
    type Keys = (K::PublicKey, K::SecretKey);
    type Output = (K::Ciphertext, K::SharedSecret);
    type Recovered = K::SharedSecret;

    const SHAPE: OperationShape = OperationShape::Kem;

    fn keygen(&mut self) -> Result<Self::Keys, ProviderError> {
        self.scheme.keygen()
    }

    fn prepare_primary(&mut self) -> Result<(), ProviderError> {
        self.scheme.prepare_encapsulation()
    }

    fn primary(&mut self, (pk, _): &Self::Keys, _message: &[u8]) -> Result<Self::Output, ProviderError> {
        self.scheme.encapsulate(pk)
    }

    fn secondary(
        &mut self,
        (_, sk): &Self::Keys,
        (ct, _): &Self::Output,
        _message: &[u8],
    ) -> Result<Self::Recovered, ProviderError> {
        self.scheme.decapsulate(sk, ct)
    }

    fn is_correct(&self, (_, sent): &Self::Output, recovered: &Self::Recovered) -> bool {
        sent == recovered
    }

    fn key_size(&self, (pk, _): &Self::Keys) -> Result<usize, ProviderError> {
        self.scheme.public_key_len(pk)
    }

    fn signature_size(&self, _output: &Self::Output) -> Option<usize> {
        None
    }
}

pub struct SignatureOps<S> {
    scheme: S,
}

impl<S: SignatureScheme> SignatureOps<S> {
    pub fn new(scheme: S) -> Self {
        Self { scheme }
    }
}

impl<S: SignatureScheme> OperationSet for SignatureOps<S> {
    type Keys = (S::SigningKey, S::VerifyingKey);
    type Output = S::Signature;
    type Recovered = bool;

    const SHAPE: OperationShape = OperationShape::Signature;

    fn keygen(&mut self) -> Result<Self::Keys, ProviderError> {
        self.scheme.keygen()
    }

    fn primary(&mut self, (sk, _): &Self::Keys, message: &[u8]) -> Result<Self::Output, ProviderError> {
        self.scheme.sign(sk, message)
    }

    /// Never fails: a verification error is an invalid signature.
    fn secondary(
        &mut self,
        (_, vk): &Self::Keys,
        signature: &Self::Output,
        message: &[u8],
    ) -> Result<bool, ProviderError> {
        Ok(self
            .scheme
            .verify(vk, message, signature)
            .unwrap_or_else(|err| {
                debug!(%err, "verification raised, counted as invalid");
                false
            }))
    }

    fn is_correct(&self, _signature: &Self::Output, valid: &bool) -> bool {
        *valid
    }

    fn key_size(&self, (_, vk): &Self::Keys) -> Result<usize, ProviderError> {
        self.scheme.public_key_len(vk)
    }

    fn signature_size(&self, signature: &Self::Output) -> Option<usize> {
        Some(self.scheme.signature_len(signature))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Validated,
    WarmedUp,
    Measuring { iteration: usize },
    Finalized,
    Aborted,
}

/// Size observed on every iteration; the reported value is the last one.
#[derive(Debug, Default)]
struct SizeSample {
    last: Option<usize>,
    min: usize,
    max: usize,
}

impl SizeSample {
    fn record(&mut self, size: usize) {
        if self.last.is_none() {
            self.min = size;
            self.max = size;
        }
        self.min = self.min.min(size);
        self.max = self.max.max(size);
        self.last = Some(size);
    }

    fn varied(&self) -> bool {
        self.min != self.max
    }
}

struct Measurements {
    keygen: Vec<f64>,
    primary: Vec<f64>,
    secondary: Vec<f64>,
    failures: usize,
    key_size: SizeSample,
    signature_size: SizeSample,
}

impl Measurements {
    fn with_capacity(n: usize) -> Self {
        Self {
            keygen: Vec::with_capacity(n),
            primary: Vec::with_capacity(n),
            secondary: Vec::with_capacity(n),
            failures: 0,
            key_size: SizeSample::default(),
            signature_size: SizeSample::default(),
        }
    }
}

/// State of one algorithm's run.
pub struct ProtocolRun<'a> {
    descriptor: &'a AlgorithmDescriptor,
    cfg: &'a BenchConfig,
    message: Vec<u8>,
    state: RunState,
}

impl<'a> ProtocolRun<'a> {
    pub fn new(descriptor: &'a AlgorithmDescriptor, cfg: &'a BenchConfig) -> Result<Self> {
        cfg.validate()?;
        debug!(algorithm = %descriptor.name, "run validated");
        Ok(Self {
            descriptor,
            cfg,
            message: cfg.message(),
            state: RunState::Validated,
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn execute<O: OperationSet>(&mut self, ops: &mut O) -> Result<BenchmarkRun> {
        let outcome = self.stages(ops);
        if let Err(err) = &outcome {
            debug!(algorithm = %self.descriptor.name, %err, "run aborted");
            self.state = RunState::Aborted;
        }
        outcome
    }

    fn stages<O: OperationSet>(&mut self, ops: &mut O) -> Result<BenchmarkRun> {
        if self.descriptor.shape() != O::SHAPE {
            return Err(BenchError::Config(format!(
                "{} is a {:?} algorithm but was given {:?} operations",
                self.descriptor.name,
                self.descriptor.shape(),
                O::SHAPE
            )));
        }
        self.warm_up(ops)?;
        let measured = self.measure(ops)?;
        self.finalize::<O>(measured)
    }

    fn warm_up<O: OperationSet>(&mut self, ops: &mut O) -> Result<()> {
        let message = &self.message;
        harness::warm_up(self.cfg.warmup_cycles, || {
            let keys = ops.keygen().map_err(|e| e.to_string())?;
            ops.prepare_primary().map_err(|e| e.to_string())?;
            let output = ops.primary(&keys, message).map_err(|e| e.to_string())?;
            let recovered = ops
                .secondary(&keys, &output, message)
                .map_err(|e| e.to_string())?;
            if ops.is_correct(&output, &recovered) {
                Ok(())
            } else {
                Err("correctness check failed".to_string())
            }
        })
        .map_err(|(cycle, reason)| BenchError::Warmup {
            algorithm: self.descriptor.name.clone(),
            cycle,
            reason,
        })?;

        self.state = RunState::WarmedUp;
        debug!(algorithm = %self.descriptor.name, cycles = self.cfg.warmup_cycles, "warmed up");
        Ok(())
    }

    fn provider_error(&self, iteration: usize, source: ProviderError) -> BenchError {
        BenchError::Provider {
            algorithm: self.descriptor.name.clone(),
            iteration,
            source,
        }
    }

    fn measure<O: OperationSet>(&mut self, ops: &mut O) -> Result<Measurements> {
        let mut m = Measurements::with_capacity(self.cfg.iterations);

        for iteration in 1..=self.cfg.iterations {
            self.state = RunState::Measuring { iteration };
            trace!(algorithm = %self.descriptor.name, iteration, "measuring");

            let (ms, keys) =
                time_op(|| ops.keygen()).map_err(|e| self.provider_error(iteration, e))?;
            m.keygen.push(ms);
            let key_size = ops
                .key_size(&keys)
                .map_err(|e| self.provider_error(iteration, e))?;
            m.key_size.record(key_size);

            ops.prepare_primary()
                .map_err(|e| self.provider_error(iteration, e))?;
            let message = &self.message;
            let (ms, output) = time_op(|| ops.primary(&keys, message))
                .map_err(|e| self.provider_error(iteration, e))?;
            m.primary.push(ms);

            let (ms, recovered) = time_op(|| ops.secondary(&keys, &output, message))
                .map_err(|e| self.provider_error(iteration, e))?;
            m.secondary.push(ms);

            if !ops.is_correct(&output, &recovered) {
                m.failures += 1;
            }
            if let Some(size) = ops.signature_size(&output) {
                m.signature_size.record(size);
            }
        }

        Ok(m)
    }

    fn finalize<O: OperationSet>(&mut self, m: Measurements) -> Result<BenchmarkRun> {
        let n = self.cfg.iterations;
        let keygen_ms = StatsSummary::from_samples(&m.keygen)?;
        let primary_ms = StatsSummary::from_samples(&m.primary)?;
        let secondary_ms = StatsSummary::from_samples(&m.secondary)?;

        let stats = match O::SHAPE {
            OperationShape::Kem => OperationStats::Kem {
                keygen_ms,
                encap_ms: primary_ms,
                decap_ms: secondary_ms,
            },
            OperationShape::Signature => OperationStats::Signature {
                keygen_ms,
                sign_ms: primary_ms,
                verify_ms: secondary_ms,
            },
        };

        for (what, sample) in [("key", &m.key_size), ("signature", &m.signature_size)] {
            if sample.varied() {
                warn!(
                    algorithm = %self.descriptor.name,
                    min = sample.min,
                    max = sample.max,
                    "{what} size varied across iterations; reporting the final one"
                );
            }
        }

        let [keygen_op, primary_op, secondary_op] = O::SHAPE.operations();
        let mut raw = RawTimings::default();
        raw.push(keygen_op, m.keygen);
        raw.push(primary_op, m.primary);
        raw.push(secondary_op, m.secondary);

        let result = BenchmarkResult {
            algorithm: self.descriptor.name.clone(),
            category: self.descriptor.category,
            iterations: n,
            key_size: m.key_size.last.unwrap_or_default(),
            signature_size: m.signature_size.last,
            stats,
            correctness_rate: round6((n - m.failures) as f64 / n as f64),
            timestamp: harness::local_timestamp(),
        };

        self.state = RunState::Finalized;
        debug!(algorithm = %self.descriptor.name, failures = m.failures, "finalized");
        Ok(BenchmarkRun { result, raw })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::schema::{Category, Operation};

    /// Deterministic KEM whose secrets are call counters. Decapsulation calls
    /// listed in `diverge_on` (1-based, warmup included) return a wrong secret.
    #[derive(Default)]
    pub(crate) struct MockKem {
        pub keygen_calls: usize,
        pub prepare_calls: usize,
        pub encap_calls: usize,
        pub decap_calls: usize,
        pub diverge_on: Vec<usize>,
        pub fail_keygen_on: Option<usize>,
        pub key_sizes: Vec<usize>,
    }

    impl KemScheme for MockKem {
        type PublicKey = u64;
        type SecretKey = u64;
        type Ciphertext = u64;
        type SharedSecret = u64;

        fn keygen(&mut self) -> Result<(u64, u64), ProviderError> {
            self.keygen_calls += 1;
            if self.fail_keygen_on == Some(self.keygen_calls) {
                return Err(ProviderError::new(Operation::Keygen, "unsupported parameter set"));
            }
            let k = self.keygen_calls as u64;
            Ok((k, k))
        }

        fn public_key_len(&self, _pk: &u64) -> Result<usize, ProviderError> {
            let idx = self.keygen_calls.saturating_sub(1);
            Ok(self.key_sizes.get(idx).copied().unwrap_or(32))
        }

        fn prepare_encapsulation(&mut self) -> Result<(), ProviderError> {
            self.prepare_calls += 1;
            Ok(())
        }

        fn encapsulate(&mut self, pk: &u64) -> Result<(u64, u64), ProviderError> {
            self.encap_calls += 1;
            if self.encap_calls != self.prepare_calls {
                return Err(ProviderError::new(Operation::Encap, "encapsulation was not prepared"));
            }
            Ok((*pk, pk * 7))
        }

        fn decapsulate(&mut self, sk: &u64, ct: &u64) -> Result<u64, ProviderError> {
            self.decap_calls += 1;
            let secret = sk.max(ct) * 7;
            if self.diverge_on.contains(&self.decap_calls) {
                Ok(secret + 1)
            } else {
                Ok(secret)
            }
        }
    }

    /// Signature scheme with rigged verification outcomes (1-based verify calls,
    /// warmup included).
    #[derive(Default)]
    pub(crate) struct MockSig {
        pub verify_calls: usize,
        pub reject_on: Vec<usize>,
        pub error_on: Vec<usize>,
    }

    impl SignatureScheme for MockSig {
        type SigningKey = u8;
        type VerifyingKey = u8;
        type Signature = Vec<u8>;

        fn keygen(&mut self) -> Result<(u8, u8), ProviderError> {
            Ok((9, 9))
        }

        fn public_key_len(&self, _vk: &u8) -> Result<usize, ProviderError> {
            Ok(48)
        }

        fn sign(&mut self, sk: &u8, message: &[u8]) -> Result<Vec<u8>, ProviderError> {
            Ok(message.iter().take(16).map(|b| b ^ sk).collect())
        }

        fn verify(&mut self, _vk: &u8, _message: &[u8], _sig: &Vec<u8>) -> Result<bool, ProviderError> {
            self.verify_calls += 1;
            if self.error_on.contains(&self.verify_calls) {
                return Err(ProviderError::new(Operation::Verify, "malformed signature"));
            }
            Ok(!self.reject_on.contains(&self.verify_calls))
        }

        fn signature_len(&self, sig: &Vec<u8>) -> usize {
            sig.len()
        }
    }

    fn cfg(iterations: usize) -> BenchConfig {
        BenchConfig::default().with_iterations(iterations)
    }

    fn kem_descriptor() -> AlgorithmDescriptor {
        AlgorithmDescriptor::new("MOCK-KEM", Category::MlKem)
    }

    fn sig_descriptor() -> AlgorithmDescriptor {
        AlgorithmDescriptor::new("MOCK-SIG", Category::MlDsa)
    }

    #[test]
    fn kem_run_produces_full_record() {
        let mut ops = KemOps::new(MockKem::default());
        let run = ops.run(&kem_descriptor(), &cfg(100)).unwrap();

        assert_eq!(run.result.algorithm, "MOCK-KEM");
        assert_eq!(run.result.category, Category::MlKem);
        assert_eq!(run.result.iterations, 100);
        assert_eq!(run.result.correctness_rate, 1.0);
        assert_eq!(run.result.key_size, 32);
        assert_eq!(run.result.signature_size, None);
        assert!(matches!(run.result.stats, OperationStats::Kem { .. }));
        for op in [Operation::Keygen, Operation::Encap, Operation::Decap] {
            assert_eq!(run.raw.get(op).unwrap().len(), 100);
        }
        // 5 warmup cycles + 100 measured
        assert_eq!(ops.scheme.keygen_calls, 105);
        assert_eq!(ops.scheme.prepare_calls, 105);
        assert_eq!(ops.scheme.encap_calls, 105);
    }

    #[test]
    fn forced_divergence_costs_exactly_one_failure() {
        let mut ops = KemOps::new(MockKem {
            diverge_on: vec![5 + 42],
            ..Default::default()
        });
        let run = ops.run(&kem_descriptor(), &cfg(100)).unwrap();
        assert_eq!(run.result.correctness_rate, 0.99);
    }

    #[test]
    fn rigged_verification_lowers_correctness_but_keeps_timings() {
        let mut ops = SignatureOps::new(MockSig {
            reject_on: vec![5 + 3, 5 + 7],
            ..Default::default()
        });
        let run = ops.run(&sig_descriptor(), &cfg(10)).unwrap();

        assert_eq!(run.result.correctness_rate, 0.8);
        assert_eq!(run.raw.get(Operation::Verify).unwrap().len(), 10);
        assert_eq!(run.result.signature_size, Some(16));
        assert_eq!(run.result.key_size, 48);
        assert!(matches!(run.result.stats, OperationStats::Signature { .. }));
    }

    #[test]
    fn verification_error_counts_as_invalid() {
        let mut ops = SignatureOps::new(MockSig {
            error_on: vec![5 + 1],
            ..Default::default()
        });
        let run = ops.run(&sig_descriptor(), &cfg(4)).unwrap();
        assert_eq!(run.result.correctness_rate, 0.75);
    }

    #[test]
    fn warmup_failure_aborts_the_run() {
        let descriptor = sig_descriptor();
        let config = cfg(10);
        let mut ops = SignatureOps::new(MockSig {
            reject_on: vec![2],
            ..Default::default()
        });
        let mut run = ProtocolRun::new(&descriptor, &config).unwrap();
        let err = run.execute(&mut ops).unwrap_err();

        assert!(matches!(err, BenchError::Warmup { cycle: 2, .. }));
        assert_eq!(run.state(), RunState::Aborted);
        assert_eq!(ops.scheme.verify_calls, 2);
    }

    #[test]
    fn warmup_provider_error_is_fatal() {
        let mut ops = KemOps::new(MockKem {
            fail_keygen_on: Some(1),
            ..Default::default()
        });
        let err = ops.run(&kem_descriptor(), &cfg(10)).unwrap_err();
        assert!(matches!(err, BenchError::Warmup { cycle: 1, .. }));
    }

    #[test]
    fn measured_provider_error_propagates() {
        let mut ops = KemOps::new(MockKem {
            fail_keygen_on: Some(5 + 3),
            ..Default::default()
        });
        let err = ops.run(&kem_descriptor(), &cfg(10)).unwrap_err();
        match err {
            BenchError::Provider {
                iteration, source, ..
            } => {
                assert_eq!(iteration, 3);
                assert_eq!(source.operation, Operation::Keygen);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_iterations_fail_fast() {
        let mut ops = KemOps::new(MockKem::default());
        let err = ops.run(&kem_descriptor(), &cfg(0)).unwrap_err();
        assert!(matches!(err, BenchError::Config(_)));
        assert_eq!(ops.scheme.keygen_calls, 0);
    }

    #[test]
    fn single_iteration_fails_loudly_at_statistics() {
        let mut ops = KemOps::new(MockKem::default());
        let err = ops.run(&kem_descriptor(), &cfg(1)).unwrap_err();
        assert!(matches!(err, BenchError::InsufficientSamples { samples: 1 }));
    }

    #[test]
    fn key_size_comes_from_final_iteration() {
        // warmup keygens 1..=5 then measured 6..=8
        let mut ops = KemOps::new(MockKem {
            key_sizes: vec![0, 0, 0, 0, 0, 800, 801, 802],
            ..Default::default()
        });
        let run = ops.run(&kem_descriptor(), &cfg(3)).unwrap();
        assert_eq!(run.result.key_size, 802);
    }

    #[test]
    fn shape_mismatch_is_a_configuration_error() {
        let mut ops = SignatureOps::new(MockSig::default());
        let err = ops.run(&kem_descriptor(), &cfg(10)).unwrap_err();
        assert!(matches!(err, BenchError::Config(_)));
        assert_eq!(ops.scheme.verify_calls, 0);
    }

    #[test]
    fn finished_run_reaches_finalized() {
        let descriptor = kem_descriptor();
        let config = cfg(5);
        let mut ops = KemOps::new(MockKem::default());
        let mut run = ProtocolRun::new(&descriptor, &config).unwrap();
        assert_eq!(run.state(), RunState::Validated);
        run.execute(&mut ops).unwrap();
        assert_eq!(run.state(), RunState::Finalized);
    }
}
