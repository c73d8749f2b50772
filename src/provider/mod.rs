//! Runtime crypto provider.
//!
//! Scheme traits describe the primitive operations of a KEM or a signature
//! algorithm; the adapters in the submodules map them onto the underlying
//! libraries. [`Provider`] is what the orchestrator talks to: it reports which
//! mechanisms are enabled and opens a ready-to-run [`Benchmark`] for one of them.

use std::collections::BTreeSet;

use crate::catalog::AlgorithmDescriptor;
use crate::error::{BenchError, ProviderError, Result};
use crate::protocol::Benchmark;
use crate::schema::{Category, OperationShape};

pub mod classic_kem;
pub mod classic_sig;
#[cfg(feature = "hqc")]
pub mod hqc;
pub mod ml_dsa;
pub mod ml_kem;
pub mod slh_dsa;

/// A key-encapsulation mechanism.
pub trait KemScheme {
    type PublicKey;
    type SecretKey;
    type Ciphertext;
    type SharedSecret: PartialEq;

    fn keygen(&mut self) -> Result<(Self::PublicKey, Self::SecretKey), ProviderError>;

    /// Serialized size of the public key in bytes.
    fn public_key_len(&self, pk: &Self::PublicKey) -> Result<usize, ProviderError>;

    /// Runs outside the timer before every `encapsulate`, for input the
    /// scheme draws itself (such as a key-transport secret).
    fn prepare_encapsulation(&mut self) -> Result<(), ProviderError> {
        Ok(())
    }

    fn encapsulate(
        &mut self,
        pk: &Self::PublicKey,
    ) -> Result<(Self::Ciphertext, Self::SharedSecret), ProviderError>;

    fn decapsulate(
        &mut self,
        sk: &Self::SecretKey,
        ct: &Self::Ciphertext,
    ) -> Result<Self::SharedSecret, ProviderError>;
}

/// A digital-signature algorithm.
pub trait SignatureScheme {
    type SigningKey;
    type VerifyingKey;
    type Signature;

    fn keygen(&mut self) -> Result<(Self::SigningKey, Self::VerifyingKey), ProviderError>;

    /// Serialized size of the verifying key in bytes.
    fn public_key_len(&self, vk: &Self::VerifyingKey) -> Result<usize, ProviderError>;

    fn sign(
        &mut self,
        sk: &Self::SigningKey,
        message: &[u8],
    ) -> Result<Self::Signature, ProviderError>;

    /// `Ok(false)` for a signature that does not verify. Adapters over
    /// libraries that signal rejection with an error return `Err` instead;
    /// both count as an invalid signature.
    fn verify(
        &mut self,
        vk: &Self::VerifyingKey,
        message: &[u8],
        signature: &Self::Signature,
    ) -> Result<bool, ProviderError>;

    fn signature_len(&self, signature: &Self::Signature) -> usize;
}

pub trait Provider {
    fn enabled_kem_mechanisms(&self) -> BTreeSet<String>;

    fn enabled_sig_mechanisms(&self) -> BTreeSet<String>;

    /// Classical baselines, benchmarked regardless of the catalog.
    fn classical_algorithms(&self) -> Vec<AlgorithmDescriptor>;

    /// Open a provider handle for one run. Dropping the box releases it.
    fn open(&self, descriptor: &AlgorithmDescriptor) -> Result<Box<dyn Benchmark>>;
}

/// Provider backed by the primitives compiled into this binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeProvider;

impl NativeProvider {
    fn mechanisms(category: Category) -> &'static [&'static str] {
        match category {
            Category::LegacyKem => classic_kem::MECHANISMS,
            Category::LegacySig => classic_sig::MECHANISMS,
            Category::MlKem => ml_kem::MECHANISMS,
            #[cfg(feature = "hqc")]
            Category::Hqc => hqc::MECHANISMS,
            #[cfg(not(feature = "hqc"))]
            Category::Hqc => &[],
            Category::MlDsa => ml_dsa::MECHANISMS,
            Category::SlhDsa => slh_dsa::MECHANISMS,
        }
    }

    fn enabled(shape: OperationShape) -> BTreeSet<String> {
        [
            Category::LegacyKem,
            Category::LegacySig,
            Category::MlKem,
            Category::Hqc,
            Category::MlDsa,
            Category::SlhDsa,
        ]
        .into_iter()
        .filter(|c| c.shape() == shape)
        .flat_map(|c| Self::mechanisms(c).iter().map(|s| s.to_string()))
        .collect()
    }
}

impl Provider for NativeProvider {
    fn enabled_kem_mechanisms(&self) -> BTreeSet<String> {
        Self::enabled(OperationShape::Kem)
    }

    fn enabled_sig_mechanisms(&self) -> BTreeSet<String> {
        Self::enabled(OperationShape::Signature)
    }

    fn classical_algorithms(&self) -> Vec<AlgorithmDescriptor> {
        classic_kem::MECHANISMS
            .iter()
            .map(|name| AlgorithmDescriptor::new(*name, Category::LegacyKem))
            .chain(
                classic_sig::MECHANISMS
                    .iter()
                    .map(|name| AlgorithmDescriptor::new(*name, Category::LegacySig)),
            )
            .collect()
    }

    fn open(&self, descriptor: &AlgorithmDescriptor) -> Result<Box<dyn Benchmark>> {
        let name = descriptor.name.as_str();
        let opened = match descriptor.category {
            Category::LegacyKem => classic_kem::open(name),
            Category::LegacySig => classic_sig::open(name),
            Category::MlKem => ml_kem::open(name),
            #[cfg(feature = "hqc")]
            Category::Hqc => hqc::open(name),
            #[cfg(not(feature = "hqc"))]
            Category::Hqc => None,
            Category::MlDsa => ml_dsa::open(name),
            Category::SlhDsa => slh_dsa::open(name),
        };
        opened.ok_or_else(|| BenchError::UnknownAlgorithm(descriptor.name.clone()))
    }
}
