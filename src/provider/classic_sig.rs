//! Classical signature baselines: RSA-PSS, ECDSA over P-256 and Ed25519.
//!
//! Key sizes are DER SubjectPublicKeyInfo lengths for all three. The
//! underlying libraries report a bad signature as an error, which is passed
//! through as `Err` and counted as invalid by the protocol.

use ed25519_dalek::pkcs8::EncodePublicKey as _;
use p256::pkcs8::EncodePublicKey as _;
use rand::rngs::OsRng;
use rsa::pkcs8::EncodePublicKey as _;
use rsa::signature::{RandomizedSigner, SignatureEncoding, Signer, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use super::SignatureScheme;
use crate::error::ProviderError;
use crate::protocol::{Benchmark, SignatureOps};
use crate::schema::Operation;

pub const RSA_2048: &str = "RSA-2048";
pub const ECDSA_P256: &str = "ECDSA-P256";
pub const ED25519: &str = "Ed25519";

pub const MECHANISMS: &[&str] = &[RSA_2048, ECDSA_P256, ED25519];

pub fn open(name: &str) -> Option<Box<dyn Benchmark>> {
    match name {
        RSA_2048 => Some(Box::new(SignatureOps::new(RsaPss::new(2048)))),
        ECDSA_P256 => Some(Box::new(SignatureOps::new(EcdsaP256))),
        ED25519 => Some(Box::new(SignatureOps::new(Ed25519))),
        _ => None,
    }
}

fn der_error(e: impl ToString) -> ProviderError {
    ProviderError::new(Operation::Keygen, e.to_string())
}

fn rejected(e: impl ToString) -> ProviderError {
    ProviderError::new(Operation::Verify, e.to_string())
}

/// Longest PSS salt the key's encoded message can hold:
/// `emLen - hLen - 2` with `emLen = ceil((modBits - 1) / 8)`.
pub fn max_pss_salt_len(pk: &RsaPublicKey) -> usize {
    let em_len = (pk.n().bits() - 1).div_ceil(8);
    em_len.saturating_sub(<Sha256 as Digest>::output_size() + 2)
}

/// RSA-PSS with SHA-256 and the maximum salt length.
pub struct RsaPss {
    bits: usize,
}

impl RsaPss {
    pub fn new(bits: usize) -> Self {
        Self { bits }
    }
}

impl SignatureScheme for RsaPss {
    type SigningKey = pss::SigningKey<Sha256>;
    type VerifyingKey = (RsaPublicKey, pss::VerifyingKey<Sha256>);
    type Signature = pss::Signature;

    fn keygen(&mut self) -> Result<(Self::SigningKey, Self::VerifyingKey), ProviderError> {
        let sk = RsaPrivateKey::new(&mut OsRng, self.bits).map_err(der_error)?;
        let pk = sk.to_public_key();
        let salt_len = max_pss_salt_len(&pk);
        let vk = pss::VerifyingKey::new_with_salt_len(pk.clone(), salt_len);
        Ok((pss::SigningKey::new_with_salt_len(sk, salt_len), (pk, vk)))
    }

    fn public_key_len(&self, (pk, _): &Self::VerifyingKey) -> Result<usize, ProviderError> {
        pk.to_public_key_der()
            .map(|der| der.as_bytes().len())
            .map_err(der_error)
    }

    fn sign(&mut self, sk: &Self::SigningKey, message: &[u8]) -> Result<pss::Signature, ProviderError> {
        sk.try_sign_with_rng(&mut OsRng, message)
            .map_err(|e| ProviderError::new(Operation::Sign, e.to_string()))
    }

    fn verify(
        &mut self,
        (_, vk): &Self::VerifyingKey,
        message: &[u8],
        signature: &pss::Signature,
    ) -> Result<bool, ProviderError> {
        vk.verify(message, signature).map(|()| true).map_err(rejected)
    }

    fn signature_len(&self, signature: &pss::Signature) -> usize {
        signature.to_bytes().len()
    }
}

pub struct EcdsaP256;

impl SignatureScheme for EcdsaP256 {
    type SigningKey = p256::ecdsa::SigningKey;
    type VerifyingKey = p256::ecdsa::VerifyingKey;
    type Signature = p256::ecdsa::Signature;

    fn keygen(&mut self) -> Result<(Self::SigningKey, Self::VerifyingKey), ProviderError> {
        let sk = p256::ecdsa::SigningKey::random(&mut OsRng);
        let vk = p256::ecdsa::VerifyingKey::from(&sk);
        Ok((sk, vk))
    }

    fn public_key_len(&self, vk: &Self::VerifyingKey) -> Result<usize, ProviderError> {
        vk.to_public_key_der()
            .map(|der| der.as_bytes().len())
            .map_err(der_error)
    }

    fn sign(&mut self, sk: &Self::SigningKey, message: &[u8]) -> Result<Self::Signature, ProviderError> {
        Signer::<p256::ecdsa::Signature>::try_sign(sk, message)
            .map_err(|e| ProviderError::new(Operation::Sign, e.to_string()))
    }

    fn verify(
        &mut self,
        vk: &Self::VerifyingKey,
        message: &[u8],
        signature: &Self::Signature,
    ) -> Result<bool, ProviderError> {
        Verifier::<p256::ecdsa::Signature>::verify(vk, message, signature)
            .map(|()| true)
            .map_err(rejected)
    }

    /// Fixed-width `r || s` encoding.
    fn signature_len(&self, signature: &Self::Signature) -> usize {
        signature.to_bytes().len()
    }
}

pub struct Ed25519;

impl SignatureScheme for Ed25519 {
    type SigningKey = ed25519_dalek::SigningKey;
    type VerifyingKey = ed25519_dalek::VerifyingKey;
    type Signature = ed25519_dalek::Signature;

    fn keygen(&mut self) -> Result<(Self::SigningKey, Self::VerifyingKey), ProviderError> {
        let sk = ed25519_dalek::SigningKey::generate(&mut OsRng);
        let vk = sk.verifying_key();
        Ok((sk, vk))
    }

    fn public_key_len(&self, vk: &Self::VerifyingKey) -> Result<usize, ProviderError> {
        vk.to_public_key_der()
            .map(|der| der.as_bytes().len())
            .map_err(der_error)
    }

    fn sign(&mut self, sk: &Self::SigningKey, message: &[u8]) -> Result<Self::Signature, ProviderError> {
        Signer::<ed25519_dalek::Signature>::try_sign(sk, message)
            .map_err(|e| ProviderError::new(Operation::Sign, e.to_string()))
    }

    fn verify(
        &mut self,
        vk: &Self::VerifyingKey,
        message: &[u8],
        signature: &Self::Signature,
    ) -> Result<bool, ProviderError> {
        Verifier::<ed25519_dalek::Signature>::verify(vk, message, signature)
            .map(|()| true)
            .map_err(rejected)
    }

    fn signature_len(&self, signature: &Self::Signature) -> usize {
        signature.to_bytes().len()
    }
}
