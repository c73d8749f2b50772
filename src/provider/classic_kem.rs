//! RSA-OAEP as a classical KEM baseline.
//!
//! Encapsulation encrypts a fresh 32-byte random secret to the public key;
//! decapsulation decrypts it back. The secret is drawn in
//! `prepare_encapsulation`, outside the encapsulation timing.

use rand::rngs::OsRng;
use rand::RngCore;
use rsa::pkcs8::EncodePublicKey;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use super::KemScheme;
use crate::error::ProviderError;
use crate::protocol::{Benchmark, KemOps};
use crate::schema::Operation;

pub const RSA_OAEP_2048: &str = "RSA-OAEP_2048-bit";

pub const MECHANISMS: &[&str] = &[RSA_OAEP_2048];

const SECRET_LEN: usize = 32;

pub fn open(name: &str) -> Option<Box<dyn Benchmark>> {
    match name {
        RSA_OAEP_2048 => Some(Box::new(KemOps::new(RsaOaep::new(2048)))),
        _ => None,
    }
}

pub struct RsaOaep {
    bits: usize,
    next_secret: Option<[u8; SECRET_LEN]>,
}

impl RsaOaep {
    pub fn new(bits: usize) -> Self {
        Self {
            bits,
            next_secret: None,
        }
    }

    fn draw_secret() -> [u8; SECRET_LEN] {
        let mut secret = [0u8; SECRET_LEN];
        OsRng.fill_bytes(&mut secret);
        secret
    }
}

impl KemScheme for RsaOaep {
    type PublicKey = RsaPublicKey;
    type SecretKey = RsaPrivateKey;
    type Ciphertext = Vec<u8>;
    type SharedSecret = Vec<u8>;

    fn keygen(&mut self) -> Result<(RsaPublicKey, RsaPrivateKey), ProviderError> {
        let sk = RsaPrivateKey::new(&mut OsRng, self.bits)
            .map_err(|e| ProviderError::new(Operation::Keygen, e.to_string()))?;
        Ok((sk.to_public_key(), sk))
    }

    /// DER SubjectPublicKeyInfo length.
    fn public_key_len(&self, pk: &RsaPublicKey) -> Result<usize, ProviderError> {
        pk.to_public_key_der()
            .map(|der| der.as_bytes().len())
            .map_err(|e| ProviderError::new(Operation::Keygen, e.to_string()))
    }

    fn prepare_encapsulation(&mut self) -> Result<(), ProviderError> {
        self.next_secret = Some(Self::draw_secret());
        Ok(())
    }

    fn encapsulate(&mut self, pk: &RsaPublicKey) -> Result<(Vec<u8>, Vec<u8>), ProviderError> {
        let secret = self.next_secret.take().unwrap_or_else(Self::draw_secret);
        let ct = pk
            .encrypt(&mut OsRng, Oaep::new::<Sha256>(), &secret)
            .map_err(|e| ProviderError::new(Operation::Encap, e.to_string()))?;
        Ok((ct, secret.to_vec()))
    }

    fn decapsulate(&mut self, sk: &RsaPrivateKey, ct: &Vec<u8>) -> Result<Vec<u8>, ProviderError> {
        sk.decrypt(Oaep::new::<Sha256>(), ct)
            .map_err(|e| ProviderError::new(Operation::Decap, e.to_string()))
    }
}
