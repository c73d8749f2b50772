//! HQC via the PQClean bindings.

use pqcrypto_hqc::{hqc128, hqc192, hqc256};
use pqcrypto_traits::kem::{PublicKey as _, SharedSecret as _};

use super::KemScheme;
use crate::error::ProviderError;
use crate::protocol::{Benchmark, KemOps};

pub const MECHANISMS: &[&str] = &["HQC-128", "HQC-192", "HQC-256"];

pub fn open(name: &str) -> Option<Box<dyn Benchmark>> {
    match name {
        "HQC-128" => Some(Box::new(KemOps::new(Hqc128))),
        "HQC-192" => Some(Box::new(KemOps::new(Hqc192))),
        "HQC-256" => Some(Box::new(KemOps::new(Hqc256))),
        _ => None,
    }
}

// PQClean aborts rather than reporting failures, so every operation is infallible here.
macro_rules! hqc_scheme {
    ($name:ident, $params:ident) => {
        pub struct $name;

        impl KemScheme for $name {
            type PublicKey = $params::PublicKey;
            type SecretKey = $params::SecretKey;
            type Ciphertext = $params::Ciphertext;
            type SharedSecret = Vec<u8>;

            fn keygen(&mut self) -> Result<(Self::PublicKey, Self::SecretKey), ProviderError> {
                Ok($params::keypair())
            }

            fn public_key_len(&self, pk: &Self::PublicKey) -> Result<usize, ProviderError> {
                Ok(pk.as_bytes().len())
            }

            fn encapsulate(
                &mut self,
                pk: &Self::PublicKey,
            ) -> Result<(Self::Ciphertext, Vec<u8>), ProviderError> {
                let (ss, ct) = $params::encapsulate(pk);
                Ok((ct, ss.as_bytes().to_vec()))
            }

            fn decapsulate(
                &mut self,
                sk: &Self::SecretKey,
                ct: &Self::Ciphertext,
            ) -> Result<Vec<u8>, ProviderError> {
                Ok($params::decapsulate(ct, sk).as_bytes().to_vec())
            }
        }
    };
}

hqc_scheme!(Hqc128, hqc128);
hqc_scheme!(Hqc192, hqc192);
hqc_scheme!(Hqc256, hqc256);
