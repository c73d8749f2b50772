//! ML-KEM (FIPS 203) parameter sets.

use fips203::traits::{Decaps, Encaps, KeyGen, SerDes};
use fips203::{ml_kem_1024, ml_kem_512, ml_kem_768};

use super::KemScheme;
use crate::error::ProviderError;
use crate::protocol::{Benchmark, KemOps};
use crate::schema::Operation;

pub const MECHANISMS: &[&str] = &["ML-KEM-512", "ML-KEM-768", "ML-KEM-1024"];

pub fn open(name: &str) -> Option<Box<dyn Benchmark>> {
    match name {
        "ML-KEM-512" => Some(Box::new(KemOps::new(MlKem512))),
        "ML-KEM-768" => Some(Box::new(KemOps::new(MlKem768))),
        "ML-KEM-1024" => Some(Box::new(KemOps::new(MlKem1024))),
        _ => None,
    }
}

macro_rules! ml_kem_scheme {
    ($name:ident, $params:ident) => {
        pub struct $name;

        impl KemScheme for $name {
            type PublicKey = $params::EncapsKey;
            type SecretKey = $params::DecapsKey;
            type Ciphertext = $params::CipherText;
            type SharedSecret = [u8; 32];

            fn keygen(&mut self) -> Result<(Self::PublicKey, Self::SecretKey), ProviderError> {
                $params::KG::try_keygen().map_err(|e| ProviderError::new(Operation::Keygen, e))
            }

            fn public_key_len(&self, _pk: &Self::PublicKey) -> Result<usize, ProviderError> {
                Ok($params::EK_LEN)
            }

            fn encapsulate(
                &mut self,
                pk: &Self::PublicKey,
            ) -> Result<(Self::Ciphertext, [u8; 32]), ProviderError> {
                let (ssk, ct) = pk
                    .try_encaps()
                    .map_err(|e| ProviderError::new(Operation::Encap, e))?;
                Ok((ct, ssk.into_bytes()))
            }

            fn decapsulate(
                &mut self,
                sk: &Self::SecretKey,
                ct: &Self::Ciphertext,
            ) -> Result<[u8; 32], ProviderError> {
                sk.try_decaps(ct)
                    .map(|ssk| ssk.into_bytes())
                    .map_err(|e| ProviderError::new(Operation::Decap, e))
            }
        }
    };
}

ml_kem_scheme!(MlKem512, ml_kem_512);
ml_kem_scheme!(MlKem768, ml_kem_768);
ml_kem_scheme!(MlKem1024, ml_kem_1024);
