//! ML-DSA (FIPS 204) parameter sets, signing with an empty context string.
//!
//! Signatures stay in the library's fixed-size form, so signing allocates
//! nothing beyond what the library does.

use fips204::traits::{Signer, Verifier};
use fips204::{ml_dsa_44, ml_dsa_65, ml_dsa_87};

use super::SignatureScheme;
use crate::error::ProviderError;
use crate::protocol::{Benchmark, SignatureOps};
use crate::schema::Operation;

pub const MECHANISMS: &[&str] = &["ML-DSA-44", "ML-DSA-65", "ML-DSA-87"];

const CONTEXT: &[u8] = b"";

pub fn open(name: &str) -> Option<Box<dyn Benchmark>> {
    match name {
        "ML-DSA-44" => Some(Box::new(SignatureOps::new(MlDsa44))),
        "ML-DSA-65" => Some(Box::new(SignatureOps::new(MlDsa65))),
        "ML-DSA-87" => Some(Box::new(SignatureOps::new(MlDsa87))),
        _ => None,
    }
}

macro_rules! ml_dsa_scheme {
    ($name:ident, $params:ident) => {
        pub struct $name;

        impl SignatureScheme for $name {
            type SigningKey = $params::PrivateKey;
            type VerifyingKey = $params::PublicKey;
            type Signature = <$params::PrivateKey as Signer>::Signature;

            fn keygen(&mut self) -> Result<(Self::SigningKey, Self::VerifyingKey), ProviderError> {
                let (pk, sk) = $params::try_keygen()
                    .map_err(|e| ProviderError::new(Operation::Keygen, e))?;
                Ok((sk, pk))
            }

            fn public_key_len(&self, _vk: &Self::VerifyingKey) -> Result<usize, ProviderError> {
                Ok($params::PK_LEN)
            }

            fn sign(&mut self, sk: &Self::SigningKey, message: &[u8]) -> Result<Self::Signature, ProviderError> {
                sk.try_sign(message, CONTEXT)
                    .map_err(|e| ProviderError::new(Operation::Sign, e))
            }

            fn verify(
                &mut self,
                vk: &Self::VerifyingKey,
                message: &[u8],
                signature: &Self::Signature,
            ) -> Result<bool, ProviderError> {
                Ok(vk.verify(message, signature, CONTEXT))
            }

            fn signature_len(&self, _signature: &Self::Signature) -> usize {
                $params::SIG_LEN
            }
        }
    };
}

ml_dsa_scheme!(MlDsa44, ml_dsa_44);
ml_dsa_scheme!(MlDsa65, ml_dsa_65);
ml_dsa_scheme!(MlDsa87, ml_dsa_87);
