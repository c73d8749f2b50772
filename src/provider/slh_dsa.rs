//! SLH-DSA (FIPS 205) in all twelve SHA2/SHAKE parameter sets.
//!
//! Signing is hedged and uses an empty context string. Signatures are kept
//! in the library's fixed-size form rather than copied out.

use fips205::traits::{Signer, Verifier};

use super::SignatureScheme;
use crate::error::ProviderError;
use crate::protocol::{Benchmark, SignatureOps};
use crate::schema::Operation;

const CONTEXT: &[u8] = b"";

macro_rules! slh_dsa_schemes {
    ($(($name:ident, $params:ident, $label:literal)),+ $(,)?) => {
        pub const MECHANISMS: &[&str] = &[$($label),+];

        pub fn open(name: &str) -> Option<Box<dyn Benchmark>> {
            match name {
                $($label => Some(Box::new(SignatureOps::new($name))),)+
                _ => None,
            }
        }

        $(
            #[allow(non_camel_case_types)]
            pub struct $name;

            impl SignatureScheme for $name {
                type SigningKey = fips205::$params::PrivateKey;
                type VerifyingKey = fips205::$params::PublicKey;
                type Signature = <fips205::$params::PrivateKey as Signer>::Signature;

                fn keygen(&mut self) -> Result<(Self::SigningKey, Self::VerifyingKey), ProviderError> {
                    let (pk, sk) = fips205::$params::try_keygen()
                        .map_err(|e| ProviderError::new(Operation::Keygen, e))?;
                    Ok((sk, pk))
                }

                fn public_key_len(&self, _vk: &Self::VerifyingKey) -> Result<usize, ProviderError> {
                    Ok(fips205::$params::PK_LEN)
                }

                fn sign(
                    &mut self,
                    sk: &Self::SigningKey,
                    message: &[u8],
                ) -> Result<Self::Signature, ProviderError> {
                    sk.try_sign(message, CONTEXT, true)
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
                    fips205::$params::SIG_LEN
                }
            }
        )+
    };
}

slh_dsa_schemes!(
    (Sha2_128s, slh_dsa_sha2_128s, "SLH-DSA-SHA2-128s"),
    (Sha2_128f, slh_dsa_sha2_128f, "SLH-DSA-SHA2-128f"),
    (Sha2_192s, slh_dsa_sha2_192s, "SLH-DSA-SHA2-192s"),
    (Sha2_192f, slh_dsa_sha2_192f, "SLH-DSA-SHA2-192f"),
    (Sha2_256s, slh_dsa_sha2_256s, "SLH-DSA-SHA2-256s"),
    (Sha2_256f, slh_dsa_sha2_256f, "SLH-DSA-SHA2-256f"),
    (Shake128s, slh_dsa_shake_128s, "SLH-DSA-SHAKE-128s"),
    (Shake128f, slh_dsa_shake_128f, "SLH-DSA-SHAKE-128f"),
    (Shake192s, slh_dsa_shake_192s, "SLH-DSA-SHAKE-192s"),
    (Shake192f, slh_dsa_shake_192f, "SLH-DSA-SHAKE-192f"),
    (Shake256s, slh_dsa_shake_256s, "SLH-DSA-SHAKE-256s"),
    (Shake256f, slh_dsa_shake_256f, "SLH-DSA-SHAKE-256f"),
);

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE: &[u8] = &[0xFF; 1024];

    // The "s" variants take seconds per signature; the fast ones cover the adapter.
    #[test]
    fn fast_variants_sign_and_verify() {
        let mut scheme = Sha2_128f;
        let (sk, vk) = scheme.keygen().unwrap();
        let sig = scheme.sign(&sk, MESSAGE).unwrap();
        assert!(scheme.verify(&vk, MESSAGE, &sig).unwrap());
        assert_eq!(scheme.public_key_len(&vk).unwrap(), 32);
        assert_eq!(scheme.signature_len(&sig), 17088);

        let mut scheme = Shake128f;
        let (sk, vk) = scheme.keygen().unwrap();
        let sig = scheme.sign(&sk, MESSAGE).unwrap();
        assert!(!scheme.verify(&vk, b"different", &sig).unwrap());
    }

    #[test]
    fn all_twelve_names_open() {
        assert_eq!(MECHANISMS.len(), 12);
        for name in MECHANISMS {
            assert!(open(name).is_some(), "{name}");
        }
        assert!(open("SPHINCS+-SHA2-128f-simple").is_none());
    }
}
