//! Threshold signing module
//!
//! Every participant signs with its own share under one shared nonce; a
//! combiner then weights the contributions with Lagrange coefficients.

mod combine;
mod partial;

pub use combine::SignatureCombiner;
pub use partial::PartialSigner;

use crate::math::{reduce_bytes, SecretScalar};
use crate::ports::RandomSource;
use crate::{Error, Result};
use k256::Scalar;
use std::fmt;

/// The per-session nonce `k`, shared by every participant of one signature.
///
/// There is no per-party default: all partial signatures that are to be
/// combined must be produced from the same `SigningNonce`, otherwise their
/// `r` values differ and combination fails with [`Error::NonceMismatch`].
#[derive(Clone)]
pub struct SigningNonce(SecretScalar);

impl SigningNonce {
    /// Draw a fresh nonce, typically by the session coordinator
    pub fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Result<Self> {
        Ok(Self(SecretScalar::new(rng.random_scalar()?)))
    }

    /// Nonce from 32 agreed bytes, reduced modulo the group order
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self> {
        Self::from_scalar(reduce_bytes(bytes))
    }

    /// Nonce from an agreed hex string of 32 bytes
    pub fn from_hex(encoded: &str) -> Result<Self> {
        let mut bytes: [u8; 32] = hex::decode(encoded)?
            .try_into()
            .map_err(|_| Error::InvalidNonce("nonce must be 32 bytes".into()))?;
        let nonce = Self::from_bytes(&bytes);
        zeroize::Zeroize::zeroize(&mut bytes);
        nonce
    }

    /// Nonce from a scalar; zero is rejected
    pub fn from_scalar(k: Scalar) -> Result<Self> {
        let secret = SecretScalar::new(k);
        if secret.is_zero() {
            return Err(Error::InvalidNonce("nonce reduces to zero".into()));
        }
        Ok(Self(secret))
    }

    pub(crate) fn scalar(&self) -> &Scalar {
        self.0.expose()
    }
}

impl fmt::Debug for SigningNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningNonce(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::testing::FailingRng;

    #[test]
    fn test_zero_nonce_rejected() {
        assert!(matches!(
            SigningNonce::from_bytes(&[0u8; 32]),
            Err(Error::InvalidNonce(_))
        ));
        assert!(SigningNonce::from_scalar(Scalar::ZERO).is_err());
    }

    #[test]
    fn test_nonce_bytes_are_reduced() {
        let nonce = SigningNonce::from_bytes(&[0xff; 32]).unwrap();
        assert_eq!(*nonce.scalar(), reduce_bytes(&[0xff; 32]));
    }

    #[test]
    fn test_nonce_from_hex() {
        let nonce = SigningNonce::from_hex(&format!("{:0>64}", "2a")).unwrap();
        assert_eq!(*nonce.scalar(), Scalar::from(42u64));
        assert!(SigningNonce::from_hex("2a").is_err());
        assert!(SigningNonce::from_hex("zz").is_err());
    }

    #[test]
    fn test_random_nonce_propagates_rng_failure() {
        assert!(matches!(
            SigningNonce::random(&mut FailingRng),
            Err(Error::Randomness(_))
        ));
    }

    #[test]
    fn test_debug_is_redacted() {
        let nonce = SigningNonce::from_scalar(Scalar::from(42u64)).unwrap();
        assert_eq!(format!("{:?}", nonce), "SigningNonce(<redacted>)");
    }
}
