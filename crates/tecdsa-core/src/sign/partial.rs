//! Partial signature generation

use super::SigningNonce;
use crate::curve::CurveContext;
use crate::math::{invert, reduce_bytes, x_coordinate, SecretScalar};
use crate::ports::Clock;
use crate::{Error, PartialSignature, Party, Result};
use tracing::{debug, instrument};

/// Computes one party's contribution `s_i = k^-1 (e + r x_i)`.
///
/// Holds no mutable state, so parties can sign concurrently with a shared
/// signer.
pub struct PartialSigner<'a, C: CurveContext + ?Sized, K: Clock + ?Sized> {
    curve: &'a C,
    clock: &'a K,
}

impl<'a, C: CurveContext + ?Sized, K: Clock + ?Sized> PartialSigner<'a, C, K> {
    pub fn new(curve: &'a C, clock: &'a K) -> Self {
        Self { curve, clock }
    }

    /// Sign `message` as `party` within `session_id` under the shared nonce.
    #[instrument(skip(self, message, party, nonce), fields(party_id = party.id()))]
    pub fn sign(
        &self,
        message: &[u8],
        party: &Party,
        session_id: &str,
        nonce: &SigningNonce,
    ) -> Result<PartialSignature> {
        if session_id.is_empty() {
            return Err(Error::InvalidConfig("session id must not be empty".into()));
        }

        let message_hash = self.curve.hash(message);
        let e = reduce_bytes(&message_hash);

        let k = nonce.scalar();
        let big_r = self.curve.scalar_multiply(&self.curve.base_point(), k);
        let r = x_coordinate(&big_r);
        if bool::from(r.is_zero()) {
            return Err(Error::InvalidNonce("nonce yields r = 0".into()));
        }

        let k_inv = SecretScalar::new(
            invert(k).ok_or_else(|| Error::InvalidNonce("nonce is not invertible".into()))?,
        );
        let blinded_share = SecretScalar::new(r * *party.share());
        let si = *k_inv.expose() * (e + *blinded_share.expose());

        debug!(r = %hex::encode(r.to_bytes()), "Partial signature computed");

        Ok(PartialSignature {
            party_id: party.id(),
            session_id: session_id.to_string(),
            r,
            si,
            message_hash,
            message: message.to_vec(),
            timestamp: self.clock.now(),
        })
    }

    /// Sign one message for several parties, in parallel when the
    /// `multi-thread` feature is enabled. Output order follows `parties`.
    pub fn sign_many(
        &self,
        message: &[u8],
        parties: &[&Party],
        session_id: &str,
        nonce: &SigningNonce,
    ) -> Result<Vec<PartialSignature>> {
        #[cfg(feature = "multi-thread")]
        {
            use rayon::prelude::*;
            parties
                .par_iter()
                .map(|party| self.sign(message, party, session_id, nonce))
                .collect()
        }

        #[cfg(not(feature = "multi-thread"))]
        {
            parties
                .iter()
                .map(|party| self.sign(message, party, session_id, nonce))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Secp256k1;
    use crate::keygen::KeyGenerator;
    use crate::ports::testing::ScriptedRng;
    use crate::ports::FixedClock;
    use crate::{KeyGenerationResult, SchemeParameters};
    use chrono::DateTime;
    use k256::{ProjectivePoint, Scalar};

    fn keys() -> KeyGenerationResult {
        // secret 5, f(x) = 5 + 4x
        let params = SchemeParameters::new(2, 3).unwrap();
        KeyGenerator::new(&Secp256k1, params)
            .unwrap()
            .generate_keys(&mut ScriptedRng::from_values(&[5, 4]))
            .unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock(DateTime::from_timestamp(1_700_000_000, 0).unwrap())
    }

    #[test]
    fn test_partial_signature_values() {
        let keys = keys();
        let clock = clock();
        let signer = PartialSigner::new(&Secp256k1, &clock);
        let nonce = SigningNonce::from_scalar(Scalar::from(11u64)).unwrap();

        let partial = signer
            .sign(b"hello", keys.party(2).unwrap(), "session-1", &nonce)
            .unwrap();

        let k = Scalar::from(11u64);
        let r = x_coordinate(&(ProjectivePoint::GENERATOR * k));
        let e = reduce_bytes(&Secp256k1.hash(b"hello"));
        // share of party 2 is 13
        let expected = invert(&k).unwrap() * (e + r * Scalar::from(13u64));

        assert_eq!(partial.party_id, 2);
        assert_eq!(partial.session_id, "session-1");
        assert_eq!(partial.r, r);
        assert_eq!(partial.si, expected);
        assert_eq!(partial.message, b"hello".to_vec());
        assert_eq!(partial.message_hash, Secp256k1.hash(b"hello"));
        assert_eq!(partial.timestamp, clock.0);
    }

    #[test]
    fn test_shared_nonce_gives_shared_r() {
        let keys = keys();
        let clock = clock();
        let signer = PartialSigner::new(&Secp256k1, &clock);
        let nonce = SigningNonce::from_scalar(Scalar::from(99u64)).unwrap();

        let parties: Vec<&Party> = keys.parties().iter().collect();
        let partials = signer.sign_many(b"msg", &parties, "s", &nonce).unwrap();

        assert_eq!(partials.len(), 3);
        assert!(partials.iter().all(|p| p.r == partials[0].r));
        let ids: Vec<usize> = partials.iter().map(|p| p.party_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_partial_is_not_a_standalone_signature() {
        let keys = keys();
        let clock = clock();
        let signer = PartialSigner::new(&Secp256k1, &clock);
        let nonce = SigningNonce::from_scalar(Scalar::from(11u64)).unwrap();

        for party in keys.parties() {
            let partial = signer.sign(b"hello", party, "s", &nonce).unwrap();
            assert!(!Secp256k1.verify(
                keys.public_key(),
                &partial.message_hash,
                &partial.r,
                &partial.si
            ));
        }
    }

    #[test]
    fn test_empty_session_rejected() {
        let keys = keys();
        let clock = clock();
        let signer = PartialSigner::new(&Secp256k1, &clock);
        let nonce = SigningNonce::from_scalar(Scalar::from(11u64)).unwrap();

        assert!(matches!(
            signer.sign(b"hello", keys.party(1).unwrap(), "", &nonce),
            Err(Error::InvalidConfig(_))
        ));
    }
}
