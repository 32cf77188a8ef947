//! The complete threshold ECDSA scheme behind one type

use crate::curve::{CurveContext, Secp256k1};
use crate::keygen::KeyGenerator;
use crate::ports::{Clock, RandomSource, SystemClock};
use crate::sign::{PartialSigner, SignatureCombiner, SigningNonce};
use crate::verify::{VerificationOutcome, Verifier};
use crate::{
    CombinedSignature, KeyGenerationResult, PartialSignature, Party, Result, SchemeParameters,
};

/// The operations a threshold signature scheme offers.
///
/// This is the complete surface: keys are split, shares sign, partial
/// signatures combine, signatures verify. No operation takes more than one
/// party's share.
pub trait ThresholdScheme {
    fn parameters(&self) -> SchemeParameters;

    fn generate_keys(&self, rng: &mut dyn RandomSource) -> Result<KeyGenerationResult>;

    fn sign(
        &self,
        message: &[u8],
        party: &Party,
        session_id: &str,
        nonce: &SigningNonce,
    ) -> Result<PartialSignature>;

    fn combine(&self, message: &[u8], signatures: &[PartialSignature])
        -> Result<CombinedSignature>;

    fn verify(&self, signature: &CombinedSignature, public_key: &[u8]) -> VerificationOutcome;
}

/// Threshold ECDSA bound to a curve, a clock and one set of parameters
#[derive(Debug, Clone)]
pub struct ThresholdEcdsa<C = Secp256k1, K = SystemClock> {
    curve: C,
    clock: K,
    params: SchemeParameters,
}

impl ThresholdEcdsa {
    /// secp256k1 with the system clock
    pub fn new(params: SchemeParameters) -> Result<Self> {
        Self::with_parts(Secp256k1, SystemClock, params)
    }
}

impl<C: CurveContext, K: Clock> ThresholdEcdsa<C, K> {
    pub fn with_parts(curve: C, clock: K, params: SchemeParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            curve,
            clock,
            params,
        })
    }

    pub fn curve(&self) -> &C {
        &self.curve
    }

    /// Sign for several parties at once under one nonce
    pub fn sign_many(
        &self,
        message: &[u8],
        parties: &[&Party],
        session_id: &str,
        nonce: &SigningNonce,
    ) -> Result<Vec<PartialSignature>> {
        PartialSigner::new(&self.curve, &self.clock).sign_many(message, parties, session_id, nonce)
    }
}

impl<C: CurveContext, K: Clock> ThresholdScheme for ThresholdEcdsa<C, K> {
    fn parameters(&self) -> SchemeParameters {
        self.params
    }

    fn generate_keys(&self, rng: &mut dyn RandomSource) -> Result<KeyGenerationResult> {
        KeyGenerator::new(&self.curve, self.params)?.generate_keys(rng)
    }

    fn sign(
        &self,
        message: &[u8],
        party: &Party,
        session_id: &str,
        nonce: &SigningNonce,
    ) -> Result<PartialSignature> {
        PartialSigner::new(&self.curve, &self.clock).sign(message, party, session_id, nonce)
    }

    fn combine(
        &self,
        message: &[u8],
        signatures: &[PartialSignature],
    ) -> Result<CombinedSignature> {
        SignatureCombiner::new(&self.curve, self.params)?.combine(message, signatures)
    }

    fn verify(&self, signature: &CombinedSignature, public_key: &[u8]) -> VerificationOutcome {
        Verifier::new(&self.curve).verify(signature, public_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FixedClock;
    use crate::Error;
    use chrono::DateTime;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    #[test]
    fn test_scheme_round_trip() {
        let params = SchemeParameters::new(2, 4).unwrap();
        let clock = FixedClock(DateTime::from_timestamp(1_700_000_000, 0).unwrap());
        let scheme = ThresholdEcdsa::with_parts(Secp256k1, clock, params).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(3);

        let keys = scheme.generate_keys(&mut rng).unwrap();
        let nonce = SigningNonce::random(&mut rng).unwrap();
        let partials = vec![
            scheme.sign(b"m", keys.party(4).unwrap(), "s", &nonce).unwrap(),
            scheme.sign(b"m", keys.party(2).unwrap(), "s", &nonce).unwrap(),
        ];
        assert_eq!(partials[0].timestamp, clock.0);

        let signature = scheme.combine(b"m", &partials).unwrap();
        assert!(scheme.verify(&signature, &keys.encoded_public_key()).valid);
    }

    #[test]
    fn test_scheme_rejects_bad_parameters() {
        let params = SchemeParameters {
            threshold: 3,
            total_parties: 2,
        };
        assert!(matches!(
            ThresholdEcdsa::new(params),
            Err(Error::InvalidConfig(_))
        ));
    }
}
