//! Signature verification
//!
//! A combined signature is an ordinary ECDSA signature, so verification
//! needs only the message, `(r, s)` and the public key. Failures are
//! reported as a [`VerificationOutcome`] value rather than an error.

use crate::curve::CurveContext;
use crate::{CombinedSignature, PartyId, SessionId};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

/// Why a signature was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationFailure {
    /// `message_hash` is not the digest of `message`
    HashMismatch,
    /// The public key could not be decoded
    InvalidPublicKey,
    /// `(r, s)` does not verify under the public key
    SignatureInvalid,
}

impl fmt::Display for VerificationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            VerificationFailure::HashMismatch => "message hash does not match message",
            VerificationFailure::InvalidPublicKey => "public key is malformed",
            VerificationFailure::SignatureInvalid => "signature does not verify",
        };
        f.write_str(reason)
    }
}

/// Result of verifying a combined signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<VerificationFailure>,
    pub session_id: SessionId,
    pub message_hash: String,
    pub participating_parties: Vec<PartyId>,
}

impl VerificationOutcome {
    fn new(signature: &CombinedSignature, reason: Option<VerificationFailure>) -> Self {
        Self {
            valid: reason.is_none(),
            reason,
            session_id: signature.session_id.clone(),
            message_hash: hex::encode(signature.message_hash),
            participating_parties: signature.participating_parties.clone(),
        }
    }
}

/// Checks combined signatures against an encoded public key.
pub struct Verifier<'a, C: CurveContext + ?Sized> {
    curve: &'a C,
}

impl<'a, C: CurveContext + ?Sized> Verifier<'a, C> {
    pub fn new(curve: &'a C) -> Self {
        Self { curve }
    }

    /// Verify `signature` under the SEC1 encoded `public_key`.
    ///
    /// Pure: repeated calls with the same inputs give the same outcome.
    pub fn verify(&self, signature: &CombinedSignature, public_key: &[u8]) -> VerificationOutcome {
        let digest = self.curve.hash(&signature.message);
        if !bool::from(digest.as_slice().ct_eq(signature.message_hash.as_slice())) {
            warn!(session_id = %signature.session_id, "Message hash mismatch");
            return VerificationOutcome::new(signature, Some(VerificationFailure::HashMismatch));
        }

        let key = match self.curve.decode_public_key(public_key) {
            Ok(key) => key,
            Err(_) => {
                warn!(session_id = %signature.session_id, "Malformed public key");
                return VerificationOutcome::new(
                    signature,
                    Some(VerificationFailure::InvalidPublicKey),
                );
            }
        };

        if !self.curve.verify(&key, &digest, &signature.r, &signature.s) {
            warn!(session_id = %signature.session_id, "Signature rejected");
            return VerificationOutcome::new(signature, Some(VerificationFailure::SignatureInvalid));
        }

        debug!(session_id = %signature.session_id, "Signature verified");
        VerificationOutcome::new(signature, None)
    }
}
