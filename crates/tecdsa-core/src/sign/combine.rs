//! Combining partial signatures into an ECDSA signature

use crate::curve::CurveContext;
use crate::math::{lagrange_at_zero, normalize_s};
use crate::{CombinedSignature, Error, PartialSignature, PartyId, Result, SchemeParameters};
use k256::Scalar;
use std::collections::HashSet;
use subtle::ConstantTimeEq;
use tracing::{info, instrument, warn};

/// Validates partial signatures and interpolates them into `(r, s)`.
///
/// Only public values are touched: each `s_i` already hides its share
/// behind the nonce, and the Lagrange weights depend on party ids alone.
pub struct SignatureCombiner<'a, C: CurveContext + ?Sized> {
    curve: &'a C,
    params: SchemeParameters,
}

impl<'a, C: CurveContext + ?Sized> SignatureCombiner<'a, C> {
    /// Create a combiner for validated parameters
    pub fn new(curve: &'a C, params: SchemeParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { curve, params })
    }

    /// Combine partial signatures over `message`.
    ///
    /// Checks, in order: at least `threshold` signatures, one common `r`,
    /// every party id within the key set, at least `threshold` distinct
    /// ids, then one common session and message. The first occurrence of
    /// each id, in input order, is used until `threshold` are collected;
    /// later duplicates and extras are ignored.
    #[instrument(skip_all, fields(threshold = self.params.threshold, count = signatures.len()))]
    pub fn combine(
        &self,
        message: &[u8],
        signatures: &[PartialSignature],
    ) -> Result<CombinedSignature> {
        let threshold = self.params.threshold;

        if signatures.len() < threshold {
            warn!("Not enough partial signatures");
            return Err(Error::InsufficientSignatures {
                required: threshold,
                actual: signatures.len(),
            });
        }

        let first = &signatures[0];

        if let Some(odd) = signatures.iter().find(|sig| sig.r != first.r) {
            warn!(party_id = odd.party_id, "Partial signature under a different nonce");
            return Err(Error::NonceMismatch {
                party_id: odd.party_id,
            });
        }

        if let Some(foreign) = signatures
            .iter()
            .find(|sig| !self.params.contains(sig.party_id))
        {
            warn!(party_id = foreign.party_id, "Partial signature from unknown party");
            return Err(Error::UnknownParty {
                party_id: foreign.party_id,
                total_parties: self.params.total_parties,
            });
        }

        let distinct: HashSet<PartyId> = signatures.iter().map(|sig| sig.party_id).collect();
        if distinct.len() < threshold {
            warn!(distinct = distinct.len(), "Not enough distinct parties");
            return Err(Error::InsufficientUniqueParties {
                required: threshold,
                actual: distinct.len(),
            });
        }

        if let Some(other) = signatures
            .iter()
            .find(|sig| sig.session_id != first.session_id)
        {
            warn!(party_id = other.party_id, "Partial signature from another session");
            return Err(Error::SessionMismatch {
                party_id: other.party_id,
            });
        }

        let message_hash = self.curve.hash(message);
        if let Some(other) = signatures
            .iter()
            .find(|sig| !bool::from(sig.message_hash.as_slice().ct_eq(message_hash.as_slice())))
        {
            warn!(party_id = other.party_id, "Partial signature over another message");
            return Err(Error::MessageMismatch {
                party_id: other.party_id,
            });
        }

        let selected = select_first_unique(signatures, threshold);
        let participating_parties: Vec<PartyId> =
            selected.iter().map(|sig| sig.party_id).collect();

        let mut s = Scalar::ZERO;
        for sig in &selected {
            let lambda = lagrange_at_zero(sig.party_id, &participating_parties)?;
            s += lambda * sig.si;
        }
        let s = normalize_s(s);

        if bool::from(s.is_zero()) {
            return Err(Error::Crypto("combined s is zero".into()));
        }

        info!(
            participants = ?participating_parties,
            session_id = %first.session_id,
            "Partial signatures combined"
        );

        Ok(CombinedSignature {
            r: first.r,
            s,
            message: message.to_vec(),
            message_hash,
            participating_parties,
            session_id: first.session_id.clone(),
        })
    }
}

/// First occurrence of each party id, in input order, up to `threshold`.
fn select_first_unique(signatures: &[PartialSignature], threshold: usize) -> Vec<&PartialSignature> {
    let mut seen = HashSet::with_capacity(threshold);
    signatures
        .iter()
        .filter(|sig| seen.insert(sig.party_id))
        .take(threshold)
        .collect()
}
