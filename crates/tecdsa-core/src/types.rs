//! Core types for the threshold ECDSA scheme

use crate::audit::MIN_THRESHOLD;
use crate::math::SecretScalar;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use elliptic_curve::sec1::ToEncodedPoint;
use k256::{ecdsa, Scalar};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use k256::PublicKey;

/// Identifier of a party, `1..=total_parties`. Doubles as its share index.
pub type PartyId = usize;

/// Opaque signing-session identifier agreed out of band
pub type SessionId = String;

/// SHA-256 digest of a message
pub type MessageHash = [u8; 32];

/// Largest supported number of parties
pub const MAX_PARTIES: usize = 255;

/// Threshold parameters shared by every component of one key set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeParameters {
    /// Minimum number of parties needed to sign (t)
    pub threshold: usize,
    /// Number of parties holding a share (n)
    pub total_parties: usize,
}

impl SchemeParameters {
    /// Create validated parameters
    pub fn new(threshold: usize, total_parties: usize) -> Result<Self> {
        let params = Self {
            threshold,
            total_parties,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check `2 <= threshold <= total_parties <= MAX_PARTIES`.
    ///
    /// Deserialized parameters bypass [`SchemeParameters::new`], so every
    /// component re-validates on construction.
    pub fn validate(&self) -> Result<()> {
        if self.threshold < MIN_THRESHOLD {
            return Err(Error::InvalidConfig(format!(
                "Threshold must be at least {}",
                MIN_THRESHOLD
            )));
        }
        if self.threshold > self.total_parties {
            return Err(Error::InvalidConfig(
                "Threshold cannot exceed number of parties".into(),
            ));
        }
        if self.total_parties > MAX_PARTIES {
            return Err(Error::InvalidConfig(format!(
                "At most {} parties are supported",
                MAX_PARTIES
            )));
        }
        Ok(())
    }

    /// Whether `id` names a party of this key set
    pub fn contains(&self, id: PartyId) -> bool {
        (1..=self.total_parties).contains(&id)
    }
}

/// One party's view of the key: its share and the joint public key.
///
/// The share is zeroed on drop and never printed.
#[derive(Clone)]
pub struct Party {
    id: PartyId,
    private_key_share: SecretScalar,
    public_key: PublicKey,
    share_index: PartyId,
}

impl Party {
    pub(crate) fn new(id: PartyId, private_key_share: SecretScalar, public_key: PublicKey) -> Self {
        Self {
            id,
            private_key_share,
            public_key,
            share_index: id,
        }
    }

    /// This party's id
    pub fn id(&self) -> PartyId {
        self.id
    }

    /// Evaluation point of this party's share; equal to its id
    pub fn share_index(&self) -> PartyId {
        self.share_index
    }

    /// The joint public key
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub(crate) fn share(&self) -> &Scalar {
        self.private_key_share.expose()
    }
}

impl fmt::Debug for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Party")
            .field("id", &self.id)
            .field("share_index", &self.share_index)
            .field("private_key_share", &self.private_key_share)
            .finish_non_exhaustive()
    }
}

/// Output of one key-generation run
#[derive(Debug, Clone)]
pub struct KeyGenerationResult {
    public_key: PublicKey,
    parties: Vec<Party>,
    threshold: usize,
    total_parties: usize,
}

impl KeyGenerationResult {
    pub(crate) fn new(public_key: PublicKey, parties: Vec<Party>, params: SchemeParameters) -> Self {
        Self {
            public_key,
            parties,
            threshold: params.threshold,
            total_parties: params.total_parties,
        }
    }

    /// The joint public key
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// SEC1 compressed public key bytes
    pub fn encoded_public_key(&self) -> Vec<u8> {
        self.public_key.to_encoded_point(true).as_bytes().to_vec()
    }

    /// All parties, ordered by id
    pub fn parties(&self) -> &[Party] {
        &self.parties
    }

    /// Look up a party by id
    pub fn party(&self, id: PartyId) -> Option<&Party> {
        id.checked_sub(1).and_then(|index| self.parties.get(index))
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn total_parties(&self) -> usize {
        self.total_parties
    }

    pub fn parameters(&self) -> SchemeParameters {
        SchemeParameters {
            threshold: self.threshold,
            total_parties: self.total_parties,
        }
    }
}

/// One party's contribution `⟨party_id, r, s_i⟩` to a signature.
///
/// Not a signature by itself; only a threshold of these, combined, verify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialSignature {
    pub party_id: PartyId,
    pub session_id: SessionId,
    #[serde(with = "hex_scalar")]
    pub r: Scalar,
    #[serde(with = "hex_scalar")]
    pub si: Scalar,
    #[serde(with = "hex_digest")]
    pub message_hash: MessageHash,
    #[serde(with = "hex_bytes")]
    pub message: Vec<u8>,
    pub timestamp: DateTime<Utc>,
}

/// A threshold signature, structurally a standard ECDSA `(r, s)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedSignature {
    #[serde(with = "hex_scalar")]
    pub r: Scalar,
    #[serde(with = "hex_scalar")]
    pub s: Scalar,
    #[serde(with = "hex_bytes")]
    pub message: Vec<u8>,
    #[serde(with = "hex_digest")]
    pub message_hash: MessageHash,
    pub participating_parties: Vec<PartyId>,
    pub session_id: SessionId,
}

impl CombinedSignature {
    /// Convert to a `k256` ECDSA signature
    pub fn to_ecdsa(&self) -> Result<ecdsa::Signature> {
        ecdsa::Signature::from_scalars(self.r.to_bytes(), self.s.to_bytes())
            .map_err(|e| Error::Crypto(e.to_string()))
    }

    /// Convert to DER format
    pub fn to_der(&self) -> Result<Vec<u8>> {
        Ok(self.to_ecdsa()?.to_der().as_bytes().to_vec())
    }

    /// Convert to bytes (r || s)
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&self.r.to_bytes());
        bytes[32..].copy_from_slice(&self.s.to_bytes());
        bytes
    }
}

/// Scalars as fixed-width hex, rejecting values not below the order
mod hex_scalar {
    use crate::math::{scalar_from_hex, scalar_to_hex};
    use k256::Scalar;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(scalar: &Scalar, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&scalar_to_hex(scalar))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Scalar, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        scalar_from_hex(&encoded).map_err(serde::de::Error::custom)
    }
}

mod hex_digest {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(digest: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(digest))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        hex::decode(encoded)
            .map_err(<D::Error as serde::de::Error>::custom)?
            .try_into()
            .map_err(|_| serde::de::Error::custom("Invalid digest length"))
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        hex::decode(encoded).map_err(serde::de::Error::custom)
    }
}
