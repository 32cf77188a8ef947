//! Error types for threshold ECDSA operations

use crate::PartyId;
use thiserror::Error;

/// Result type alias for threshold ECDSA operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating keys, signing or combining.
///
/// Messages never carry secret material: shares, nonces and the master
/// secret are only ever referred to by party id.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid scheme or session configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The randomness source failed to produce bytes
    #[error("Randomness source failed: {0}")]
    Randomness(String),

    /// Key generation aborted; no key material survives
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    /// Fewer partial signatures than the threshold
    #[error("Insufficient signatures: required {required}, got {actual}")]
    InsufficientSignatures { required: usize, actual: usize },

    /// A partial signature was produced under a different nonce
    #[error("Nonce mismatch: partial signature from party {party_id} carries a different r")]
    NonceMismatch { party_id: PartyId },

    /// A partial signature names a party outside the key set
    #[error("Unknown party {party_id}: expected an id in 1..={total_parties}")]
    UnknownParty {
        party_id: PartyId,
        total_parties: usize,
    },

    /// Enough partial signatures, but too few distinct parties
    #[error("Insufficient unique parties: required {required}, got {actual}")]
    InsufficientUniqueParties { required: usize, actual: usize },

    /// A partial signature belongs to a different signing session
    #[error("Session mismatch: partial signature from party {party_id} belongs to another session")]
    SessionMismatch { party_id: PartyId },

    /// A partial signature was computed over a different message
    #[error("Message mismatch: partial signature from party {party_id} covers another message")]
    MessageMismatch { party_id: PartyId },

    /// The signing nonce is unusable
    #[error("Invalid nonce: {0}")]
    InvalidNonce(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Cryptographic operation failed
    #[error("Cryptographic error: {0}")]
    Crypto(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        Error::Deserialization(e.to_string())
    }
}
