//! # Threshold ECDSA Core
//!
//! Dealer-based t-of-n threshold ECDSA over secp256k1.
//!
//! This crate provides:
//! - Key generation: one dealer splits a fresh secret into Shamir shares
//! - Partial signing: each party signs with its share under a shared nonce
//! - Combination: Lagrange interpolation of partial signatures into `(r, s)`
//! - Verification: standard ECDSA verification of the combined signature
//!
//! ## Protocol Overview
//!
//! With shares `x_i = f(i)` of the secret `x = f(0)` and a shared nonce `k`,
//! party `i` publishes `s_i = k^-1 (e + r x_i)`. Since the `s_i` are points
//! on a degree `t - 1` polynomial with value `k^-1 (e + r x)` at zero, any
//! `t` of them interpolate to the ordinary ECDSA `s`. The master secret is
//! never rebuilt.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tecdsa_core::{SchemeParameters, SigningNonce, ThresholdEcdsa, ThresholdScheme};
//!
//! let scheme = ThresholdEcdsa::new(SchemeParameters::new(2, 3)?)?;
//! let keys = scheme.generate_keys(&mut OsRng)?;
//!
//! let nonce = SigningNonce::random(&mut OsRng)?;
//! let partials = vec![
//!     scheme.sign(message, keys.party(1).unwrap(), "session", &nonce)?,
//!     scheme.sign(message, keys.party(3).unwrap(), "session", &nonce)?,
//! ];
//! let signature = scheme.combine(message, &partials)?;
//! assert!(scheme.verify(&signature, &keys.encoded_public_key()).valid);
//! ```

pub mod audit;
pub mod curve;
pub mod error;
pub mod keygen;
pub mod math;
pub mod ports;
pub mod scheme;
pub mod sign;
pub mod types;
pub mod verify;

pub use audit::{audit, AuditReport};
pub use curve::{CurveContext, Secp256k1};
pub use error::{Error, Result};
pub use ports::{Clock, FixedClock, RandomSource, SystemClock};
pub use scheme::{ThresholdEcdsa, ThresholdScheme};
pub use sign::SigningNonce;
pub use types::{
    CombinedSignature, KeyGenerationResult, MessageHash, PartialSignature, Party, PartyId,
    PublicKey, SchemeParameters, SessionId,
};
pub use verify::{VerificationFailure, VerificationOutcome};

/// Protocol version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default threshold for a 3-party setup
pub const DEFAULT_THRESHOLD: usize = 2;

/// Default number of parties
pub const DEFAULT_PARTIES: usize = 3;
