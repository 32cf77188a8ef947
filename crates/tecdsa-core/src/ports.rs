//! Injected capabilities: randomness and wall-clock time

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use elliptic_curve::{Field, PrimeField};
use k256::Scalar;
use rand_core::CryptoRngCore;
use zeroize::Zeroize;

/// Source of uniformly distributed, non-zero scalars.
pub trait RandomSource {
    /// Draw a scalar uniformly from `[1, n)`.
    fn random_scalar(&mut self) -> Result<Scalar>;
}

/// Draws allowed per scalar; an honest RNG is rejected with probability
/// about 2^-128 per draw.
const MAX_SAMPLING_ATTEMPTS: usize = 64;

/// Any cryptographic RNG is a random source.
///
/// Candidates are drawn as 32-byte strings and rejected unless they are a
/// canonical, non-zero encoding, which keeps the distribution uniform.
/// A failing RNG, or one that yields no acceptable candidate within
/// `MAX_SAMPLING_ATTEMPTS` draws, surfaces as [`Error::Randomness`].
impl<R: CryptoRngCore + ?Sized> RandomSource for R {
    fn random_scalar(&mut self) -> Result<Scalar> {
        let mut bytes = [0u8; 32];
        for _ in 0..MAX_SAMPLING_ATTEMPTS {
            if let Err(e) = self.try_fill_bytes(&mut bytes) {
                bytes.zeroize();
                return Err(Error::Randomness(e.to_string()));
            }
            let candidate = Option::<Scalar>::from(Scalar::from_repr(bytes.into()));
            if let Some(scalar) = candidate {
                if !bool::from(scalar.is_zero()) {
                    bytes.zeroize();
                    return Ok(scalar);
                }
            }
        }
        bytes.zeroize();
        Err(Error::Randomness("random source produced no valid scalar".into()))
    }
}

/// Source of timestamps for partial signatures.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
