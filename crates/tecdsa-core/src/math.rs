//! Scalar arithmetic modulo the secp256k1 group order
//!
//! `k256::Scalar` keeps every value reduced, so the helpers here only deal
//! with conversions into the scalar field, low-s normalization and the
//! Lagrange weights used when combining partial signatures.

use crate::{Error, PartyId, Result};
use elliptic_curve::{
    bigint::U256, ops::Reduce, point::AffineCoordinates, scalar::IsHigh, Field, PrimeField,
};
use k256::{FieldBytes, ProjectivePoint, Scalar};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A secret scalar that is overwritten with zero when it goes out of scope.
///
/// Used for the master secret, party shares, nonces and any intermediate
/// that would reveal one of them. Dropping happens on every exit path, so
/// an early `?` return leaves no secret residue behind.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretScalar(Scalar);

impl SecretScalar {
    /// Wrap a scalar
    pub fn new(value: Scalar) -> Self {
        Self(value)
    }

    /// The zero scalar, used as an accumulator
    pub fn zero() -> Self {
        Self(Scalar::ZERO)
    }

    /// Borrow the underlying scalar
    pub fn expose(&self) -> &Scalar {
        &self.0
    }

    pub(crate) fn expose_mut(&mut self) -> &mut Scalar {
        &mut self.0
    }

    /// Whether the value is zero
    pub fn is_zero(&self) -> bool {
        bool::from(self.0.is_zero())
    }
}

impl fmt::Debug for SecretScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretScalar(<redacted>)")
    }
}

/// Interpret 32 big-endian bytes as a scalar, reducing modulo the order.
pub fn reduce_bytes(bytes: &[u8; 32]) -> Scalar {
    <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(*bytes))
}

/// Parse a canonical (already reduced) scalar encoding.
pub fn scalar_from_bytes(bytes: &[u8; 32]) -> Result<Scalar> {
    Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(*bytes)))
        .ok_or_else(|| Error::Deserialization("scalar is not below the group order".into()))
}

/// Fixed-width (64 hex digits, zero padded) encoding of a scalar.
pub fn scalar_to_hex(scalar: &Scalar) -> String {
    hex::encode(scalar.to_bytes())
}

/// Parse a fixed-width hex scalar.
pub fn scalar_from_hex(encoded: &str) -> Result<Scalar> {
    let bytes: [u8; 32] = hex::decode(encoded)?
        .try_into()
        .map_err(|_| Error::Deserialization("scalar must be 32 bytes".into()))?;
    scalar_from_bytes(&bytes)
}

/// The scalar representing a party's evaluation point.
pub fn party_scalar(id: PartyId) -> Scalar {
    Scalar::from(id as u64)
}

/// `R.x mod n`
pub fn x_coordinate(point: &ProjectivePoint) -> Scalar {
    let x = point.to_affine().x();
    <Scalar as Reduce<U256>>::reduce_bytes(&x)
}

/// Modular inverse, `None` for zero.
pub fn invert(scalar: &Scalar) -> Option<Scalar> {
    Option::from(scalar.invert())
}

/// Map `s` to the lower half of the group: `s > n/2` becomes `n - s`.
pub fn normalize_s(s: Scalar) -> Scalar {
    if bool::from(s.is_high()) {
        -s
    } else {
        s
    }
}

/// Lagrange weight of `party` for interpolation at `x = 0` over `set`.
///
/// `λ_i = Π_{j ≠ i} (-j) * (i - j)^-1`. Ids in `set` must be distinct.
pub fn lagrange_at_zero(party: PartyId, set: &[PartyId]) -> Result<Scalar> {
    let x_i = party_scalar(party);
    let mut numerator = Scalar::ONE;
    let mut denominator = Scalar::ONE;

    for &other in set {
        if other == party {
            continue;
        }
        let x_j = party_scalar(other);
        numerator *= -x_j;
        denominator *= x_i - x_j;
    }

    let inverse = invert(&denominator).ok_or_else(|| {
        Error::Crypto(format!("Lagrange denominator for party {} vanishes", party))
    })?;
    Ok(numerator * inverse)
}
