//! The elliptic-curve group capability
//!
//! Every component receives a [`CurveContext`] explicitly rather than
//! reaching for a module-level curve. The only implementation is
//! [`Secp256k1`], backed by `k256`.

use crate::{Error, MessageHash, PublicKey, Result};
use elliptic_curve::{bigint::U256, sec1::ToEncodedPoint, Curve};
use k256::{
    ecdsa::{signature::hazmat::PrehashVerifier, Signature, VerifyingKey},
    ProjectivePoint, Scalar,
};
use sha2::{Digest, Sha256};

/// Group operations, hashing and standard ECDSA verification.
pub trait CurveContext: Send + Sync {
    /// Order `n` of the group generated by the base point
    fn group_order(&self) -> U256;

    /// The generator `G`
    fn base_point(&self) -> ProjectivePoint;

    /// `k * P`
    fn scalar_multiply(&self, point: &ProjectivePoint, scalar: &Scalar) -> ProjectivePoint;

    /// Fixed-width message digest
    fn hash(&self, message: &[u8]) -> MessageHash;

    /// SEC1 compressed encoding of a public key
    fn encode_public_key(&self, key: &PublicKey) -> Vec<u8>;

    /// Parse a SEC1 encoded public key
    fn decode_public_key(&self, bytes: &[u8]) -> Result<PublicKey>;

    /// Standard (single key) ECDSA verification of `(r, s)` over a digest
    fn verify(&self, key: &PublicKey, digest: &MessageHash, r: &Scalar, s: &Scalar) -> bool;
}

/// secp256k1 with SHA-256
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1;

impl CurveContext for Secp256k1 {
    fn group_order(&self) -> U256 {
        k256::Secp256k1::ORDER
    }

    fn base_point(&self) -> ProjectivePoint {
        ProjectivePoint::GENERATOR
    }

    fn scalar_multiply(&self, point: &ProjectivePoint, scalar: &Scalar) -> ProjectivePoint {
        *point * *scalar
    }

    fn hash(&self, message: &[u8]) -> MessageHash {
        Sha256::digest(message).into()
    }

    fn encode_public_key(&self, key: &PublicKey) -> Vec<u8> {
        key.to_encoded_point(true).as_bytes().to_vec()
    }

    fn decode_public_key(&self, bytes: &[u8]) -> Result<PublicKey> {
        PublicKey::from_sec1_bytes(bytes)
            .map_err(|_| Error::Deserialization("malformed SEC1 public key".into()))
    }

    fn verify(&self, key: &PublicKey, digest: &MessageHash, r: &Scalar, s: &Scalar) -> bool {
        let signature = match Signature::from_scalars(r.to_bytes(), s.to_bytes()) {
            Ok(signature) => signature,
            Err(_) => return false,
        };
        VerifyingKey::from(*key)
            .verify_prehash(digest, &signature)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::{signature::hazmat::PrehashSigner, SigningKey};

    #[test]
    fn test_group_order_matches_scalar_field() {
        // n - 1 is the largest scalar
        let max = -Scalar::ONE;
        let order = Secp256k1.group_order();
        let expected = U256::from_be_slice(&max.to_bytes()).wrapping_add(&U256::ONE);
        assert_eq!(order, expected);
    }

    #[test]
    fn test_public_key_encoding() {
        let curve = Secp256k1;
        let point = curve.scalar_multiply(&curve.base_point(), &Scalar::from(9u64));
        let key = PublicKey::from_affine(point.to_affine()).unwrap();

        let encoded = curve.encode_public_key(&key);
        assert_eq!(encoded.len(), 33);
        assert_eq!(curve.decode_public_key(&encoded).unwrap(), key);
        assert!(curve.decode_public_key(&encoded[..20]).is_err());
    }

    #[test]
    fn test_verify_agrees_with_k256_signer() {
        let curve = Secp256k1;
        let signing_key = SigningKey::from_bytes(&Scalar::from(1234u64).to_bytes()).unwrap();
        let digest = curve.hash(b"hello");
        let signature: Signature = signing_key.sign_prehash(&digest).unwrap();
        let (r, s) = signature.split_scalars();
        let (r, s) = (*r, *s);
        let key = PublicKey::from(signing_key.verifying_key());

        assert!(curve.verify(&key, &digest, &r, &s));
        assert!(!curve.verify(&key, &curve.hash(b"other"), &r, &s));
        assert!(!curve.verify(&key, &digest, &Scalar::ZERO, &s));
    }
}
