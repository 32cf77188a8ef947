//! Shamir polynomial over the scalar field

use crate::math::{party_scalar, SecretScalar};
use crate::ports::RandomSource;
use crate::{PartyId, Result};
use k256::Scalar;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Polynomial `f(x) = c_0 + c_1 x + ... + c_{t-1} x^{t-1}` with the secret
/// in `c_0`. Coefficients are zeroed on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Polynomial {
    coefficients: Vec<Scalar>,
}

impl Polynomial {
    /// Extend `secret` to a random polynomial of degree `threshold - 1`.
    ///
    /// If the random source fails part way, the coefficients drawn so far
    /// are zeroed along with the partially built polynomial.
    pub fn extend_random<R: RandomSource + ?Sized>(
        secret: &SecretScalar,
        threshold: usize,
        rng: &mut R,
    ) -> Result<Self> {
        // capacity is fixed up front so the vector never reallocates and
        // leaves stale copies behind
        let mut polynomial = Self {
            coefficients: Vec::with_capacity(threshold),
        };
        polynomial.coefficients.push(*secret.expose());
        for _ in 1..threshold {
            let coefficient = rng.random_scalar()?;
            polynomial.coefficients.push(coefficient);
        }
        Ok(polynomial)
    }

    /// Degree of the polynomial, `threshold - 1`
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// `Σ c_i * x^i mod n`, accumulating powers of `x` one step at a time.
    pub fn evaluate(&self, x: PartyId) -> SecretScalar {
        let x_scalar = party_scalar(x);
        let mut result = SecretScalar::zero();
        let mut x_power = Scalar::ONE;

        for coefficient in &self.coefficients {
            *result.expose_mut() += *coefficient * x_power;
            x_power *= x_scalar;
        }

        result
    }

    #[cfg(test)]
    pub(crate) fn from_coefficients(coefficients: Vec<Scalar>) -> Self {
        Self { coefficients }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::testing::{FailingRng, ScriptedRng};
    use crate::Error;

    #[test]
    fn test_evaluate() {
        // f(x) = 7 + 3x + 2x^2
        let poly = Polynomial::from_coefficients(vec![
            Scalar::from(7u64),
            Scalar::from(3u64),
            Scalar::from(2u64),
        ]);
        assert_eq!(*poly.evaluate(1).expose(), Scalar::from(12u64));
        assert_eq!(*poly.evaluate(2).expose(), Scalar::from(21u64));
        assert_eq!(*poly.evaluate(0).expose(), Scalar::from(7u64));
    }

    #[test]
    fn test_evaluate_reduces_mod_order() {
        // f(x) = (n - 1) + (n - 1)x, f(1) = n - 2
        let poly = Polynomial::from_coefficients(vec![-Scalar::ONE, -Scalar::ONE]);
        assert_eq!(*poly.evaluate(1).expose(), -Scalar::from(2u64));
    }

    #[test]
    fn test_extend_random_degree_and_constant() {
        let secret = SecretScalar::new(Scalar::from(5u64));
        let mut rng = ScriptedRng::from_values(&[4, 9]);
        let poly = Polynomial::extend_random(&secret, 3, &mut rng).unwrap();

        assert_eq!(poly.degree(), 2);
        assert_eq!(*poly.evaluate(0).expose(), Scalar::from(5u64));
        // 5 + 4*2 + 9*4
        assert_eq!(*poly.evaluate(2).expose(), Scalar::from(49u64));
    }

    #[test]
    fn test_extend_random_propagates_rng_failure() {
        let secret = SecretScalar::new(Scalar::from(5u64));
        let result = Polynomial::extend_random(&secret, 3, &mut FailingRng);
        assert!(matches!(result, Err(Error::Randomness(_))));
    }

    #[test]
    fn test_zeroize_clears_coefficients() {
        let mut poly =
            Polynomial::from_coefficients(vec![Scalar::from(5u64), Scalar::from(6u64)]);
        poly.zeroize();
        assert_eq!(poly.degree(), 0);
        assert!(poly.coefficients.is_empty());
    }
}
