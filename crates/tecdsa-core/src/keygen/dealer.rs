//! Trusted-dealer key generation

use super::Polynomial;
use crate::curve::CurveContext;
use crate::math::SecretScalar;
use crate::ports::RandomSource;
use crate::{Error, KeyGenerationResult, Party, PublicKey, Result, SchemeParameters};
use tracing::{debug, info, instrument};

/// Splits a freshly drawn master secret into `total_parties` shares.
pub struct KeyGenerator<'a, C: CurveContext + ?Sized> {
    curve: &'a C,
    params: SchemeParameters,
}

impl<'a, C: CurveContext + ?Sized> KeyGenerator<'a, C> {
    /// Create a key generator for validated parameters
    pub fn new(curve: &'a C, params: SchemeParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { curve, params })
    }

    /// Run one key generation.
    ///
    /// The master secret and the polynomial live only inside this call and
    /// are zeroed before it returns, on success and on failure. The only
    /// failure is the random source giving out, reported as
    /// [`Error::KeyGeneration`].
    #[instrument(skip_all, fields(threshold = self.params.threshold, total_parties = self.params.total_parties))]
    pub fn generate_keys<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<KeyGenerationResult> {
        info!("Starting key generation");

        let master = SecretScalar::new(rng.random_scalar().map_err(key_generation_error)?);

        let public_point = self
            .curve
            .scalar_multiply(&self.curve.base_point(), master.expose());
        let public_key = PublicKey::from_affine(public_point.to_affine())
            .map_err(|_| Error::KeyGeneration("public key is the identity".into()))?;

        debug!("Drawing polynomial coefficients");
        let polynomial = Polynomial::extend_random(&master, self.params.threshold, rng)
            .map_err(key_generation_error)?;
        drop(master);

        let parties: Vec<Party> = (1..=self.params.total_parties)
            .map(|id| Party::new(id, polynomial.evaluate(id), public_key))
            .collect();
        drop(polynomial);

        let result = KeyGenerationResult::new(public_key, parties, self.params);

        info!(
            public_key = %hex::encode(result.encoded_public_key()),
            "Key generation completed"
        );

        Ok(result)
    }
}

fn key_generation_error(e: Error) -> Error {
    match e {
        Error::Randomness(reason) => Error::KeyGeneration(reason),
        other => other,
    }
}
