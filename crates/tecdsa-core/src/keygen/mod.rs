//! Key generation module
//!
//! A single dealer draws the master secret, publishes `G * secret`, and
//! hands each party one evaluation of a random degree `t - 1` polynomial.
//! Nothing in this crate interpolates shares back into the master secret.

mod dealer;
mod polynomial;

pub use dealer::KeyGenerator;
pub use polynomial::Polynomial;
