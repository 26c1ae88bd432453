//! Exponential ElGamal tooling for providers and oracle operators.
//!
//! Providers encrypt measurements under the oracle's public key before
//! submitting them; the oracle decrypts batch accumulators and recovers the
//! sum by a bounded discrete-log search. None of this runs inside the
//! program's instruction handlers.

use anchor_lang::prelude::*;

use crate::crypto::bn254::{
    g1_add, g1_mul, g1_negate, is_valid_scalar, u64_to_scalar, G1Point, Scalar, G1_GENERATOR,
    G1_IDENTITY,
};
use crate::crypto::ciphertext::EncryptedValue;
use crate::error::AggregatorError;

pub struct ElGamalKeypair {
    secret: Scalar,
    pub public: G1Point,
}

impl ElGamalKeypair {
    pub fn from_secret(secret: Scalar) -> Result<Self> {
        require!(
            is_valid_scalar(&secret) && secret != [0u8; 32],
            AggregatorError::CryptographyError
        );
        let public = g1_mul(&G1_GENERATOR, &secret)?;
        Ok(Self { secret, public })
    }

    /// Recover m from Enc(m), searching m in `0..=max_value`.
    ///
    /// Returns `None` when the plaintext lies outside the search range.
    pub fn decrypt(&self, ciphertext: &EncryptedValue, max_value: u64) -> Result<Option<u64>> {
        let shared = g1_mul(&ciphertext.c1, &self.secret)?;
        let message_point = g1_add(&ciphertext.c2, &g1_negate(&shared))?;

        let mut candidate = G1_IDENTITY;
        for m in 0..=max_value {
            if candidate == message_point {
                return Ok(Some(m));
            }
            candidate = g1_add(&candidate, &G1_GENERATOR)?;
        }
        Ok(None)
    }
}

/// Encrypt `value` under `public` with caller-supplied randomness `r`.
///
/// `r` must be a fresh, uniformly random non-zero scalar per ciphertext.
pub fn encrypt(public: &G1Point, value: u64, randomness: &Scalar) -> Result<EncryptedValue> {
    require!(
        is_valid_scalar(randomness) && *randomness != [0u8; 32],
        AggregatorError::CryptographyError
    );

    let c1 = g1_mul(&G1_GENERATOR, randomness)?;
    let message_point = g1_mul(&G1_GENERATOR, &u64_to_scalar(value))?;
    let mask = g1_mul(public, randomness)?;
    let c2 = g1_add(&message_point, &mask)?;

    Ok(EncryptedValue { c1, c2 })
}
