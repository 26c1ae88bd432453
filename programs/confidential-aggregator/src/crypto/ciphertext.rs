//! Additively homomorphic ciphertexts.
//!
//! An `EncryptedValue` is an exponential ElGamal ciphertext over BN254 G1:
//! `c1 = r·G`, `c2 = m·G + r·PK`. Adding two ciphertexts point-wise yields a
//! ciphertext of the sum of their plaintexts. The program only ever validates
//! and adds ciphertexts; decryption is the oracle's job.

use anchor_lang::prelude::*;

use crate::crypto::bn254::{g1_add, is_g1_identity, validate_g1_point, G1Point};
use crate::error::AggregatorError;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct EncryptedValue {
    /// Randomness commitment r·G
    pub c1: G1Point,
    /// Masked message m·G + r·PK
    pub c2: G1Point,
}

impl EncryptedValue {
    pub const LEN: usize = 64 + 64;

    /// Both components must be points on the curve, and `c1` must not be
    /// the identity: with r = 0 the message point sits in `c2` unmasked.
    pub fn validate(&self) -> Result<()> {
        require!(!is_g1_identity(&self.c1), AggregatorError::InvalidCiphertext);
        validate_g1_point(&self.c1)?;
        validate_g1_point(&self.c2)?;
        Ok(())
    }

    /// Homomorphic addition: Enc(a) + Enc(b) = Enc(a + b)
    pub fn add(&self, other: &EncryptedValue) -> Result<EncryptedValue> {
        Ok(EncryptedValue {
            c1: g1_add(&self.c1, &other.c1)?,
            c2: g1_add(&self.c2, &other.c2)?,
        })
    }

    /// `c1 || c2`
    pub fn to_bytes(&self) -> [u8; 128] {
        let mut out = [0u8; 128];
        out[..64].copy_from_slice(&self.c1);
        out[64..].copy_from_slice(&self.c2);
        out
    }
}
