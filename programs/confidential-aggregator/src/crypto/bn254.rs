//! BN254 G1 group operations
//!
//! Thin wrappers over `solana_program::alt_bn128`. On-chain these are the
//! `sol_alt_bn128_group_op` syscalls; off-chain the same functions run a
//! native implementation, so tests exercise real curve arithmetic.
//!
//! # Encoding
//! - G1 point: 64 bytes = x (32 BE) || y (32 BE)
//! - Identity (point at infinity): 64 zero bytes
//! - Scalar: 32 bytes big-endian Fr

use anchor_lang::prelude::*;
use solana_program::alt_bn128::prelude::{alt_bn128_addition, alt_bn128_multiplication};

use crate::error::AggregatorError;

/// G1 point: 64 bytes (x: 32 bytes, y: 32 bytes), big-endian Fp coordinates
pub type G1Point = [u8; 64];

/// Scalar field element: 32 bytes, big-endian Fr
pub type Scalar = [u8; 32];

/// G1 identity point (point at infinity)
pub const G1_IDENTITY: G1Point = [0u8; 64];

/// G1 generator (1, 2)
pub const G1_GENERATOR: G1Point = {
    let mut point = [0u8; 64];
    point[31] = 1;
    point[63] = 2;
    point
};

/// BN254 base field modulus (Fp) - big-endian
pub const BN254_FP_MODULUS: [u8; 32] = [
    0x30, 0x64, 0x4e, 0x72, 0xe1, 0x31, 0xa0, 0x29,
    0xb8, 0x50, 0x45, 0xb6, 0x81, 0x81, 0x58, 0x5d,
    0x97, 0x81, 0x6a, 0x91, 0x68, 0x71, 0xca, 0x8d,
    0x3c, 0x20, 0x8c, 0x16, 0xd8, 0x7c, 0xfd, 0x47,
];

/// BN254 scalar field modulus (Fr) - big-endian
pub const BN254_FR_MODULUS: [u8; 32] = [
    0x30, 0x64, 0x4e, 0x72, 0xe1, 0x31, 0xa0, 0x29,
    0xb8, 0x50, 0x45, 0xb6, 0x81, 0x81, 0x58, 0x5d,
    0x28, 0x33, 0xe8, 0x48, 0x79, 0xb9, 0x70, 0x91,
    0x43, 0xe1, 0xf5, 0x93, 0xf0, 0x00, 0x00, 0x01,
];

#[inline]
pub fn is_g1_identity(point: &G1Point) -> bool {
    point.iter().all(|&b| b == 0)
}

/// G1 point addition: result = a + b
///
/// Rejects inputs that are not on the curve.
pub fn g1_add(a: &G1Point, b: &G1Point) -> Result<G1Point> {
    let mut input = [0u8; 128];
    input[0..64].copy_from_slice(a);
    input[64..128].copy_from_slice(b);

    let output = alt_bn128_addition(&input).map_err(|_| {
        msg!("G1 addition failed");
        error!(AggregatorError::InvalidCiphertext)
    })?;
    to_g1_point(&output)
}

/// G1 scalar multiplication: result = scalar * point
pub fn g1_mul(point: &G1Point, scalar: &Scalar) -> Result<G1Point> {
    require!(is_valid_scalar(scalar), AggregatorError::CryptographyError);

    let mut input = [0u8; 96];
    input[0..64].copy_from_slice(point);
    input[64..96].copy_from_slice(scalar);

    let output = alt_bn128_multiplication(&input).map_err(|_| {
        msg!("G1 scalar multiplication failed");
        error!(AggregatorError::CryptographyError)
    })?;
    to_g1_point(&output)
}

/// Negate a G1 point: (x, p - y). The identity negates to itself.
pub fn g1_negate(point: &G1Point) -> G1Point {
    if is_g1_identity(point) {
        return G1_IDENTITY;
    }

    let mut result = *point;
    let neg_y = fp_subtract(&BN254_FP_MODULUS, &point[32..64]);
    result[32..64].copy_from_slice(&neg_y);
    result
}

/// Validate that a G1 point is on the curve (identity included).
pub fn validate_g1_point(point: &G1Point) -> Result<()> {
    g1_add(point, &G1_IDENTITY).map(|_| ())
}

/// Check if a scalar is valid (< Fr modulus).
#[inline]
pub fn is_valid_scalar(scalar: &Scalar) -> bool {
    for i in 0..32 {
        if scalar[i] < BN254_FR_MODULUS[i] {
            return true;
        }
        if scalar[i] > BN254_FR_MODULUS[i] {
            return false;
        }
    }
    false
}

pub fn u64_to_scalar(value: u64) -> Scalar {
    let mut scalar = [0u8; 32];
    scalar[24..32].copy_from_slice(&value.to_be_bytes());
    scalar
}

fn to_g1_point(bytes: &[u8]) -> Result<G1Point> {
    require!(bytes.len() == 64, AggregatorError::CryptographyError);
    let mut point = G1_IDENTITY;
    point.copy_from_slice(bytes);
    Ok(point)
}

/// a - b over 32-byte big-endian integers, assuming a >= b
fn fp_subtract(a: &[u8; 32], b: &[u8]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow: u16 = 0;

    for i in (0..32).rev() {
        let diff = (a[i] as u16)
            .wrapping_sub(b[i] as u16)
            .wrapping_sub(borrow);
        result[i] = diff as u8;
        borrow = if diff > 255 { 1 } else { 0 };
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_is_on_curve() {
        assert!(validate_g1_point(&G1_GENERATOR).is_ok());
        assert!(validate_g1_point(&G1_IDENTITY).is_ok());
    }

    #[test]
    fn off_curve_point_is_rejected() {
        let mut point = G1_GENERATOR;
        point[63] = 3;
        assert!(validate_g1_point(&point).is_err());
    }

    #[test]
    fn add_matches_mul() {
        let two_g = g1_add(&G1_GENERATOR, &G1_GENERATOR).unwrap();
        assert_eq!(two_g, g1_mul(&G1_GENERATOR, &u64_to_scalar(2)).unwrap());

        let five_g = g1_mul(&G1_GENERATOR, &u64_to_scalar(5)).unwrap();
        let three_g = g1_mul(&G1_GENERATOR, &u64_to_scalar(3)).unwrap();
        assert_eq!(g1_add(&two_g, &three_g).unwrap(), five_g);
    }

    #[test]
    fn negation_cancels() {
        let point = g1_mul(&G1_GENERATOR, &u64_to_scalar(11)).unwrap();
        let sum = g1_add(&point, &g1_negate(&point)).unwrap();
        assert!(is_g1_identity(&sum));
        assert!(is_g1_identity(&g1_negate(&G1_IDENTITY)));
    }

    #[test]
    fn test_scalar_validation() {
        assert!(is_valid_scalar(&[0u8; 32]));
        assert!(!is_valid_scalar(&[0xFF; 32]));

        let mut below = BN254_FR_MODULUS;
        below[31] = below[31].wrapping_sub(1);
        assert!(is_valid_scalar(&below));

        assert!(!is_valid_scalar(&BN254_FR_MODULUS));
    }
}
