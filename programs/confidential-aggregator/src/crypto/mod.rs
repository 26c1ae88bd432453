//! Cryptographic primitives for the confidential aggregator
//!
//! - **BN254 G1**: group operations via Solana's alt_bn128 precompile
//! - **EncryptedValue**: additively homomorphic ElGamal ciphertexts
//! - **ElGamal tooling**: client/oracle side encryption and decryption
//! - **Keccak**: state fingerprints and request ids
//! - **Oracle proofs**: secp256k1 signatures over decryption results
//!
//! # Security Notes
//!
//! - Ciphertext points are validated on the curve before they are accumulated
//! - Every digest is domain-separated and bound to the deployment

pub mod bn254;
pub mod ciphertext;
pub mod elgamal;
pub mod keccak;
pub mod oracle_proof;

pub use bn254::{
    g1_add, g1_mul, g1_negate, is_g1_identity, u64_to_scalar, validate_g1_point, G1Point, Scalar,
    G1_GENERATOR, G1_IDENTITY,
};
pub use ciphertext::EncryptedValue;
pub use elgamal::{encrypt, ElGamalKeypair};
pub use keccak::{
    derive_request_id, eth_address, keccak256, keccak256_concat, state_fingerprint,
};
pub use oracle_proof::{
    recover_signer, result_digest, verify_oracle_proof, ORACLE_PROOF_LEN,
};
