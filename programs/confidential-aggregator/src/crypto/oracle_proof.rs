//! Oracle decryption proofs.
//!
//! A proof is a recoverable secp256k1 signature (64-byte `r || s` followed by
//! a recovery id) over [`result_digest`]. The digest binds the deployment, the
//! request id, the ciphertext fingerprint recorded at request time and the
//! cleartext, so a signature can authenticate exactly one decryption result.

use anchor_lang::prelude::*;
use solana_program::secp256k1_recover::secp256k1_recover;

use crate::crypto::keccak::{eth_address, keccak256_concat};
use crate::error::AggregatorError;

/// Domain tag for signed decryption results
pub const DECRYPTION_RESULT_DOMAIN: &[u8] = b"confidential-aggregator:decryption-result:v1";

/// Signature (64) + recovery id (1)
pub const ORACLE_PROOF_LEN: usize = 65;

/// Digest the oracle signs for a decryption result
pub fn result_digest(
    program_id: &Pubkey,
    config: &Pubkey,
    request_id: &[u8; 32],
    state_fingerprint: &[u8; 32],
    cleartext: &[u8],
) -> [u8; 32] {
    keccak256_concat(&[
        DECRYPTION_RESULT_DOMAIN,
        program_id.as_ref(),
        config.as_ref(),
        request_id,
        state_fingerprint,
        cleartext,
    ])
}

/// Recover the signer address of `proof` over `digest`.
pub fn recover_signer(digest: &[u8; 32], proof: &[u8]) -> Result<[u8; 20]> {
    require!(proof.len() == ORACLE_PROOF_LEN, AggregatorError::InvalidProof);

    // Accept both raw (0/1) and Ethereum-style (27/28) recovery ids
    let recovery_id = match proof[64] {
        id @ (0 | 1) => id,
        id @ (27 | 28) => id - 27,
        _ => return err!(AggregatorError::InvalidProof),
    };

    let pubkey = secp256k1_recover(digest, recovery_id, &proof[..64]).map_err(|_| {
        msg!("Oracle proof signature recovery failed");
        error!(AggregatorError::InvalidProof)
    })?;

    Ok(eth_address(&pubkey.to_bytes()))
}

/// Verify `proof` was produced by `expected_signer` over `digest`.
pub fn verify_oracle_proof(
    digest: &[u8; 32],
    proof: &[u8],
    expected_signer: &[u8; 20],
) -> Result<()> {
    let signer = recover_signer(digest, proof)?;
    require!(signer == *expected_signer, AggregatorError::InvalidProof);
    Ok(())
}
