use anchor_lang::prelude::*;
use solana_program::keccak;

use crate::crypto::ciphertext::EncryptedValue;

/// Domain tag for ciphertext state fingerprints
pub const STATE_FINGERPRINT_DOMAIN: &[u8] = b"confidential-aggregator:state-fingerprint:v1";

/// Domain tag for gateway-assigned request ids
pub const REQUEST_ID_DOMAIN: &[u8] = b"confidential-aggregator:request-id:v1";

/// Compute keccak256 hash of data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    keccak::hash(data).to_bytes()
}

/// Compute keccak256 hash of multiple inputs (concatenated)
pub fn keccak256_concat(inputs: &[&[u8]]) -> [u8; 32] {
    keccak::hashv(inputs).to_bytes()
}

/// Fingerprint of a batch snapshot, bound to one deployed aggregator.
///
/// `program_id` and `config` together identify the deployment, so a
/// fingerprint taken here is meaningless to any other instance. The
/// contribution count is covered alongside the ciphertext: every accepted
/// contribution changes the fingerprint, even one that leaves the
/// accumulator point where it was.
pub fn state_fingerprint(
    program_id: &Pubkey,
    config: &Pubkey,
    snapshot: &EncryptedValue,
    contribution_count: u32,
) -> [u8; 32] {
    keccak256_concat(&[
        STATE_FINGERPRINT_DOMAIN,
        program_id.as_ref(),
        config.as_ref(),
        &snapshot.to_bytes(),
        &contribution_count.to_le_bytes(),
    ])
}

/// Opaque request id for the `nonce`-th dispatch through `gateway`
pub fn derive_request_id(gateway: &Pubkey, nonce: u64) -> [u8; 32] {
    keccak256_concat(&[REQUEST_ID_DOMAIN, gateway.as_ref(), &nonce.to_le_bytes()])
}

/// Ethereum-style address of an uncompressed secp256k1 public key (x || y)
pub fn eth_address(pubkey: &[u8; 64]) -> [u8; 20] {
    let hash = keccak256(pubkey);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..32]);
    address
}
