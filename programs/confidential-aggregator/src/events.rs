use anchor_lang::prelude::*;

use crate::crypto::EncryptedValue;

// =========================================================================
// ACCESS & SAFETY POLICY EVENTS
// =========================================================================

#[event]
pub struct AggregatorInitialized {
    pub config: Pubkey,
    pub admin: Pubkey,
    pub gateway: Pubkey,
    pub oracle_authority: Pubkey,
    pub oracle_signer: [u8; 20],
    pub cooldown_seconds: u64,
    pub timestamp: i64,
}

#[event]
pub struct ProviderAdded {
    pub config: Pubkey,
    pub provider: Pubkey,
    pub admin: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct ProviderRemoved {
    pub config: Pubkey,
    pub provider: Pubkey,
    pub admin: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct Paused {
    pub config: Pubkey,
    pub admin: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct Unpaused {
    pub config: Pubkey,
    pub admin: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct CooldownUpdated {
    pub config: Pubkey,
    pub admin: Pubkey,
    pub previous_seconds: u64,
    pub cooldown_seconds: u64,
    pub timestamp: i64,
}

#[event]
pub struct AdminTransferred {
    pub config: Pubkey,
    pub previous_admin: Pubkey,
    pub new_admin: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct OracleUpdated {
    pub config: Pubkey,
    pub admin: Pubkey,
    pub oracle_authority: Pubkey,
    pub oracle_signer: [u8; 20],
    pub timestamp: i64,
}

// =========================================================================
// BATCH EVENTS
// =========================================================================

#[event]
pub struct BatchOpened {
    pub config: Pubkey,
    pub batch_id: u64,
    pub admin: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct BatchClosed {
    pub config: Pubkey,
    pub batch_id: u64,
    pub contribution_count: u32,
    pub admin: Pubkey,
    pub timestamp: i64,
}

/// Carries the raw ciphertext so indexers can rebuild the accumulator.
#[event]
pub struct ResultSubmitted {
    pub config: Pubkey,
    pub batch_id: u64,
    pub provider: Pubkey,
    /// Zero-based position within the batch
    pub contribution_index: u32,
    pub ciphertext: EncryptedValue,
    pub timestamp: i64,
}

// =========================================================================
// DECRYPTION EVENTS
// =========================================================================

#[event]
pub struct DecryptionRequested {
    pub config: Pubkey,
    pub request_id: [u8; 32],
    pub batch_id: u64,
    pub state_fingerprint: [u8; 32],
    pub requester: Pubkey,
    pub timestamp: i64,
}

/// Outbound message to the oracle: decrypt `ciphertext` and answer
/// `request_id` through `on_oracle_callback` on `callback_program`.
#[event]
pub struct DecryptionDispatched {
    pub config: Pubkey,
    pub gateway: Pubkey,
    pub request_id: [u8; 32],
    pub ciphertext: EncryptedValue,
    pub callback_program: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct DecryptionCompleted {
    pub config: Pubkey,
    pub request_id: [u8; 32],
    pub batch_id: u64,
    pub value: u64,
    pub oracle_authority: Pubkey,
    pub timestamp: i64,
}
