//! Confidential Aggregator
//!
//! Authorized data providers submit individually encrypted measurements into
//! shared batches. The program adds them up homomorphically, never seeing a
//! single value, and learns only the cleartext *sum* of a batch through an
//! asynchronous decryption oracle whose answers are verified before use.
//!
//! # Features
//!
//! - Admin-managed provider allowlist with per-provider cooldowns
//! - Global pause for batch, submission and request traffic
//! - Exponential ElGamal ciphertexts over BN254, accumulated on-chain
//! - Decryption requests bound to a fingerprint of the submitted ciphertext
//! - Oracle callbacks authenticated by signer and by secp256k1 proof,
//!   with replay and state-drift protection
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      AggregatorConfig                       │
//! │  (admin, oracle authority/signer, pause, cooldown, batch id)│
//! └─────────────────────────────────────────────────────────────┘
//!          │                    │                      │
//!          ▼                    ▼                      ▼
//! ┌─────────────────┐  ┌─────────────────┐  ┌────────────────────┐
//! │ ProviderRole[N] │  │ Batch[N]        │  │ DecryptionGateway  │
//! │ (allowlist +    │  │ (accumulator)   │  │ (request ids,      │
//! │  cooldowns)     │  │                 │  │  outbound queue)   │
//! └─────────────────┘  └─────────────────┘  └────────────────────┘
//!                               │
//!                               ▼
//!                 ┌───────────────────────────────┐
//!                 │ DecryptionRequest[N]          │
//!                 │ (fingerprint, processed flag) │
//!                 └───────────────────────────────┘
//! ```
//!
//! # Decryption Flow
//! 1. `request_decryption` snapshots a batch accumulator, records its
//!    fingerprint and emits `DecryptionDispatched`
//! 2. the oracle decrypts off-chain and signs the result
//! 3. `on_oracle_callback` checks replay, batch binding, drift and the proof,
//!    then stores the sum and emits `DecryptionCompleted`

use anchor_lang::prelude::*;

pub mod crypto;
pub mod error;
pub mod events;
pub mod guards;
pub mod instructions;
pub mod oracle;
pub mod state;

pub use crypto::EncryptedValue;
pub use instructions::*;

declare_id!("GyjjtpCAbX68MeCruojnSvji2ooLadEoRotb2MXB4Et5");

#[program]
pub mod confidential_aggregator {
    use super::*;

    // =========================================================================
    // ACCESS & SAFETY POLICY
    // =========================================================================

    /// Create an aggregator. The creator becomes admin and first provider.
    ///
    /// # Arguments
    /// * `cooldown_seconds` - Minimum spacing between rate-limited actions
    /// * `oracle_authority` - Only signer allowed to deliver callbacks
    /// * `oracle_signer` - Address of the secp256k1 key signing results
    pub fn initialize(
        ctx: Context<Initialize>,
        cooldown_seconds: u64,
        oracle_authority: Pubkey,
        oracle_signer: [u8; 20],
    ) -> Result<()> {
        instructions::initialize::handler(ctx, cooldown_seconds, oracle_authority, oracle_signer)
    }

    /// Grant (or restore) a provider role (admin only)
    pub fn add_provider(ctx: Context<AddProvider>, provider: Pubkey) -> Result<()> {
        instructions::admin::providers::add_handler(ctx, provider)
    }

    /// Revoke a provider role (admin only)
    pub fn remove_provider(ctx: Context<RemoveProvider>, provider: Pubkey) -> Result<()> {
        instructions::admin::providers::remove_handler(ctx, provider)
    }

    /// Pause batch, submission and decryption-request traffic (admin only)
    pub fn pause(ctx: Context<PauseAggregator>) -> Result<()> {
        instructions::admin::pause::handler(ctx)
    }

    /// Resume normal operation (admin only)
    pub fn unpause(ctx: Context<UnpauseAggregator>) -> Result<()> {
        instructions::admin::unpause::handler(ctx)
    }

    /// Update the per-provider cooldown (admin only)
    pub fn set_cooldown(ctx: Context<SetCooldown>, cooldown_seconds: u64) -> Result<()> {
        instructions::admin::cooldown::handler(ctx, cooldown_seconds)
    }

    /// Hand the admin role to another key, effective immediately
    pub fn transfer_admin(ctx: Context<TransferAdmin>, new_admin: Pubkey) -> Result<()> {
        instructions::admin::authority::handler(ctx, new_admin)
    }

    /// Rotate the oracle authority and result-signing key (admin only)
    pub fn set_oracle(
        ctx: Context<SetOracle>,
        oracle_authority: Pubkey,
        oracle_signer: [u8; 20],
    ) -> Result<()> {
        instructions::admin::oracle_config::handler(ctx, oracle_authority, oracle_signer)
    }

    // =========================================================================
    // ENCRYPTED BATCH LEDGER
    // =========================================================================

    /// Open the next batch and make it the contribution target (admin only)
    pub fn open_batch(ctx: Context<OpenBatch>) -> Result<()> {
        instructions::batch::open_batch::handler(ctx)
    }

    /// Close the current batch (admin only)
    pub fn close_batch(ctx: Context<CloseBatch>) -> Result<()> {
        instructions::batch::close_batch::handler(ctx)
    }

    /// Add an encrypted measurement to the current batch
    ///
    /// # Arguments
    /// * `ciphertext` - ElGamal ciphertext under the oracle's public key
    pub fn submit_encrypted_result(
        ctx: Context<SubmitEncryptedResult>,
        ciphertext: EncryptedValue,
    ) -> Result<()> {
        instructions::batch::submit_encrypted_result::handler(ctx, ciphertext)
    }

    // =========================================================================
    // DECRYPTION
    // =========================================================================

    /// Ask the oracle to decrypt a batch sum
    ///
    /// # Arguments
    /// * `batch_id` - Batch to decrypt (open or closed)
    /// * `request_id` - Id the gateway will assign (`peek_request_id`)
    pub fn request_decryption(
        ctx: Context<RequestDecryption>,
        batch_id: u64,
        request_id: [u8; 32],
    ) -> Result<()> {
        instructions::decryption::request_decryption::handler(ctx, batch_id, request_id)
    }

    /// Deliver a decryption result (oracle authority only)
    ///
    /// # Arguments
    /// * `request_id` - Request being answered
    /// * `cleartext` - Sum as 8 little-endian bytes
    /// * `proof` - 65-byte recoverable secp256k1 signature by the oracle signer
    pub fn on_oracle_callback(
        ctx: Context<OnOracleCallback>,
        request_id: [u8; 32],
        cleartext: Vec<u8>,
        proof: Vec<u8>,
    ) -> Result<()> {
        instructions::decryption::oracle_callback::handler(ctx, request_id, cleartext, proof)
    }
}
