//! Decryption Request - Pending Oracle Work
//!
//! Created by `request_decryption` and consumed exactly once by the oracle
//! callback. The account records the fingerprint of the ciphertext that was
//! sent out, which the callback compares against the batch's live
//! accumulator before accepting a result.
//!
//! # Lifecycle
//! `NONE -> REQUESTED -> PROCESSED`. There is no cancellation or expiry, and
//! `processed` never goes back to false.
//!
//! # PDA Seeds
//! `[b"decryption_request", config.key().as_ref(), request_id.as_ref()]`

use anchor_lang::prelude::*;

use crate::error::AggregatorError;

#[account]
#[derive(Default, Debug)]
pub struct DecryptionRequest {
    pub config: Pubkey,

    /// Opaque id assigned by the gateway
    pub request_id: [u8; 32],

    /// Batch whose accumulator was submitted for decryption
    pub batch_id: u64,

    /// Fingerprint of the accumulator at request time
    pub state_fingerprint: [u8; 32],

    pub processed: bool,

    pub requester: Pubkey,
    pub requested_at: i64,

    /// Valid only once processed
    pub decrypted_value: u64,
    pub completed_at: i64,

    pub bump: u8,
    pub version: u8,
}

impl DecryptionRequest {
    pub const SEED_PREFIX: &'static [u8] = b"decryption_request";

    pub const LEN: usize = 8  // discriminator
        + 32  // config
        + 32  // request_id
        + 8   // batch_id
        + 32  // state_fingerprint
        + 1   // processed
        + 32  // requester
        + 8   // requested_at
        + 8   // decrypted_value
        + 8   // completed_at
        + 1   // bump
        + 1; // version

    pub const VERSION: u8 = 1;

    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        &mut self,
        config: Pubkey,
        request_id: [u8; 32],
        batch_id: u64,
        state_fingerprint: [u8; 32],
        requester: Pubkey,
        bump: u8,
        timestamp: i64,
    ) {
        self.config = config;
        self.request_id = request_id;
        self.batch_id = batch_id;
        self.state_fingerprint = state_fingerprint;
        self.processed = false;
        self.requester = requester;
        self.requested_at = timestamp;
        self.decrypted_value = 0;
        self.completed_at = 0;
        self.bump = bump;
        self.version = Self::VERSION;
    }

    #[inline]
    pub fn require_pending(&self) -> Result<()> {
        require!(!self.processed, AggregatorError::ReplayAttempt);
        Ok(())
    }

    pub fn mark_processed(&mut self, value: u64, timestamp: i64) -> Result<()> {
        self.require_pending()?;
        self.processed = true;
        self.decrypted_value = value;
        self.completed_at = timestamp;
        Ok(())
    }

    pub fn find_pda(program_id: &Pubkey, config: &Pubkey, request_id: &[u8; 32]) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[Self::SEED_PREFIX, config.as_ref(), request_id.as_ref()],
            program_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decryption_request_size() {
        assert_eq!(DecryptionRequest::LEN, 171);
    }

    #[test]
    fn processed_is_one_way() {
        let mut request = DecryptionRequest::default();
        request.initialize(
            Pubkey::new_unique(),
            [4u8; 32],
            1,
            [5u8; 32],
            Pubkey::new_unique(),
            9,
            10,
        );
        assert!(request.require_pending().is_ok());

        request.mark_processed(12, 20).unwrap();
        assert!(request.processed);
        assert_eq!(request.decrypted_value, 12);
        assert_eq!(request.completed_at, 20);

        assert_eq!(
            request.mark_processed(99, 30).unwrap_err(),
            AggregatorError::ReplayAttempt.into()
        );
        assert_eq!(request.decrypted_value, 12);
        assert_eq!(request.completed_at, 20);
    }
}
