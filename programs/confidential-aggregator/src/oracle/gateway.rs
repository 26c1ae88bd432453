//! Decryption Gateway - Oracle Intake Queue
//!
//! The gateway stands in for the external decryption service's entry point.
//! It hands out opaque request ids and publishes a `DecryptionDispatched`
//! event per request; off-chain oracle workers consume those events, decrypt
//! and answer through `on_oracle_callback`.
//!
//! Ids are `keccak256(REQUEST_ID_DOMAIN || gateway || nonce_le)`. Clients read
//! `nonce` ahead of time to derive the request account address, see
//! [`DecryptionGateway::peek_request_id`].
//!
//! # PDA Seeds
//! `[b"decryption_gateway", config.key().as_ref()]`

use anchor_lang::prelude::*;

use crate::crypto::derive_request_id;
use crate::error::AggregatorError;

#[account]
#[derive(Default, Debug)]
pub struct DecryptionGateway {
    pub config: Pubkey,

    /// Next id to assign
    pub nonce: u64,

    /// Dispatched but not yet fulfilled
    pub outstanding: u64,

    pub total_dispatched: u64,
    pub total_fulfilled: u64,

    pub bump: u8,
}

impl DecryptionGateway {
    pub const SEED_PREFIX: &'static [u8] = b"decryption_gateway";

    pub const LEN: usize = 8  // discriminator
        + 32  // config
        + 8   // nonce
        + 8   // outstanding
        + 8   // total_dispatched
        + 8   // total_fulfilled
        + 1; // bump

    pub fn initialize(&mut self, config: Pubkey, bump: u8) {
        self.config = config;
        self.nonce = 0;
        self.outstanding = 0;
        self.total_dispatched = 0;
        self.total_fulfilled = 0;
        self.bump = bump;
    }

    /// Id the next dispatch will assign
    pub fn peek_request_id(&self, gateway: &Pubkey) -> [u8; 32] {
        derive_request_id(gateway, self.nonce)
    }

    /// Assign an id to a new request.
    pub fn dispatch(&mut self, gateway: &Pubkey) -> Result<[u8; 32]> {
        let request_id = self.peek_request_id(gateway);

        self.nonce = self
            .nonce
            .checked_add(1)
            .ok_or(AggregatorError::ArithmeticOverflow)?;
        self.outstanding = self
            .outstanding
            .checked_add(1)
            .ok_or(AggregatorError::ArithmeticOverflow)?;
        self.total_dispatched = self
            .total_dispatched
            .checked_add(1)
            .ok_or(AggregatorError::ArithmeticOverflow)?;

        Ok(request_id)
    }

    pub fn record_fulfilled(&mut self) -> Result<()> {
        self.outstanding = self.outstanding.saturating_sub(1);
        self.total_fulfilled = self
            .total_fulfilled
            .checked_add(1)
            .ok_or(AggregatorError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn find_pda(program_id: &Pubkey, config: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[Self::SEED_PREFIX, config.as_ref()], program_id)
    }
}
