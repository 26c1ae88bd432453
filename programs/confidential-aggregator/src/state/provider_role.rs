//! Provider Role - Data Provider Authorization
//!
//! # Security Model
//!
//! Submitting ciphertexts and requesting decryptions are restricted to
//! providers holding an active role PDA. The admin manages the set; the
//! creator of the aggregator receives a role at initialization.
//!
//! Each role also carries the provider's cooldown timers, one per
//! rate-limited action, so providers never block each other.
//!
//! # PDA Seeds
//! `[b"provider", config.key().as_ref(), provider.key().as_ref()]`

use anchor_lang::prelude::*;

use crate::error::AggregatorError;

/// Actions subject to the per-provider cooldown
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RateLimitedAction {
    Submission,
    DecryptionRequest,
}

#[account]
#[derive(Default, Debug)]
pub struct ProviderRole {
    /// Aggregator this provider is authorized for
    pub config: Pubkey,

    /// Provider public key
    pub provider: Pubkey,

    pub is_active: bool,

    /// Last successful submission (0 = never)
    pub last_submission_at: i64,

    /// Last successful decryption request (0 = never)
    pub last_decryption_request_at: i64,

    pub total_submissions: u64,
    pub total_decryption_requests: u64,

    pub added_at: i64,
    pub updated_at: i64,
    pub bump: u8,
    pub version: u8,
}

impl ProviderRole {
    pub const SEED_PREFIX: &'static [u8] = b"provider";

    pub const LEN: usize = 8  // discriminator
        + 32  // config
        + 32  // provider
        + 1   // is_active
        + 8   // last_submission_at
        + 8   // last_decryption_request_at
        + 8   // total_submissions
        + 8   // total_decryption_requests
        + 8   // added_at
        + 8   // updated_at
        + 1   // bump
        + 1; // version

    pub const VERSION: u8 = 1;

    pub fn initialize(&mut self, config: Pubkey, provider: Pubkey, bump: u8, timestamp: i64) {
        self.config = config;
        self.provider = provider;
        self.is_active = true;
        self.last_submission_at = 0;
        self.last_decryption_request_at = 0;
        self.total_submissions = 0;
        self.total_decryption_requests = 0;
        self.added_at = timestamp;
        self.updated_at = timestamp;
        self.bump = bump;
        self.version = Self::VERSION;
    }

    /// A zeroed account has never been initialized
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.version != 0
    }

    /// Re-activate a removed provider. Cooldown timers survive removal.
    pub fn activate(&mut self, timestamp: i64) -> Result<()> {
        require!(!self.is_active, AggregatorError::ProviderAlreadyActive);
        self.is_active = true;
        self.updated_at = timestamp;
        Ok(())
    }

    pub fn deactivate(&mut self, timestamp: i64) -> Result<()> {
        require!(self.is_active, AggregatorError::ProviderNotActive);
        self.is_active = false;
        self.updated_at = timestamp;
        Ok(())
    }

    pub fn last_action_at(&self, action: RateLimitedAction) -> i64 {
        match action {
            RateLimitedAction::Submission => self.last_submission_at,
            RateLimitedAction::DecryptionRequest => self.last_decryption_request_at,
        }
    }

    /// Blocked while `now < last_action_at + cooldown_seconds`.
    pub fn require_cooldown_elapsed(
        &self,
        action: RateLimitedAction,
        cooldown_seconds: u64,
        now: i64,
    ) -> Result<()> {
        let cooldown = i64::try_from(cooldown_seconds)
            .map_err(|_| error!(AggregatorError::InvalidCooldown))?;
        let ready_at = self.last_action_at(action).saturating_add(cooldown);
        require!(now >= ready_at, AggregatorError::CooldownActive);
        Ok(())
    }

    /// Advance the action's timer. Called only once the action has succeeded.
    pub fn record_action(&mut self, action: RateLimitedAction, now: i64) -> Result<()> {
        match action {
            RateLimitedAction::Submission => {
                self.last_submission_at = now;
                self.total_submissions = self
                    .total_submissions
                    .checked_add(1)
                    .ok_or(AggregatorError::ArithmeticOverflow)?;
            }
            RateLimitedAction::DecryptionRequest => {
                self.last_decryption_request_at = now;
                self.total_decryption_requests = self
                    .total_decryption_requests
                    .checked_add(1)
                    .ok_or(AggregatorError::ArithmeticOverflow)?;
            }
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn find_pda(program_id: &Pubkey, config: &Pubkey, provider: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[Self::SEED_PREFIX, config.as_ref(), provider.as_ref()],
            program_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn role() -> ProviderRole {
        let mut role = ProviderRole::default();
        role.initialize(Pubkey::new_unique(), Pubkey::new_unique(), 254, NOW);
        role
    }

    #[test]
    fn test_provider_role_size() {
        assert_eq!(ProviderRole::LEN, 123);
    }

    #[test]
    fn fresh_role_is_not_rate_limited() {
        let role = role();
        assert!(role
            .require_cooldown_elapsed(RateLimitedAction::Submission, 3600, NOW)
            .is_ok());
    }

    #[test]
    fn cooldown_blocks_then_releases() {
        let mut role = role();
        role.record_action(RateLimitedAction::DecryptionRequest, NOW).unwrap();

        let err = role
            .require_cooldown_elapsed(RateLimitedAction::DecryptionRequest, 60, NOW + 59)
            .unwrap_err();
        assert_eq!(err, AggregatorError::CooldownActive.into());

        assert!(role
            .require_cooldown_elapsed(RateLimitedAction::DecryptionRequest, 60, NOW + 60)
            .is_ok());
    }

    #[test]
    fn actions_have_independent_timers() {
        let mut role = role();
        role.record_action(RateLimitedAction::Submission, NOW).unwrap();

        assert!(role
            .require_cooldown_elapsed(RateLimitedAction::Submission, 60, NOW + 1)
            .is_err());
        assert!(role
            .require_cooldown_elapsed(RateLimitedAction::DecryptionRequest, 60, NOW + 1)
            .is_ok());
        assert_eq!(role.total_submissions, 1);
        assert_eq!(role.total_decryption_requests, 0);
    }

    #[test]
    fn zero_cooldown_never_blocks() {
        let mut role = role();
        role.record_action(RateLimitedAction::Submission, NOW).unwrap();
        assert!(role
            .require_cooldown_elapsed(RateLimitedAction::Submission, 0, NOW)
            .is_ok());
    }

    #[test]
    fn activation_is_one_way_per_call() {
        let mut role = role();
        assert_eq!(
            role.activate(NOW).unwrap_err(),
            AggregatorError::ProviderAlreadyActive.into()
        );
        role.deactivate(NOW).unwrap();
        assert_eq!(
            role.deactivate(NOW).unwrap_err(),
            AggregatorError::ProviderNotActive.into()
        );
        role.activate(NOW + 1).unwrap();
        assert!(role.is_active);
    }
}
