use anchor_lang::prelude::*;

use crate::error::AggregatorError;

/// Upper bound for `cooldown_seconds` (30 days)
pub const MAX_COOLDOWN_SECONDS: u64 = 30 * 24 * 60 * 60;

/// Root configuration of one aggregator deployment.
///
/// Seeds: `[b"aggregator_config", creator]`
#[account]
#[derive(Default, Debug)]
pub struct AggregatorConfig {
    /// Single administrator (owner)
    pub admin: Pubkey,

    /// Only signer allowed to invoke the oracle callback
    pub oracle_authority: Pubkey,

    /// Address of the secp256k1 key that signs decryption results
    pub oracle_signer: [u8; 20],

    /// Decryption gateway bound to this config
    pub gateway: Pubkey,

    pub is_paused: bool,

    /// Minimum spacing between two rate-limited actions of one provider
    pub cooldown_seconds: u64,

    /// Id of the most recently opened batch (0 = none yet)
    pub current_batch_id: u64,

    pub provider_count: u32,
    pub total_contributions: u64,
    pub total_decryption_requests: u64,
    pub total_decryptions_completed: u64,

    pub created_at: i64,
    pub last_activity_at: i64,
    pub bump: u8,
    pub version: u8,
    pub _reserved: [u8; 32],
}

impl AggregatorConfig {
    pub const LEN: usize = 8  // discriminator
        + 32  // admin
        + 32  // oracle_authority
        + 20  // oracle_signer
        + 32  // gateway
        + 1   // is_paused
        + 8   // cooldown_seconds
        + 8   // current_batch_id
        + 4   // provider_count
        + 8   // total_contributions
        + 8   // total_decryption_requests
        + 8   // total_decryptions_completed
        + 8   // created_at
        + 8   // last_activity_at
        + 1   // bump
        + 1   // version
        + 32; // _reserved

    pub const VERSION: u8 = 1;

    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        &mut self,
        admin: Pubkey,
        oracle_authority: Pubkey,
        oracle_signer: [u8; 20],
        gateway: Pubkey,
        cooldown_seconds: u64,
        bump: u8,
        timestamp: i64,
    ) -> Result<()> {
        validate_cooldown(cooldown_seconds)?;
        validate_oracle(&oracle_authority, &oracle_signer)?;

        self.admin = admin;
        self.oracle_authority = oracle_authority;
        self.oracle_signer = oracle_signer;
        self.gateway = gateway;
        self.is_paused = false;
        self.cooldown_seconds = cooldown_seconds;
        self.current_batch_id = 0;
        self.provider_count = 0;
        self.total_contributions = 0;
        self.total_decryption_requests = 0;
        self.total_decryptions_completed = 0;
        self.created_at = timestamp;
        self.last_activity_at = timestamp;
        self.bump = bump;
        self.version = Self::VERSION;
        self._reserved = [0u8; 32];
        Ok(())
    }

    #[inline]
    pub fn require_admin(&self, caller: &Pubkey) -> Result<()> {
        require_keys_eq!(*caller, self.admin, AggregatorError::NotAuthorized);
        Ok(())
    }

    #[inline]
    pub fn require_not_paused(&self) -> Result<()> {
        require!(!self.is_paused, AggregatorError::Paused);
        Ok(())
    }

    #[inline]
    pub fn require_oracle_authority(&self, caller: &Pubkey) -> Result<()> {
        require_keys_eq!(*caller, self.oracle_authority, AggregatorError::NotAuthorized);
        Ok(())
    }

    /// Double-pause is a caller error, not a no-op.
    pub fn pause(&mut self, timestamp: i64) -> Result<()> {
        require!(!self.is_paused, AggregatorError::AlreadyPaused);
        self.is_paused = true;
        self.last_activity_at = timestamp;
        Ok(())
    }

    pub fn unpause(&mut self, timestamp: i64) -> Result<()> {
        require!(self.is_paused, AggregatorError::NotPaused);
        self.is_paused = false;
        self.last_activity_at = timestamp;
        Ok(())
    }

    /// Returns the previous cooldown.
    pub fn set_cooldown(&mut self, cooldown_seconds: u64, timestamp: i64) -> Result<u64> {
        validate_cooldown(cooldown_seconds)?;
        let previous = self.cooldown_seconds;
        self.cooldown_seconds = cooldown_seconds;
        self.last_activity_at = timestamp;
        Ok(previous)
    }

    /// Single-step transfer; the new admin takes effect immediately.
    pub fn transfer_admin(&mut self, new_admin: Pubkey, timestamp: i64) -> Result<Pubkey> {
        require!(
            new_admin != Pubkey::default(),
            AggregatorError::InvalidAdmin
        );
        require!(new_admin != self.admin, AggregatorError::InvalidAdmin);

        let previous = self.admin;
        self.admin = new_admin;
        self.last_activity_at = timestamp;
        Ok(previous)
    }

    pub fn set_oracle(
        &mut self,
        oracle_authority: Pubkey,
        oracle_signer: [u8; 20],
        timestamp: i64,
    ) -> Result<()> {
        validate_oracle(&oracle_authority, &oracle_signer)?;
        self.oracle_authority = oracle_authority;
        self.oracle_signer = oracle_signer;
        self.last_activity_at = timestamp;
        Ok(())
    }

    #[inline]
    pub fn next_batch_id(&self) -> u64 {
        self.current_batch_id.saturating_add(1)
    }

    /// Advance to a freshly opened batch; returns its id.
    pub fn advance_batch(&mut self, timestamp: i64) -> Result<u64> {
        self.current_batch_id = self
            .current_batch_id
            .checked_add(1)
            .ok_or(error!(AggregatorError::ArithmeticOverflow))?;
        self.last_activity_at = timestamp;
        Ok(self.current_batch_id)
    }

    /// Batch ids in `1..=current_batch_id` exist.
    #[inline]
    pub fn is_known_batch(&self, batch_id: u64) -> bool {
        batch_id >= 1 && batch_id <= self.current_batch_id
    }

    pub fn record_provider_added(&mut self, timestamp: i64) -> Result<()> {
        self.provider_count = self
            .provider_count
            .checked_add(1)
            .ok_or(error!(AggregatorError::ArithmeticOverflow))?;
        self.last_activity_at = timestamp;
        Ok(())
    }

    pub fn record_provider_removed(&mut self, timestamp: i64) {
        self.provider_count = self.provider_count.saturating_sub(1);
        self.last_activity_at = timestamp;
    }

    pub fn record_contribution(&mut self, timestamp: i64) -> Result<()> {
        self.total_contributions = self
            .total_contributions
            .checked_add(1)
            .ok_or(error!(AggregatorError::ArithmeticOverflow))?;
        self.last_activity_at = timestamp;
        Ok(())
    }

    pub fn record_decryption_request(&mut self, timestamp: i64) -> Result<()> {
        self.total_decryption_requests = self
            .total_decryption_requests
            .checked_add(1)
            .ok_or(error!(AggregatorError::ArithmeticOverflow))?;
        self.last_activity_at = timestamp;
        Ok(())
    }

    pub fn record_decryption_completed(&mut self, timestamp: i64) -> Result<()> {
        self.total_decryptions_completed = self
            .total_decryptions_completed
            .checked_add(1)
            .ok_or(error!(AggregatorError::ArithmeticOverflow))?;
        self.last_activity_at = timestamp;
        Ok(())
    }
}

impl AggregatorConfig {
    pub const SEED_PREFIX: &'static [u8] = b"aggregator_config";

    pub fn find_pda(program_id: &Pubkey, creator: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[Self::SEED_PREFIX, creator.as_ref()], program_id)
    }
}

fn validate_cooldown(cooldown_seconds: u64) -> Result<()> {
    require!(
        cooldown_seconds <= MAX_COOLDOWN_SECONDS,
        AggregatorError::InvalidCooldown
    );
    Ok(())
}

fn validate_oracle(oracle_authority: &Pubkey, oracle_signer: &[u8; 20]) -> Result<()> {
    require!(
        *oracle_authority != Pubkey::default(),
        AggregatorError::InvalidOracleConfig
    );
    require!(
        *oracle_signer != [0u8; 20],
        AggregatorError::InvalidOracleConfig
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_config() -> (AggregatorConfig, Pubkey) {
        let admin = Pubkey::new_unique();
        let mut config = AggregatorConfig::default();
        config
            .initialize(
                admin,
                Pubkey::new_unique(),
                [7u8; 20],
                Pubkey::new_unique(),
                60,
                255,
                1_700_000_000,
            )
            .unwrap();
        (config, admin)
    }

    #[test]
    fn test_config_size() {
        assert_eq!(AggregatorConfig::LEN, 219);
    }

    #[test]
    fn double_pause_is_an_error() {
        let (mut config, _) = fresh_config();
        config.pause(1).unwrap();
        assert_eq!(config.pause(2).unwrap_err(), AggregatorError::AlreadyPaused.into());
        assert!(config.is_paused);

        config.unpause(3).unwrap();
        assert_eq!(config.unpause(4).unwrap_err(), AggregatorError::NotPaused.into());
    }

    #[test]
    fn paused_config_blocks_guard() {
        let (mut config, _) = fresh_config();
        assert!(config.require_not_paused().is_ok());
        config.pause(1).unwrap();
        assert_eq!(
            config.require_not_paused().unwrap_err(),
            AggregatorError::Paused.into()
        );
    }

    #[test]
    fn admin_guard() {
        let (config, admin) = fresh_config();
        assert!(config.require_admin(&admin).is_ok());
        assert_eq!(
            config.require_admin(&Pubkey::new_unique()).unwrap_err(),
            AggregatorError::NotAuthorized.into()
        );
    }

    #[test]
    fn transfer_admin_rules() {
        let (mut config, admin) = fresh_config();
        assert!(config.transfer_admin(Pubkey::default(), 1).is_err());
        assert!(config.transfer_admin(admin, 1).is_err());

        let next = Pubkey::new_unique();
        assert_eq!(config.transfer_admin(next, 2).unwrap(), admin);
        assert!(config.require_admin(&next).is_ok());
        assert!(config.require_admin(&admin).is_err());
    }

    #[test]
    fn cooldown_bounds() {
        let (mut config, _) = fresh_config();
        assert_eq!(config.set_cooldown(0, 1).unwrap(), 60);
        assert_eq!(config.set_cooldown(MAX_COOLDOWN_SECONDS, 1).unwrap(), 0);
        assert_eq!(
            config.set_cooldown(MAX_COOLDOWN_SECONDS + 1, 1).unwrap_err(),
            AggregatorError::InvalidCooldown.into()
        );
        assert_eq!(config.cooldown_seconds, MAX_COOLDOWN_SECONDS);
    }

    #[test]
    fn batch_ids_are_monotonic() {
        let (mut config, _) = fresh_config();
        assert!(!config.is_known_batch(0));
        assert!(!config.is_known_batch(1));
        assert_eq!(config.next_batch_id(), 1);

        assert_eq!(config.advance_batch(1).unwrap(), 1);
        assert_eq!(config.advance_batch(2).unwrap(), 2);
        assert!(config.is_known_batch(1));
        assert!(config.is_known_batch(2));
        assert!(!config.is_known_batch(3));
    }

    #[test]
    fn oracle_config_is_validated() {
        let mut config = AggregatorConfig::default();
        let result = config.initialize(
            Pubkey::new_unique(),
            Pubkey::default(),
            [7u8; 20],
            Pubkey::new_unique(),
            0,
            0,
            0,
        );
        assert_eq!(result.unwrap_err(), AggregatorError::InvalidOracleConfig.into());

        let (mut config, _) = fresh_config();
        assert!(config.set_oracle(Pubkey::new_unique(), [0u8; 20], 1).is_err());
        let authority = Pubkey::new_unique();
        config.set_oracle(authority, [9u8; 20], 1).unwrap();
        assert!(config.require_oracle_authority(&authority).is_ok());
        assert_eq!(config.oracle_signer, [9u8; 20]);
    }
}
