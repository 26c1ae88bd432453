//! Shared authorization and account-loading checks.
//!
//! Provider roles and batches are passed to instructions without Anchor
//! constraints and verified here against their derived PDA, so the
//! instruction reports the aggregator's own error instead of a generic
//! constraint failure.

use anchor_lang::error::ErrorCode;
use anchor_lang::prelude::*;

use crate::error::AggregatorError;
use crate::state::{AggregatorConfig, Batch, ProviderRole};

/// The caller must hold an active role PDA under `config`.
///
/// `role` is the account supplied for the provider, if any, with its address.
pub fn require_active_provider(
    program_id: &Pubkey,
    config: &Pubkey,
    provider: &Pubkey,
    role: Option<(&Pubkey, &ProviderRole)>,
) -> Result<()> {
    let (role_address, role) = role.ok_or(error!(AggregatorError::NotAuthorized))?;

    let (expected, _) = ProviderRole::find_pda(program_id, config, provider);
    require_keys_eq!(*role_address, expected, AggregatorError::NotAuthorized);
    require!(role.is_active, AggregatorError::NotAuthorized);
    Ok(())
}

/// `batch_id` must name a batch that has been opened.
#[inline]
pub fn require_known_batch(config: &AggregatorConfig, batch_id: u64) -> Result<()> {
    require!(config.is_known_batch(batch_id), AggregatorError::InvalidBatch);
    Ok(())
}

/// Load batch `batch_id` of `config`.
///
/// The batch is returned by value; changes reach the account only through
/// [`write_back`].
pub fn load_batch(
    program_id: &Pubkey,
    config: &Pubkey,
    batch_id: u64,
    info: &AccountInfo,
) -> Result<Batch> {
    let (expected, _) = Batch::find_pda(program_id, config, batch_id);
    require_keys_eq!(info.key(), expected, AggregatorError::InvalidBatch);
    require!(
        info.owner == program_id && !info.data_is_empty(),
        AggregatorError::InvalidBatch
    );

    let data = info.try_borrow_data()?;
    Batch::try_deserialize(&mut &data[..]).map_err(|_| error!(AggregatorError::InvalidBatch))
}

/// Load the batch contributions currently go to. It must be open.
pub fn load_current_batch(
    program_id: &Pubkey,
    config_key: &Pubkey,
    config: &AggregatorConfig,
    info: &AccountInfo,
) -> Result<Batch> {
    require!(config.current_batch_id > 0, AggregatorError::BatchNotOpen);

    let batch = load_batch(program_id, config_key, config.current_batch_id, info)?;
    batch.require_open()?;
    Ok(batch)
}

/// Serialize `state`, discriminator first, into an account loaded by hand.
pub fn write_back<T: AccountSerialize>(info: &AccountInfo, state: &T) -> Result<()> {
    if !info.is_writable {
        return Err(ErrorCode::AccountNotMutable.into());
    }
    let mut data = info.try_borrow_mut_data()?;
    let mut writer: &mut [u8] = &mut **data;
    state.try_serialize(&mut writer)
}
