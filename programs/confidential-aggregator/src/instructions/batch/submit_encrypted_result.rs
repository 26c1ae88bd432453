//! Submit Encrypted Result Instruction
//!
//! Folds one provider ciphertext into the current batch.
//!
//! # Checks (in order)
//! 1. caller holds an active provider role
//! 2. aggregator is not paused
//! 3. provider's submission cooldown has elapsed
//! 4. current batch exists and is open
//! 5. ciphertext is made of valid curve points

use anchor_lang::prelude::*;

use crate::crypto::EncryptedValue;
use crate::error::AggregatorError;
use crate::events::ResultSubmitted;
use crate::guards;
use crate::state::{AggregatorConfig, ProviderRole, RateLimitedAction};

#[derive(Accounts)]
pub struct SubmitEncryptedResult<'info> {
    pub provider: Signer<'info>,

    #[account(mut)]
    pub config: Box<Account<'info, AggregatorConfig>>,

    /// Provider role PDA (verified manually in the handler)
    #[account(mut)]
    pub provider_role: Option<Account<'info, ProviderRole>>,

    /// CHECK: Loaded in the handler as the current batch PDA of `config`
    #[account(mut)]
    pub batch: UncheckedAccount<'info>,
}

pub fn handler(ctx: Context<SubmitEncryptedResult>, ciphertext: EncryptedValue) -> Result<()> {
    let timestamp = Clock::get()?.unix_timestamp;
    let provider = ctx.accounts.provider.key();
    let config = &mut ctx.accounts.config;
    let config_key = config.key();

    let role = ctx
        .accounts
        .provider_role
        .as_mut()
        .ok_or(AggregatorError::NotAuthorized)?;
    let role_key = role.key();
    guards::require_active_provider(
        ctx.program_id,
        &config_key,
        &provider,
        Some((&role_key, &**role)),
    )?;

    config.require_not_paused()?;
    role.require_cooldown_elapsed(
        RateLimitedAction::Submission,
        config.cooldown_seconds,
        timestamp,
    )?;

    let batch_info = ctx.accounts.batch.to_account_info();
    let mut batch = guards::load_current_batch(ctx.program_id, &config_key, config, &batch_info)?;

    let contribution_index = batch.accumulate(&ciphertext, timestamp)?;
    guards::write_back(&batch_info, &batch)?;

    role.record_action(RateLimitedAction::Submission, timestamp)?;
    config.record_contribution(timestamp)?;

    emit!(ResultSubmitted {
        config: config_key,
        batch_id: batch.batch_id,
        provider,
        contribution_index,
        ciphertext,
        timestamp,
    });

    msg!(
        "Result submitted: batch={}, index={}, provider={}",
        batch.batch_id,
        contribution_index,
        provider
    );

    Ok(())
}
