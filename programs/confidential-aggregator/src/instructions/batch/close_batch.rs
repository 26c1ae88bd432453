//! Close Batch Instruction
//!
//! Closes the current batch. Fails with `BatchNotOpen` when it is already
//! closed or no batch was ever opened. The batch account is kept: a closed
//! batch can still be read and decrypted.

use anchor_lang::prelude::*;

use crate::error::AggregatorError;
use crate::events::BatchClosed;
use crate::guards;
use crate::state::AggregatorConfig;

#[derive(Accounts)]
pub struct CloseBatch<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        has_one = admin @ AggregatorError::NotAuthorized,
    )]
    pub config: Box<Account<'info, AggregatorConfig>>,

    /// CHECK: Loaded in the handler as the current batch PDA of `config`
    #[account(mut)]
    pub batch: UncheckedAccount<'info>,
}

pub fn handler(ctx: Context<CloseBatch>) -> Result<()> {
    let timestamp = Clock::get()?.unix_timestamp;
    let config = &mut ctx.accounts.config;
    let config_key = config.key();

    config.require_not_paused()?;

    let batch_info = ctx.accounts.batch.to_account_info();
    let mut batch = guards::load_current_batch(ctx.program_id, &config_key, config, &batch_info)?;

    batch.seal(timestamp)?;
    guards::write_back(&batch_info, &batch)?;
    config.last_activity_at = timestamp;

    emit!(BatchClosed {
        config: config_key,
        batch_id: batch.batch_id,
        contribution_count: batch.contribution_count,
        admin: ctx.accounts.admin.key(),
        timestamp,
    });

    msg!(
        "Batch closed: id={}, contributions={}",
        batch.batch_id,
        batch.contribution_count
    );

    Ok(())
}
