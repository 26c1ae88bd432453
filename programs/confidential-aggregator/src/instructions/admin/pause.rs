//! Pause Aggregator Instruction
//!
//! Stops batch operations, submissions and decryption requests. Admin
//! policy instructions and oracle callbacks keep working.

use anchor_lang::prelude::*;

use crate::error::AggregatorError;
use crate::events::Paused;
use crate::state::AggregatorConfig;

#[derive(Accounts)]
pub struct PauseAggregator<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        has_one = admin @ AggregatorError::NotAuthorized,
    )]
    pub config: Box<Account<'info, AggregatorConfig>>,
}

pub fn handler(ctx: Context<PauseAggregator>) -> Result<()> {
    let timestamp = Clock::get()?.unix_timestamp;
    let config = &mut ctx.accounts.config;

    config.pause(timestamp)?;

    emit!(Paused {
        config: config.key(),
        admin: ctx.accounts.admin.key(),
        timestamp,
    });

    msg!("Aggregator paused by admin");

    Ok(())
}
