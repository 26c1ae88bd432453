use anchor_lang::prelude::*;

use crate::error::AggregatorError;
use crate::events::Unpaused;
use crate::state::AggregatorConfig;

#[derive(Accounts)]
pub struct UnpauseAggregator<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        has_one = admin @ AggregatorError::NotAuthorized,
    )]
    pub config: Box<Account<'info, AggregatorConfig>>,
}

pub fn handler(ctx: Context<UnpauseAggregator>) -> Result<()> {
    let timestamp = Clock::get()?.unix_timestamp;
    let config = &mut ctx.accounts.config;

    config.unpause(timestamp)?;

    emit!(Unpaused {
        config: config.key(),
        admin: ctx.accounts.admin.key(),
        timestamp,
    });

    msg!("Aggregator unpaused by admin");

    Ok(())
}
