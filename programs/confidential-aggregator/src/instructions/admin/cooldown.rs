//! Set Cooldown Instruction
//!
//! Applies to both rate-limited actions. Existing provider timers are kept,
//! so a shorter cooldown can release a provider immediately.

use anchor_lang::prelude::*;

use crate::error::AggregatorError;
use crate::events::CooldownUpdated;
use crate::state::AggregatorConfig;

#[derive(Accounts)]
pub struct SetCooldown<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        has_one = admin @ AggregatorError::NotAuthorized,
    )]
    pub config: Box<Account<'info, AggregatorConfig>>,
}

pub fn handler(ctx: Context<SetCooldown>, cooldown_seconds: u64) -> Result<()> {
    let timestamp = Clock::get()?.unix_timestamp;
    let config = &mut ctx.accounts.config;

    let previous_seconds = config.set_cooldown(cooldown_seconds, timestamp)?;

    emit!(CooldownUpdated {
        config: config.key(),
        admin: ctx.accounts.admin.key(),
        previous_seconds,
        cooldown_seconds,
        timestamp,
    });

    msg!("Cooldown updated: {}s -> {}s", previous_seconds, cooldown_seconds);

    Ok(())
}
