//! Transfer Admin Instruction
//!
//! Single-step: the new admin is in charge as soon as this lands.

use anchor_lang::prelude::*;

use crate::error::AggregatorError;
use crate::events::AdminTransferred;
use crate::state::AggregatorConfig;

#[derive(Accounts)]
pub struct TransferAdmin<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        has_one = admin @ AggregatorError::NotAuthorized,
    )]
    pub config: Box<Account<'info, AggregatorConfig>>,
}

pub fn handler(ctx: Context<TransferAdmin>, new_admin: Pubkey) -> Result<()> {
    let timestamp = Clock::get()?.unix_timestamp;
    let config = &mut ctx.accounts.config;

    let previous_admin = config.transfer_admin(new_admin, timestamp)?;

    emit!(AdminTransferred {
        config: config.key(),
        previous_admin,
        new_admin,
        timestamp,
    });

    msg!("Admin transferred: {} -> {}", previous_admin, new_admin);

    Ok(())
}
