//! Set Oracle Instruction
//!
//! Rotates the callback authority and the result-signing key together.
//! Requests already in flight must be answered by the new signer.

use anchor_lang::prelude::*;

use crate::error::AggregatorError;
use crate::events::OracleUpdated;
use crate::state::AggregatorConfig;

#[derive(Accounts)]
pub struct SetOracle<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        has_one = admin @ AggregatorError::NotAuthorized,
    )]
    pub config: Box<Account<'info, AggregatorConfig>>,
}

pub fn handler(
    ctx: Context<SetOracle>,
    oracle_authority: Pubkey,
    oracle_signer: [u8; 20],
) -> Result<()> {
    let timestamp = Clock::get()?.unix_timestamp;
    let config = &mut ctx.accounts.config;

    config.set_oracle(oracle_authority, oracle_signer, timestamp)?;

    emit!(OracleUpdated {
        config: config.key(),
        admin: ctx.accounts.admin.key(),
        oracle_authority,
        oracle_signer,
        timestamp,
    });

    msg!(
        "Oracle updated: authority={}, signer={}",
        oracle_authority,
        hex::encode(oracle_signer)
    );

    Ok(())
}
