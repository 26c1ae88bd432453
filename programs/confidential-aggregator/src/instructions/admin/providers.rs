//! Provider Registry Instructions
//!
//! Admin-only management of the provider allowlist. Neither instruction is
//! blocked by pause.

use anchor_lang::prelude::*;

use crate::error::AggregatorError;
use crate::events::{ProviderAdded, ProviderRemoved};
use crate::state::{AggregatorConfig, ProviderRole};

#[derive(Accounts)]
#[instruction(provider: Pubkey)]
pub struct AddProvider<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        mut,
        has_one = admin @ AggregatorError::NotAuthorized,
    )]
    pub config: Box<Account<'info, AggregatorConfig>>,

    /// Created on first add, re-activated after a removal
    #[account(
        init_if_needed,
        payer = admin,
        space = ProviderRole::LEN,
        seeds = [
            ProviderRole::SEED_PREFIX,
            config.key().as_ref(),
            provider.as_ref(),
        ],
        bump,
    )]
    pub provider_role: Box<Account<'info, ProviderRole>>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct RemoveProvider<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        has_one = admin @ AggregatorError::NotAuthorized,
    )]
    pub config: Box<Account<'info, AggregatorConfig>>,

    /// Role PDA of the provider being removed. Omitted when the provider
    /// never had one; verified against the derived address in the handler.
    #[account(mut)]
    pub provider_role: Option<Account<'info, ProviderRole>>,
}

pub fn add_handler(ctx: Context<AddProvider>, provider: Pubkey) -> Result<()> {
    let timestamp = Clock::get()?.unix_timestamp;
    let config_key = ctx.accounts.config.key();
    let role = &mut ctx.accounts.provider_role;

    if role.is_initialized() {
        role.activate(timestamp)?;
    } else {
        role.initialize(config_key, provider, ctx.bumps.provider_role, timestamp);
    }

    ctx.accounts.config.record_provider_added(timestamp)?;

    emit!(ProviderAdded {
        config: config_key,
        provider,
        admin: ctx.accounts.admin.key(),
        timestamp,
    });

    msg!("Provider added: {}", provider);

    Ok(())
}

pub fn remove_handler(ctx: Context<RemoveProvider>, provider: Pubkey) -> Result<()> {
    let timestamp = Clock::get()?.unix_timestamp;
    let config_key = ctx.accounts.config.key();

    let role = ctx
        .accounts
        .provider_role
        .as_mut()
        .ok_or(AggregatorError::ProviderNotActive)?;

    let (expected_pda, _) = ProviderRole::find_pda(ctx.program_id, &config_key, &provider);
    require_keys_eq!(role.key(), expected_pda, AggregatorError::ProviderNotActive);

    role.deactivate(timestamp)?;
    ctx.accounts.config.record_provider_removed(timestamp);

    emit!(ProviderRemoved {
        config: config_key,
        provider,
        admin: ctx.accounts.admin.key(),
        timestamp,
    });

    msg!("Provider removed: {}", provider);

    Ok(())
}
