//! Initialize Aggregator Instruction
//!
//! Creates the config, the decryption gateway and the creator's provider
//! role. The creator becomes the admin.

use anchor_lang::prelude::*;

use crate::events::{AggregatorInitialized, ProviderAdded};
use crate::oracle::DecryptionGateway;
use crate::state::{AggregatorConfig, ProviderRole};

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(
        init,
        payer = creator,
        space = AggregatorConfig::LEN,
        seeds = [AggregatorConfig::SEED_PREFIX, creator.key().as_ref()],
        bump,
    )]
    pub config: Box<Account<'info, AggregatorConfig>>,

    #[account(
        init,
        payer = creator,
        space = DecryptionGateway::LEN,
        seeds = [DecryptionGateway::SEED_PREFIX, config.key().as_ref()],
        bump,
    )]
    pub gateway: Box<Account<'info, DecryptionGateway>>,

    #[account(
        init,
        payer = creator,
        space = ProviderRole::LEN,
        seeds = [
            ProviderRole::SEED_PREFIX,
            config.key().as_ref(),
            creator.key().as_ref(),
        ],
        bump,
    )]
    pub creator_role: Box<Account<'info, ProviderRole>>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<Initialize>,
    cooldown_seconds: u64,
    oracle_authority: Pubkey,
    oracle_signer: [u8; 20],
) -> Result<()> {
    let timestamp = Clock::get()?.unix_timestamp;

    let creator = ctx.accounts.creator.key();
    let config_key = ctx.accounts.config.key();
    let gateway_key = ctx.accounts.gateway.key();

    let config = &mut ctx.accounts.config;
    config.initialize(
        creator,
        oracle_authority,
        oracle_signer,
        gateway_key,
        cooldown_seconds,
        ctx.bumps.config,
        timestamp,
    )?;

    ctx.accounts.gateway.initialize(config_key, ctx.bumps.gateway);

    ctx.accounts
        .creator_role
        .initialize(config_key, creator, ctx.bumps.creator_role, timestamp);
    config.record_provider_added(timestamp)?;

    emit!(AggregatorInitialized {
        config: config_key,
        admin: creator,
        gateway: gateway_key,
        oracle_authority,
        oracle_signer,
        cooldown_seconds,
        timestamp,
    });

    emit!(ProviderAdded {
        config: config_key,
        provider: creator,
        admin: creator,
        timestamp,
    });

    msg!(
        "Aggregator initialized: admin={}, cooldown={}s, oracle_signer={}",
        creator,
        cooldown_seconds,
        hex::encode(oracle_signer)
    );

    Ok(())
}
