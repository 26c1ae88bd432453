//! Open Batch Instruction
//!
//! Allocates the next batch id and makes it the contribution target. The
//! previous batch is left as it is: it stops receiving contributions but
//! stays readable and decryptable.

use anchor_lang::prelude::*;

use crate::error::AggregatorError;
use crate::events::BatchOpened;
use crate::state::{AggregatorConfig, Batch};

#[derive(Accounts)]
pub struct OpenBatch<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        mut,
        has_one = admin @ AggregatorError::NotAuthorized,
    )]
    pub config: Box<Account<'info, AggregatorConfig>>,

    #[account(
        init,
        payer = admin,
        space = Batch::LEN,
        seeds = [
            Batch::SEED_PREFIX,
            config.key().as_ref(),
            config.next_batch_id().to_le_bytes().as_ref(),
        ],
        bump,
    )]
    pub batch: Box<Account<'info, Batch>>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<OpenBatch>) -> Result<()> {
    let timestamp = Clock::get()?.unix_timestamp;
    let config = &mut ctx.accounts.config;

    config.require_not_paused()?;

    let batch_id = config.advance_batch(timestamp)?;
    ctx.accounts
        .batch
        .initialize(config.key(), batch_id, ctx.bumps.batch, timestamp);

    emit!(BatchOpened {
        config: config.key(),
        batch_id,
        admin: ctx.accounts.admin.key(),
        timestamp,
    });

    msg!("Batch opened: id={}", batch_id);

    Ok(())
}
