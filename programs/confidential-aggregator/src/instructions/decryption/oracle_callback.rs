//! Oracle Callback Instruction
//!
//! Entry point for decryption results. Only the configured oracle authority
//! may invoke it; the payload itself is authenticated by the oracle proof.
//! Callbacks are accepted while the aggregator is paused so in-flight
//! requests can still complete.

use anchor_lang::prelude::*;

use crate::events::DecryptionCompleted;
use crate::guards;
use crate::oracle::{
    load_request, process_callback, CallbackPayload, DecryptionGateway, DeploymentIdentity,
};
use crate::state::AggregatorConfig;

#[derive(Accounts)]
pub struct OnOracleCallback<'info> {
    pub oracle_authority: Signer<'info>,

    #[account(mut)]
    pub config: Box<Account<'info, AggregatorConfig>>,

    #[account(
        mut,
        seeds = [DecryptionGateway::SEED_PREFIX, config.key().as_ref()],
        bump = gateway.bump,
    )]
    pub gateway: Box<Account<'info, DecryptionGateway>>,

    /// CHECK: Loaded in the handler; a missing account is an unknown request
    #[account(mut)]
    pub decryption_request: UncheckedAccount<'info>,

    /// CHECK: Loaded in the handler as the batch the request targets
    #[account(mut)]
    pub batch: UncheckedAccount<'info>,
}

pub fn handler(
    ctx: Context<OnOracleCallback>,
    request_id: [u8; 32],
    cleartext: Vec<u8>,
    proof: Vec<u8>,
) -> Result<()> {
    let timestamp = Clock::get()?.unix_timestamp;
    let oracle_authority = ctx.accounts.oracle_authority.key();
    let config = &mut ctx.accounts.config;
    let config_key = config.key();

    config.require_oracle_authority(&oracle_authority)?;

    let request_info = ctx.accounts.decryption_request.to_account_info();
    let mut request = load_request(ctx.program_id, &config_key, &request_id, &request_info)?;

    // Replay is reported before anything about the batch is looked at
    request.require_pending()?;

    let batch_info = ctx.accounts.batch.to_account_info();
    let mut batch = guards::load_batch(ctx.program_id, &config_key, request.batch_id, &batch_info)?;

    let identity = DeploymentIdentity {
        program_id: *ctx.program_id,
        config: config_key,
    };
    let payload = CallbackPayload {
        request_id,
        cleartext: &cleartext,
        proof: &proof,
    };
    let outcome = process_callback(
        &identity,
        config,
        &mut ctx.accounts.gateway,
        &mut request,
        &mut batch,
        &payload,
        timestamp,
    )?;

    guards::write_back(&request_info, &request)?;
    guards::write_back(&batch_info, &batch)?;

    emit!(DecryptionCompleted {
        config: config_key,
        request_id: outcome.request_id,
        batch_id: outcome.batch_id,
        value: outcome.value,
        oracle_authority,
        timestamp,
    });

    msg!(
        "Decryption completed: batch={}, request={}, value={}",
        outcome.batch_id,
        hex::encode(outcome.request_id),
        outcome.value
    );

    Ok(())
}
