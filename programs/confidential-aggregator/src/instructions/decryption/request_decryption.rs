//! Request Decryption Instruction
//!
//! Snapshots a batch accumulator, fingerprints it and hands it to the
//! decryption gateway. The request account is addressed by the id the
//! gateway is about to assign, so the client reads
//! `DecryptionGateway::peek_request_id` first and quotes it here.
//!
//! # Checks (in order)
//! 1. caller holds an active provider role
//! 2. aggregator is not paused
//! 3. provider's decryption-request cooldown has elapsed
//! 4. batch id is known and the batch has at least one contribution
//! 5. quoted request id equals the gateway's assignment

use anchor_lang::prelude::*;

use crate::error::AggregatorError;
use crate::events::{DecryptionDispatched, DecryptionRequested};
use crate::guards;
use crate::oracle::DecryptionGateway;
use crate::state::{AggregatorConfig, DecryptionRequest, ProviderRole, RateLimitedAction};

#[derive(Accounts)]
#[instruction(batch_id: u64, request_id: [u8; 32])]
pub struct RequestDecryption<'info> {
    #[account(mut)]
    pub requester: Signer<'info>,

    #[account(mut)]
    pub config: Box<Account<'info, AggregatorConfig>>,

    #[account(
        mut,
        seeds = [DecryptionGateway::SEED_PREFIX, config.key().as_ref()],
        bump = gateway.bump,
    )]
    pub gateway: Box<Account<'info, DecryptionGateway>>,

    /// Provider role PDA (verified manually in the handler)
    #[account(mut)]
    pub provider_role: Option<Account<'info, ProviderRole>>,

    /// CHECK: Loaded in the handler as batch `batch_id` of `config`
    #[account(mut)]
    pub batch: UncheckedAccount<'info>,

    #[account(
        init,
        payer = requester,
        space = DecryptionRequest::LEN,
        seeds = [
            DecryptionRequest::SEED_PREFIX,
            config.key().as_ref(),
            request_id.as_ref(),
        ],
        bump,
    )]
    pub decryption_request: Box<Account<'info, DecryptionRequest>>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<RequestDecryption>,
    batch_id: u64,
    request_id: [u8; 32],
) -> Result<()> {
    let timestamp = Clock::get()?.unix_timestamp;
    let requester = ctx.accounts.requester.key();
    let config = &mut ctx.accounts.config;
    let config_key = config.key();

    // =========================================================================
    // 1. AUTHORIZATION, PAUSE, COOLDOWN
    // =========================================================================

    let role = ctx
        .accounts
        .provider_role
        .as_mut()
        .ok_or(AggregatorError::NotAuthorized)?;
    let role_key = role.key();
    guards::require_active_provider(
        ctx.program_id,
        &config_key,
        &requester,
        Some((&role_key, &**role)),
    )?;

    config.require_not_paused()?;
    role.require_cooldown_elapsed(
        RateLimitedAction::DecryptionRequest,
        config.cooldown_seconds,
        timestamp,
    )?;

    // =========================================================================
    // 2. SNAPSHOT AND FINGERPRINT
    // =========================================================================

    guards::require_known_batch(config, batch_id)?;
    let batch_info = ctx.accounts.batch.to_account_info();
    let mut batch = guards::load_batch(ctx.program_id, &config_key, batch_id, &batch_info)?;

    let snapshot = batch.snapshot()?;
    let fingerprint = batch.fingerprint(ctx.program_id)?;

    // =========================================================================
    // 3. DISPATCH TO GATEWAY
    // =========================================================================

    let gateway = &mut ctx.accounts.gateway;
    let gateway_key = gateway.key();
    let assigned_id = gateway.dispatch(&gateway_key)?;
    if assigned_id != request_id {
        msg!(
            "Request id mismatch: quoted={} assigned={}",
            hex::encode(request_id),
            hex::encode(assigned_id)
        );
        return err!(AggregatorError::RequestIdMismatch);
    }

    emit!(DecryptionDispatched {
        config: config_key,
        gateway: gateway_key,
        request_id,
        ciphertext: snapshot,
        callback_program: *ctx.program_id,
        timestamp,
    });

    // =========================================================================
    // 4. RECORD
    // =========================================================================

    ctx.accounts.decryption_request.initialize(
        config_key,
        request_id,
        batch_id,
        fingerprint,
        requester,
        ctx.bumps.decryption_request,
        timestamp,
    );

    batch.record_decryption_request()?;
    guards::write_back(&batch_info, &batch)?;

    role.record_action(RateLimitedAction::DecryptionRequest, timestamp)?;
    config.record_decryption_request(timestamp)?;

    emit!(DecryptionRequested {
        config: config_key,
        request_id,
        batch_id,
        state_fingerprint: fingerprint,
        requester,
        timestamp,
    });

    msg!(
        "Decryption requested: batch={}, request={}, fingerprint={}",
        batch_id,
        hex::encode(request_id),
        hex::encode(fingerprint)
    );

    Ok(())
}
