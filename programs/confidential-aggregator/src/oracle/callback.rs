//! Oracle callback verification pipeline.
//!
//! A callback is accepted only if every guard below passes, in this order:
//!
//! 1. the request exists (`UnknownRequest`)
//! 2. it has not been processed yet (`ReplayAttempt`)
//! 3. the supplied batch is the one the request targets (`InvalidBatch`)
//! 4. the batch ciphertext still hashes to the recorded fingerprint
//!    (`StateMismatch`)
//! 5. the proof is the oracle signer's signature over the result
//!    (`InvalidProof`)
//! 6. the cleartext decodes as a little-endian u64 (`MalformedCleartext`)
//!
//! Nothing is written until all of them pass.

use anchor_lang::prelude::*;

use crate::crypto::{result_digest, verify_oracle_proof};
use crate::error::AggregatorError;
use crate::oracle::gateway::DecryptionGateway;
use crate::state::{AggregatorConfig, Batch, DecryptionRequest};

/// Size of an encoded cleartext sum
pub const CLEARTEXT_LEN: usize = 8;

/// Program id and config key of one deployed aggregator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeploymentIdentity {
    pub program_id: Pubkey,
    pub config: Pubkey,
}

/// Untrusted data delivered by the oracle.
#[derive(Clone, Copy, Debug)]
pub struct CallbackPayload<'a> {
    pub request_id: [u8; 32],
    pub cleartext: &'a [u8],
    pub proof: &'a [u8],
}

/// Result of an accepted callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallbackOutcome {
    pub request_id: [u8; 32],
    pub batch_id: u64,
    pub value: u64,
}

/// Decode an oracle cleartext: exactly 8 bytes, little-endian.
pub fn decode_cleartext(cleartext: &[u8]) -> Result<u64> {
    let bytes: [u8; CLEARTEXT_LEN] = cleartext
        .try_into()
        .map_err(|_| error!(AggregatorError::MalformedCleartext))?;
    Ok(u64::from_le_bytes(bytes))
}

/// Run the guard pipeline and, on success, finalize the request.
pub fn process_callback(
    identity: &DeploymentIdentity,
    config: &mut AggregatorConfig,
    gateway: &mut DecryptionGateway,
    request: &mut DecryptionRequest,
    batch: &mut Batch,
    payload: &CallbackPayload,
    timestamp: i64,
) -> Result<CallbackOutcome> {
    require!(
        request.config == identity.config && request.request_id == payload.request_id,
        AggregatorError::UnknownRequest
    );

    request.require_pending()?;

    require!(
        batch.config == identity.config && batch.batch_id == request.batch_id,
        AggregatorError::InvalidBatch
    );

    let live_fingerprint = batch
        .fingerprint(&identity.program_id)
        .map_err(|_| error!(AggregatorError::StateMismatch))?;
    if live_fingerprint != request.state_fingerprint {
        msg!(
            "State drift: request={} recorded={} live={}",
            hex::encode(request.request_id),
            hex::encode(request.state_fingerprint),
            hex::encode(live_fingerprint)
        );
        return err!(AggregatorError::StateMismatch);
    }

    let digest = result_digest(
        &identity.program_id,
        &identity.config,
        &request.request_id,
        &request.state_fingerprint,
        payload.cleartext,
    );
    verify_oracle_proof(&digest, payload.proof, &config.oracle_signer)?;

    let value = decode_cleartext(payload.cleartext)?;

    request.mark_processed(value, timestamp)?;
    batch.record_revealed_sum(value);
    gateway.record_fulfilled()?;
    config.record_decryption_completed(timestamp)?;

    Ok(CallbackOutcome {
        request_id: request.request_id,
        batch_id: request.batch_id,
        value,
    })
}

/// Load the request account the callback refers to.
///
/// Anything other than an initialized request at the expected address is an
/// unknown request.
pub fn load_request(
    program_id: &Pubkey,
    config: &Pubkey,
    request_id: &[u8; 32],
    info: &AccountInfo,
) -> Result<DecryptionRequest> {
    let (expected, _) = DecryptionRequest::find_pda(program_id, config, request_id);
    require_keys_eq!(info.key(), expected, AggregatorError::UnknownRequest);
    require!(
        info.owner == program_id && !info.data_is_empty(),
        AggregatorError::UnknownRequest
    );

    let data = info.try_borrow_data()?;
    DecryptionRequest::try_deserialize(&mut &data[..])
        .map_err(|_| error!(AggregatorError::UnknownRequest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{encrypt, eth_address, u64_to_scalar, ElGamalKeypair, EncryptedValue};
    use libsecp256k1::{sign, Message, PublicKey, SecretKey};

    const NOW: i64 = 1_700_000_000;

    struct Fixture {
        identity: DeploymentIdentity,
        config: AggregatorConfig,
        gateway: DecryptionGateway,
        request: DecryptionRequest,
        batch: Batch,
        oracle: SecretKey,
        elgamal: ElGamalKeypair,
    }

    fn ciphertext(elgamal: &ElGamalKeypair, value: u64, r: u64) -> EncryptedValue {
        encrypt(&elgamal.public, value, &u64_to_scalar(r)).unwrap()
    }

    /// Batch with 5 and 7 contributed and one pending request against it.
    fn fixture() -> Fixture {
        let identity = DeploymentIdentity {
            program_id: crate::ID,
            config: Pubkey::new_unique(),
        };

        let oracle = SecretKey::parse(&[0x42; 32]).unwrap();
        let public = PublicKey::from_secret_key(&oracle).serialize();
        let mut xy = [0u8; 64];
        xy.copy_from_slice(&public[1..]);

        let gateway_key = Pubkey::new_unique();
        let mut config = AggregatorConfig::default();
        config
            .initialize(
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                eth_address(&xy),
                gateway_key,
                0,
                255,
                NOW,
            )
            .unwrap();
        config.advance_batch(NOW).unwrap();

        let elgamal = ElGamalKeypair::from_secret(u64_to_scalar(777)).unwrap();
        let mut batch = Batch::default();
        batch.initialize(identity.config, 1, 250, NOW);
        batch.accumulate(&ciphertext(&elgamal, 5, 31), NOW).unwrap();
        batch.accumulate(&ciphertext(&elgamal, 7, 37), NOW).unwrap();

        let mut gateway = DecryptionGateway::default();
        gateway.initialize(identity.config, 254);
        let request_id = gateway.dispatch(&gateway_key).unwrap();

        let fingerprint = batch.fingerprint(&identity.program_id).unwrap();
        let mut request = DecryptionRequest::default();
        request.initialize(
            identity.config,
            request_id,
            1,
            fingerprint,
            Pubkey::new_unique(),
            253,
            NOW,
        );

        Fixture { identity, config, gateway, request, batch, oracle, elgamal }
    }

    fn signed_proof(f: &Fixture, cleartext: &[u8]) -> Vec<u8> {
        let digest = result_digest(
            &f.identity.program_id,
            &f.identity.config,
            &f.request.request_id,
            &f.request.state_fingerprint,
            cleartext,
        );
        let (signature, recovery_id) = sign(&Message::parse(&digest), &f.oracle);
        let mut proof = signature.serialize().to_vec();
        proof.push(recovery_id.serialize());
        proof
    }

    fn run(f: &mut Fixture, cleartext: &[u8], proof: &[u8]) -> Result<CallbackOutcome> {
        let payload = CallbackPayload {
            request_id: f.request.request_id,
            cleartext,
            proof,
        };
        process_callback(
            &f.identity,
            &mut f.config,
            &mut f.gateway,
            &mut f.request,
            &mut f.batch,
            &payload,
            NOW + 60,
        )
    }

    #[test]
    fn accepts_genuine_result() {
        let mut f = fixture();
        let sum = f.elgamal.decrypt(&f.batch.snapshot().unwrap(), 100).unwrap().unwrap();
        assert_eq!(sum, 12);

        let cleartext = sum.to_le_bytes();
        let proof = signed_proof(&f, &cleartext);
        let outcome = run(&mut f, &cleartext, &proof).unwrap();

        assert_eq!(outcome.value, 12);
        assert_eq!(outcome.batch_id, 1);
        assert!(f.request.processed);
        assert_eq!(f.request.decrypted_value, 12);
        assert_eq!(f.request.completed_at, NOW + 60);
        assert_eq!(f.batch.revealed_sum, Some(12));
        assert_eq!(f.gateway.outstanding, 0);
        assert_eq!(f.config.total_decryptions_completed, 1);
    }

    #[test]
    fn replay_is_rejected_without_changes() {
        let mut f = fixture();
        let cleartext = 12u64.to_le_bytes();
        let proof = signed_proof(&f, &cleartext);
        run(&mut f, &cleartext, &proof).unwrap();

        let err = run(&mut f, &cleartext, &proof).unwrap_err();
        assert_eq!(err, AggregatorError::ReplayAttempt.into());
        assert_eq!(f.request.decrypted_value, 12);
        assert_eq!(f.config.total_decryptions_completed, 1);
    }

    #[test]
    fn drift_is_rejected() {
        let mut f = fixture();
        let extra = ciphertext(&f.elgamal, 1, 41);
        f.batch.accumulate(&extra, NOW + 1).unwrap();

        let cleartext = 12u64.to_le_bytes();
        let proof = signed_proof(&f, &cleartext);
        let err = run(&mut f, &cleartext, &proof).unwrap_err();

        assert_eq!(err, AggregatorError::StateMismatch.into());
        assert!(!f.request.processed);
        assert_eq!(f.batch.revealed_sum, None);
    }

    #[test]
    fn contribution_count_change_alone_is_drift() {
        let mut f = fixture();
        let accumulator = f.batch.accumulator;
        f.batch.contribution_count += 1;
        assert_eq!(f.batch.accumulator, accumulator);

        let cleartext = 12u64.to_le_bytes();
        let proof = signed_proof(&f, &cleartext);
        let err = run(&mut f, &cleartext, &proof).unwrap_err();

        assert_eq!(err, AggregatorError::StateMismatch.into());
        assert!(!f.request.processed);
    }

    #[test]
    fn replay_is_reported_before_drift() {
        let mut f = fixture();
        let cleartext = 12u64.to_le_bytes();
        let proof = signed_proof(&f, &cleartext);
        run(&mut f, &cleartext, &proof).unwrap();

        let extra = ciphertext(&f.elgamal, 1, 43);
        f.batch.accumulate(&extra, NOW + 2).unwrap();

        let err = run(&mut f, &cleartext, &proof).unwrap_err();
        assert_eq!(err, AggregatorError::ReplayAttempt.into());
    }

    #[test]
    fn forged_proof_is_rejected() {
        let mut f = fixture();
        let cleartext = 12u64.to_le_bytes();
        f.oracle = SecretKey::parse(&[0x43; 32]).unwrap();
        let proof = signed_proof(&f, &cleartext);

        let err = run(&mut f, &cleartext, &proof).unwrap_err();
        assert_eq!(err, AggregatorError::InvalidProof.into());
        assert!(!f.request.processed);
    }

    #[test]
    fn proof_for_other_value_is_rejected() {
        let mut f = fixture();
        let proof = signed_proof(&f, &12u64.to_le_bytes());

        let err = run(&mut f, &13u64.to_le_bytes(), &proof).unwrap_err();
        assert_eq!(err, AggregatorError::InvalidProof.into());
    }

    #[test]
    fn malformed_cleartext_is_rejected_after_proof() {
        let mut f = fixture();
        let cleartext = [1u8, 2, 3];
        let proof = signed_proof(&f, &cleartext);

        let err = run(&mut f, &cleartext, &proof).unwrap_err();
        assert_eq!(err, AggregatorError::MalformedCleartext.into());
        assert!(!f.request.processed);
    }

    #[test]
    fn wrong_batch_is_rejected() {
        let mut f = fixture();
        f.batch.batch_id = 2;
        let cleartext = 12u64.to_le_bytes();
        let proof = signed_proof(&f, &cleartext);

        let err = run(&mut f, &cleartext, &proof).unwrap_err();
        assert_eq!(err, AggregatorError::InvalidBatch.into());
    }

    #[test]
    fn mismatched_request_id_is_unknown() {
        let mut f = fixture();
        let cleartext = 12u64.to_le_bytes();
        let proof = signed_proof(&f, &cleartext);
        let payload = CallbackPayload {
            request_id: [0xEE; 32],
            cleartext: &cleartext,
            proof: &proof,
        };

        let err = process_callback(
            &f.identity,
            &mut f.config,
            &mut f.gateway,
            &mut f.request,
            &mut f.batch,
            &payload,
            NOW,
        )
        .unwrap_err();
        assert_eq!(err, AggregatorError::UnknownRequest.into());
    }

    #[test]
    fn cleartext_decoding() {
        assert_eq!(decode_cleartext(&42u64.to_le_bytes()).unwrap(), 42);
        assert!(decode_cleartext(&[]).is_err());
        assert!(decode_cleartext(&[0u8; 9]).is_err());
    }

    #[test]
    fn load_request_checks_address_and_owner() {
        let config = Pubkey::new_unique();
        let request_id = [9u8; 32];
        let (address, _) = DecryptionRequest::find_pda(&crate::ID, &config, &request_id);

        let mut request = DecryptionRequest::default();
        request.initialize(config, request_id, 1, [0u8; 32], Pubkey::new_unique(), 1, NOW);
        let mut data = Vec::new();
        request.try_serialize(&mut data).unwrap();

        let mut lamports = 1_000_000u64;
        let owner = crate::ID;
        let info =
            AccountInfo::new(&address, false, true, &mut lamports, &mut data, &owner, false, 0);
        let loaded = load_request(&crate::ID, &config, &request_id, &info).unwrap();
        assert_eq!(loaded.request_id, request_id);

        let err = load_request(&crate::ID, &config, &[8u8; 32], &info).unwrap_err();
        assert_eq!(err, AggregatorError::UnknownRequest.into());
    }

    #[test]
    fn load_request_rejects_missing_account() {
        let config = Pubkey::new_unique();
        let request_id = [9u8; 32];
        let (address, _) = DecryptionRequest::find_pda(&crate::ID, &config, &request_id);

        let mut data: Vec<u8> = Vec::new();
        let mut lamports = 0u64;
        let system = anchor_lang::system_program::ID;
        let info =
            AccountInfo::new(&address, false, true, &mut lamports, &mut data, &system, false, 0);

        let err = load_request(&crate::ID, &config, &request_id, &info).unwrap_err();
        assert_eq!(err, AggregatorError::UnknownRequest.into());
    }
}
