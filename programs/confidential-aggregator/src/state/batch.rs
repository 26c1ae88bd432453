//! Encrypted Batch - Homomorphic Accumulator
//!
//! One account per batch. Providers only ever contribute to the current
//! batch (`AggregatorConfig::current_batch_id`); older batches stay readable
//! so decryptions requested against them can still complete.
//!
//! # Accumulation
//! The first contribution becomes the accumulator. Every later one is added
//! into it with point-wise G1 addition, so the accumulator always encrypts
//! the sum of everything contributed so far.
//!
//! # PDA Seeds
//! `[b"batch", config.key().as_ref(), batch_id.to_le_bytes().as_ref()]`

use anchor_lang::prelude::*;

use crate::crypto::{state_fingerprint, EncryptedValue};
use crate::error::AggregatorError;

#[account]
#[derive(Default, Debug)]
pub struct Batch {
    pub config: Pubkey,

    /// Monotonic id, starting at 1
    pub batch_id: u64,

    pub is_open: bool,

    pub contribution_count: u32,

    /// Running homomorphic sum (None until the first contribution)
    pub accumulator: Option<EncryptedValue>,

    pub opened_at: i64,

    /// 0 while open
    pub closed_at: i64,

    pub last_contribution_at: i64,

    /// Decryption requests dispatched against this batch
    pub decryption_requests: u32,

    /// Most recent cleartext sum accepted from the oracle
    pub revealed_sum: Option<u64>,

    pub bump: u8,
    pub version: u8,
}

impl Batch {
    pub const SEED_PREFIX: &'static [u8] = b"batch";

    pub const LEN: usize = 8  // discriminator
        + 32  // config
        + 8   // batch_id
        + 1   // is_open
        + 4   // contribution_count
        + 1 + EncryptedValue::LEN // accumulator
        + 8   // opened_at
        + 8   // closed_at
        + 8   // last_contribution_at
        + 4   // decryption_requests
        + 1 + 8 // revealed_sum
        + 1   // bump
        + 1; // version

    pub const VERSION: u8 = 1;

    pub fn initialize(&mut self, config: Pubkey, batch_id: u64, bump: u8, timestamp: i64) {
        self.config = config;
        self.batch_id = batch_id;
        self.is_open = true;
        self.contribution_count = 0;
        self.accumulator = None;
        self.opened_at = timestamp;
        self.closed_at = 0;
        self.last_contribution_at = 0;
        self.decryption_requests = 0;
        self.revealed_sum = None;
        self.bump = bump;
        self.version = Self::VERSION;
    }

    #[inline]
    pub fn require_open(&self) -> Result<()> {
        require!(self.is_open, AggregatorError::BatchNotOpen);
        Ok(())
    }

    /// Stop accepting contributions. The account itself stays in place.
    ///
    /// Sealing an already closed batch fails.
    pub fn seal(&mut self, timestamp: i64) -> Result<()> {
        self.require_open()?;
        self.is_open = false;
        self.closed_at = timestamp;
        Ok(())
    }

    /// Fold a contribution into the accumulator.
    ///
    /// Returns the contribution's zero-based index within the batch.
    pub fn accumulate(&mut self, ciphertext: &EncryptedValue, timestamp: i64) -> Result<u32> {
        self.require_open()?;
        ciphertext.validate()?;

        let next = match &self.accumulator {
            None => *ciphertext,
            Some(current) => current.add(ciphertext)?,
        };

        let index = self.contribution_count;
        self.contribution_count = index
            .checked_add(1)
            .ok_or(AggregatorError::ArithmeticOverflow)?;
        self.accumulator = Some(next);
        self.last_contribution_at = timestamp;
        Ok(index)
    }

    /// Current accumulator, which must hold at least one contribution.
    pub fn snapshot(&self) -> Result<EncryptedValue> {
        match self.accumulator {
            Some(accumulator) if self.contribution_count > 0 => Ok(accumulator),
            _ => err!(AggregatorError::InvalidBatch),
        }
    }

    /// Fingerprint of the current snapshot and contribution count.
    pub fn fingerprint(&self, program_id: &Pubkey) -> Result<[u8; 32]> {
        let snapshot = self.snapshot()?;
        Ok(state_fingerprint(
            program_id,
            &self.config,
            &snapshot,
            self.contribution_count,
        ))
    }

    pub fn record_decryption_request(&mut self) -> Result<()> {
        self.decryption_requests = self
            .decryption_requests
            .checked_add(1)
            .ok_or(AggregatorError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn record_revealed_sum(&mut self, value: u64) {
        self.revealed_sum = Some(value);
    }

    pub fn find_pda(program_id: &Pubkey, config: &Pubkey, batch_id: u64) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[Self::SEED_PREFIX, config.as_ref(), &batch_id.to_le_bytes()],
            program_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{encrypt, u64_to_scalar, ElGamalKeypair};

    fn open_batch() -> Batch {
        let mut batch = Batch::default();
        batch.initialize(Pubkey::new_unique(), 1, 253, 100);
        batch
    }

    fn keypair() -> ElGamalKeypair {
        ElGamalKeypair::from_secret(u64_to_scalar(424242)).unwrap()
    }

    #[test]
    fn test_batch_size() {
        assert_eq!(Batch::LEN, 221);
    }

    #[test]
    fn first_contribution_becomes_accumulator() {
        let kp = keypair();
        let ct = encrypt(&kp.public, 5, &u64_to_scalar(11)).unwrap();

        let mut batch = open_batch();
        assert_eq!(batch.accumulate(&ct, 101).unwrap(), 0);
        assert_eq!(batch.accumulator, Some(ct));
        assert_eq!(batch.contribution_count, 1);
        assert_eq!(batch.last_contribution_at, 101);
    }

    #[test]
    fn accumulation_order_does_not_matter() {
        let kp = keypair();
        let values = [3u64, 9, 14];
        let cts: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(i, v)| encrypt(&kp.public, *v, &u64_to_scalar(50 + i as u64)).unwrap())
            .collect();

        let mut forward = open_batch();
        for ct in &cts {
            forward.accumulate(ct, 1).unwrap();
        }
        let mut backward = open_batch();
        for ct in cts.iter().rev() {
            backward.accumulate(ct, 1).unwrap();
        }

        assert_eq!(forward.accumulator, backward.accumulator);
        assert_eq!(forward.contribution_count, 3);
        assert_eq!(kp.decrypt(&forward.snapshot().unwrap(), 64).unwrap(), Some(26));
    }

    #[test]
    fn empty_batch_has_no_snapshot() {
        let batch = open_batch();
        assert_eq!(batch.snapshot().unwrap_err(), AggregatorError::InvalidBatch.into());
    }

    #[test]
    fn closed_batch_rejects_contributions_and_second_close() {
        let kp = keypair();
        let ct = encrypt(&kp.public, 1, &u64_to_scalar(2)).unwrap();

        let mut batch = open_batch();
        batch.seal(200).unwrap();
        assert_eq!(batch.closed_at, 200);
        assert_eq!(batch.seal(201).unwrap_err(), AggregatorError::BatchNotOpen.into());
        assert_eq!(
            batch.accumulate(&ct, 202).unwrap_err(),
            AggregatorError::BatchNotOpen.into()
        );
        assert_eq!(batch.contribution_count, 0);
    }

    #[test]
    fn invalid_ciphertext_leaves_batch_untouched() {
        let kp = keypair();
        let good = encrypt(&kp.public, 1, &u64_to_scalar(2)).unwrap();
        let bad = EncryptedValue { c1: [3u8; 64], c2: good.c2 };

        let mut batch = open_batch();
        batch.accumulate(&good, 1).unwrap();
        assert_eq!(
            batch.accumulate(&bad, 2).unwrap_err(),
            AggregatorError::InvalidCiphertext.into()
        );
        assert_eq!(batch.contribution_count, 1);
        assert_eq!(batch.accumulator, Some(good));
    }

    #[test]
    fn every_contribution_moves_the_fingerprint() {
        let kp = keypair();
        let mut batch = open_batch();
        batch.accumulate(&encrypt(&kp.public, 5, &u64_to_scalar(7)).unwrap(), 1).unwrap();
        let before = batch.fingerprint(&crate::ID).unwrap();

        // An identity ciphertext would leave the accumulator unchanged
        let zero = EncryptedValue { c1: [0u8; 64], c2: [0u8; 64] };
        assert_eq!(
            batch.accumulate(&zero, 2).unwrap_err(),
            AggregatorError::InvalidCiphertext.into()
        );
        assert_eq!(batch.contribution_count, 1);
        assert_eq!(batch.fingerprint(&crate::ID).unwrap(), before);

        batch.accumulate(&encrypt(&kp.public, 0, &u64_to_scalar(8)).unwrap(), 3).unwrap();
        assert_ne!(batch.fingerprint(&crate::ID).unwrap(), before);
    }

    #[test]
    fn empty_batch_has_no_fingerprint() {
        let batch = open_batch();
        assert_eq!(
            batch.fingerprint(&crate::ID).unwrap_err(),
            AggregatorError::InvalidBatch.into()
        );
    }

    #[test]
    fn pda_depends_on_batch_id() {
        let program_id = Pubkey::new_unique();
        let config = Pubkey::new_unique();
        assert_ne!(
            Batch::find_pda(&program_id, &config, 1).0,
            Batch::find_pda(&program_id, &config, 2).0
        );
    }
}
