use anchor_lang::prelude::*;

#[error_code]
pub enum AggregatorError {
    // =========================================================================
    // AUTHORIZATION ERRORS
    // =========================================================================

    #[msg("Not authorized: caller lacks the required admin or provider capability")]
    NotAuthorized,

    #[msg("Invalid admin address")]
    InvalidAdmin,

    // =========================================================================
    // AVAILABILITY ERRORS
    // =========================================================================

    #[msg("Aggregator is paused")]
    Paused,

    #[msg("Aggregator is already paused")]
    AlreadyPaused,

    #[msg("Aggregator is not paused")]
    NotPaused,

    // =========================================================================
    // RATE LIMIT ERRORS
    // =========================================================================

    #[msg("Cooldown active: action repeated too soon")]
    CooldownActive,

    #[msg("Cooldown exceeds the allowed maximum")]
    InvalidCooldown,

    // =========================================================================
    // BATCH STATE ERRORS
    // =========================================================================

    #[msg("Current batch is not open")]
    BatchNotOpen,

    #[msg("Invalid batch: unknown id, wrong account, or no contributions")]
    InvalidBatch,

    // =========================================================================
    // CALLBACK INTEGRITY ERRORS
    // =========================================================================

    #[msg("Decryption request already processed")]
    ReplayAttempt,

    #[msg("Batch ciphertext changed since the decryption was requested")]
    StateMismatch,

    #[msg("Invalid proof: decryption result is not signed by the oracle")]
    InvalidProof,

    #[msg("Unknown decryption request")]
    UnknownRequest,

    #[msg("Decrypted payload is not a 64-bit value")]
    MalformedCleartext,

    #[msg("Quoted request id does not match the id assigned by the gateway")]
    RequestIdMismatch,

    // =========================================================================
    // PROVIDER REGISTRY ERRORS
    // =========================================================================

    #[msg("Provider is already active")]
    ProviderAlreadyActive,

    #[msg("Provider is not active")]
    ProviderNotActive,

    // =========================================================================
    // CRYPTOGRAPHY ERRORS
    // =========================================================================

    #[msg("Ciphertext is not a pair of valid BN254 G1 points")]
    InvalidCiphertext,

    #[msg("Invalid oracle configuration")]
    InvalidOracleConfig,

    #[msg("Cryptographic operation failed")]
    CryptographyError,

    // =========================================================================
    // ARITHMETIC
    // =========================================================================

    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
}

impl AggregatorError {
    /// Caller lacks admin/provider/oracle capability
    pub fn is_authorization_error(&self) -> bool {
        matches!(
            self,
            AggregatorError::NotAuthorized | AggregatorError::InvalidAdmin
        )
    }

    /// Operation blocked (or misused) by the pause switch
    pub fn is_availability_error(&self) -> bool {
        matches!(
            self,
            AggregatorError::Paused | AggregatorError::AlreadyPaused | AggregatorError::NotPaused
        )
    }

    pub fn is_rate_limit_error(&self) -> bool {
        matches!(
            self,
            AggregatorError::CooldownActive | AggregatorError::InvalidCooldown
        )
    }

    pub fn is_batch_state_error(&self) -> bool {
        matches!(
            self,
            AggregatorError::BatchNotOpen | AggregatorError::InvalidBatch
        )
    }

    /// Errors terminal for a specific oracle request id
    pub fn is_callback_integrity_error(&self) -> bool {
        matches!(
            self,
            AggregatorError::ReplayAttempt
                | AggregatorError::StateMismatch
                | AggregatorError::InvalidProof
                | AggregatorError::UnknownRequest
                | AggregatorError::MalformedCleartext
                | AggregatorError::RequestIdMismatch
        )
    }

    /// Errors a caller is expected to retry later without changing the request
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AggregatorError::Paused | AggregatorError::CooldownActive
        )
    }
}
