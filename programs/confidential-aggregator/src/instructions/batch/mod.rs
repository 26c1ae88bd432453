//! Encrypted batch ledger instructions

pub mod close_batch;
pub mod open_batch;
pub mod submit_encrypted_result;

pub use close_batch::*;
pub use open_batch::*;
pub use submit_encrypted_result::*;
