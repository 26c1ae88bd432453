//! Decryption request ledger and oracle callback instructions

pub mod oracle_callback;
pub mod request_decryption;

pub use oracle_callback::*;
pub use request_decryption::*;
