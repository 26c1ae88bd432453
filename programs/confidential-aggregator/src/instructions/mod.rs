//! Instruction handlers for the confidential aggregator
//!
//! # Module Organization
//!
//! - **initialize**: config, gateway and creator role
//! - **admin**: provider allowlist, pause/unpause, cooldown, admin and oracle
//! - **batch**: open/close batches and encrypted submissions
//! - **decryption**: decryption requests and the oracle callback

pub mod admin;
pub mod batch;
pub mod decryption;
pub mod initialize;

pub use admin::*;
pub use batch::*;
pub use decryption::*;
pub use initialize::*;
