//! Asynchronous decryption oracle
//!
//! - **gateway**: assigns request ids and tracks outstanding work
//! - **callback**: verifies and applies oracle responses

pub mod callback;
pub mod gateway;

pub use callback::{
    decode_cleartext, load_request, process_callback, CallbackOutcome,
    CallbackPayload, DeploymentIdentity, CLEARTEXT_LEN,
};
pub use gateway::DecryptionGateway;
