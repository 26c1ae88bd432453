//! State accounts for the confidential aggregator
//!
//! # Account Hierarchy
//!
//! ```text
//! AggregatorConfig (root PDA)
//! ├── ProviderRole[N] (per provider)
//! ├── Batch[N] (per batch id)
//! ├── DecryptionGateway (oracle intake, see `oracle::gateway`)
//! └── DecryptionRequest[N] (per request id)
//! ```
//!
//! # PDA Seeds
//!
//! | Account | Seeds |
//! |---------|-------|
//! | AggregatorConfig | `[b"aggregator_config", creator]` |
//! | ProviderRole | `[b"provider", config, provider]` |
//! | Batch | `[b"batch", config, batch_id_le]` |
//! | DecryptionRequest | `[b"decryption_request", config, request_id]` |
//! | DecryptionGateway | `[b"decryption_gateway", config]` |

pub mod aggregator_config;
pub mod batch;
pub mod decryption_request;
pub mod provider_role;

pub use aggregator_config::{AggregatorConfig, MAX_COOLDOWN_SECONDS};
pub use batch::Batch;
pub use decryption_request::DecryptionRequest;
pub use provider_role::{ProviderRole, RateLimitedAction};
