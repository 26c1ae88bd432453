//! Admin Instructions
//!
//! - Provider allowlist management
//! - Pause/unpause
//! - Cooldown, admin and oracle configuration

pub mod authority;
pub mod cooldown;
pub mod oracle_config;
pub mod pause;
pub mod providers;
pub mod unpause;

pub use authority::*;
pub use cooldown::*;
pub use oracle_config::*;
pub use pause::*;
pub use providers::*;
pub use unpause::*;
