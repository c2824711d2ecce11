//! Lockstake Runtime
//!
//! Host for a complete deployment: one token ledger, every pool and the
//! emission scheduler, driven through serialized entry points that either
//! commit entirely or leave no trace.

pub mod config;
pub mod issuance;
pub mod runtime;

pub use config::{PoolSpec, RolesSpec, RuntimeConfig, SchedulerSpec, TokenBalance};
pub use issuance::TokenIssuance;
pub use runtime::StakingRuntime;

/// Module version for API introspection
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
