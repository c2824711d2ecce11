//! Lockstake Primitives
//!
//! Shared vocabulary for the pooled staking workspace:
//! - Units (`AccountId`, `Amount`, `Timestamp`) and the per-call context
//! - Fixed-point constants and widened `mul_div` arithmetic
//! - The error taxonomy shared by pools and the emission scheduler
//! - Notifications emitted by every component
//! - Capability traits for the collaborators the core consumes
//!   (token ledger, share ledger, permissions, distribution receivers)

pub mod capabilities;
pub mod constants;
pub mod context;
pub mod errors;
pub mod events;
pub mod math;
pub mod roles;
pub mod units;

pub use capabilities::*;
pub use constants::*;
pub use context::*;
pub use errors::*;
pub use events::*;
pub use math::*;
pub use roles::*;
pub use units::*;

/// Module version for API introspection
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
