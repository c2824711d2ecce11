//! Lockstake Emission Scheduler
//!
//! Time-based reward emission split across a weighted registry of pools:
//! - `reward_per_second` accrues between distribution ticks
//! - Each tick pulls the accrued amount from the funding source and hands
//!   every pool its weighted share
//! - A pool that rejects its share is skipped for that tick; the others
//!   still receive theirs
//! - Governance changes settle the elapsed period under the old parameters
//!   before applying the new ones

pub mod config;
pub mod report;
pub mod scheduler;

pub use config::SchedulerConfig;
pub use report::{DistributionReport, SkippedPool};
pub use scheduler::{EmissionScheduler, PoolEntry};

/// Module version for API introspection
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
