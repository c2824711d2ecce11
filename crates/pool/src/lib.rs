//! Lockstake Time-Locked Pool
//!
//! Duration-weighted staking pool:
//! - Deposits lock principal and mint claim-shares scaled by a lock multiplier
//! - Expired deposits are withdrawn whole, burning the shares they minted
//! - Claimed rewards split into an escrowed re-lock and a liquid transfer
//! - Reward intake from the emission scheduler via `DistributionReceiver`

pub mod config;
pub mod deposit;
pub mod pool;

pub use config::PoolConfig;
pub use deposit::{clamp_lock_duration, Deposit};
pub use pool::{ClaimOutcome, DepositReceipt, TimeLockedPool};
