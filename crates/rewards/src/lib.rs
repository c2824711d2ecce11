//! Lockstake Reward Accounting
//!
//! Pro-rata reward accrual for a pool's claim-shares:
//! - A global, monotonically non-decreasing `points_per_share`
//! - Per-account signed correction terms so minting, burning and
//!   transferring shares never changes what an account has already earned
//! - Withdrawn-reward bookkeeping separated from the token transfer itself

pub mod accounting;

pub use accounting::{RewardState, ShareDelta};
