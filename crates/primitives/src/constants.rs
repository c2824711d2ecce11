//! Protocol constants

use crate::units::{Amount, Seconds};

/// Fixed-point 1.0 for lock multipliers and escrow portions.
pub const BASE: u128 = 1_000_000_000_000_000_000;

/// Scale applied to points-per-share so per-distribution truncation stays sub-unit.
pub const POINTS_MULTIPLIER: u128 = u128::MAX;

/// Shortest lock any deposit may request; shorter requests are raised to it.
pub const MIN_LOCK_DURATION: Seconds = 10 * 60;

/// Seconds per day, used for lock duration configuration.
pub const SECONDS_PER_DAY: Seconds = 86_400;

/// Maximum number of pools the emission scheduler will register.
pub const MAX_POOL_COUNT: usize = 10;

/// Balances at or below this are not worth a transfer.
pub const DUST_THRESHOLD: Amount = 1;
