use lockstake_primitives::{Amount, Seconds, Timestamp, MIN_LOCK_DURATION};
use serde::{Deserialize, Serialize};

/// A single locked principal. Positions in an account's deposit list are
/// not stable: withdrawal swaps the last entry into the freed slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub amount: Amount,
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Deposit {
    pub fn duration(&self) -> Seconds {
        self.end.saturating_sub(self.start)
    }

    pub fn is_unlocked(&self, now: Timestamp) -> bool {
        now >= self.end
    }
}

/// `min(requested, max_lock)` raised to at least `MIN_LOCK_DURATION`.
pub fn clamp_lock_duration(requested: Seconds, max_lock: Seconds) -> Seconds {
    requested.min(max_lock).max(MIN_LOCK_DURATION)
}
