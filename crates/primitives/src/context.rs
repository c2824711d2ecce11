use crate::units::{AccountId, Timestamp};

/// Caller identity and host time for a single entry-point invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: AccountId,
    pub now: Timestamp,
}

impl CallContext {
    pub fn new(caller: AccountId, now: Timestamp) -> Self {
        Self { caller, now }
    }

    /// Same instant, issued by a different party (a pool calling its escrow,
    /// the scheduler calling a pool).
    pub fn with_caller(&self, caller: AccountId) -> Self {
        Self {
            caller,
            now: self.now,
        }
    }
}
