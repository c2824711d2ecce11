//! Outcome of a single emission tick

use lockstake_primitives::{AccountId, Amount, Seconds};
use serde::{Deserialize, Serialize};

/// A pool whose intake failed during a tick. Its allocation is not carried
/// forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPool {
    pub pool: AccountId,
    pub amount: Amount,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionReport {
    /// Seconds settled by this tick
    pub elapsed: Seconds,
    /// Amount pulled from the funding source
    pub total: Amount,
    pub delivered: Vec<(AccountId, Amount)>,
    pub skipped: Vec<SkippedPool>,
    /// Leftover swept back to the funding source
    pub returned: Amount,
}

impl DistributionReport {
    pub fn delivered_to(&self, pool: &AccountId) -> Amount {
        self.delivered
            .iter()
            .filter(|(p, _)| p == pool)
            .map(|(_, amount)| *amount)
            .sum()
    }

    pub fn total_delivered(&self) -> Amount {
        self.delivered.iter().map(|(_, amount)| *amount).sum()
    }

    pub fn was_skipped(&self, pool: &AccountId) -> bool {
        self.skipped.iter().any(|s| &s.pool == pool)
    }
}
