//! Notifications emitted by pools and the emission scheduler
//!
//! Events are for observers only; nothing inside the core reads them back.

use crate::units::{AccountId, Amount, Seconds, Weight};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StakingEvent {
    /// Reward tokens entered a pool's accrual rate.
    RewardsDistributed {
        pool: AccountId,
        distributor: AccountId,
        amount: Amount,
    },
    /// Accrued rewards were marked as withdrawn for an account.
    RewardsWithdrawn {
        pool: AccountId,
        account: AccountId,
        amount: Amount,
    },
    Deposited {
        pool: AccountId,
        depositor: AccountId,
        receiver: AccountId,
        amount: Amount,
        duration: Seconds,
        shares: Amount,
    },
    Withdrawn {
        pool: AccountId,
        account: AccountId,
        receiver: AccountId,
        deposit_id: usize,
        amount: Amount,
        shares: Amount,
    },
    RewardsClaimed {
        pool: AccountId,
        account: AccountId,
        receiver: AccountId,
        escrowed: Amount,
        liquid: Amount,
    },
    SharesTransferred {
        pool: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    },
    PoolAdded {
        pool: AccountId,
        weight: Weight,
    },
    PoolRemoved {
        pool_id: usize,
        pool: AccountId,
    },
    WeightAdjusted {
        pool_id: usize,
        pool: AccountId,
        new_weight: Weight,
    },
    RewardPerSecondSet {
        rate: Amount,
    },
    /// An emission tick pulled `amount` from the funding source.
    EmissionDistributed {
        distributor: AccountId,
        amount: Amount,
    },
}

/// Ordered buffer of events produced by one component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<StakingEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: StakingEvent) {
        self.events.push(event);
    }

    /// Hand every buffered event to the caller, oldest first.
    pub fn drain(&mut self) -> Vec<StakingEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[StakingEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_drains_in_order() {
        let mut log = EventLog::new();
        log.emit(StakingEvent::RewardPerSecondSet { rate: 1 });
        log.emit(StakingEvent::RewardPerSecondSet { rate: 2 });

        let drained = log.drain();
        assert_eq!(
            drained,
            vec![
                StakingEvent::RewardPerSecondSet { rate: 1 },
                StakingEvent::RewardPerSecondSet { rate: 2 },
            ]
        );
        assert!(log.is_empty());
    }

    #[test]
    fn test_events_serialize_with_tag() {
        let event = StakingEvent::PoolRemoved {
            pool_id: 3,
            pool: AccountId::ZERO,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "pool_removed");
        assert_eq!(json["pool_id"], 3);
    }
}
