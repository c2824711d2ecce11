//! Weighted multi-pool emission scheduler
//!
//! ## Key Invariants
//! - `total_weight == sum(entry.weight)` over the registry
//! - At most `config.max_pools` entries, no pool registered twice
//! - `last_distribution` only moves forward
//!
//! Pool ids are positions in the registry. Removal swaps the last entry
//! into the freed slot, so ids are not stable across removals.

use crate::config::SchedulerConfig;
use crate::report::{DistributionReport, SkippedPool};
use lockstake_primitives::{
    ensure_role, mul_div, AccountId, Amount, CallContext, EventLog, Permissions, PoolDirectory,
    Result, Role, Seconds, StakingError, StakingEvent, Timestamp, TokenLedger, Weight,
    DUST_THRESHOLD,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub pool: AccountId,
    pub weight: Weight,
}

#[derive(Clone)]
pub struct EmissionScheduler {
    address: AccountId,
    config: SchedulerConfig,
    permissions: Arc<dyn Permissions>,
    pools: Vec<PoolEntry>,
    registered: HashSet<AccountId>,
    total_weight: Weight,
    reward_per_second: Amount,
    last_distribution: Timestamp,
    events: EventLog,
}

impl fmt::Debug for EmissionScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmissionScheduler")
            .field("address", &self.address)
            .field("pools", &self.pools)
            .field("total_weight", &self.total_weight)
            .field("reward_per_second", &self.reward_per_second)
            .field("last_distribution", &self.last_distribution)
            .finish_non_exhaustive()
    }
}

impl EmissionScheduler {
    /// Create a scheduler whose emission clock starts at `deployed_at`.
    pub fn new(
        address: AccountId,
        config: SchedulerConfig,
        permissions: Arc<dyn Permissions>,
        deployed_at: Timestamp,
    ) -> Result<Self> {
        if address.is_zero() {
            return Err(StakingError::InvalidConfig(
                "scheduler address must not be the zero account".to_string(),
            ));
        }
        config.validate()?;

        info!(
            target: "emission",
            scheduler = %address,
            reward_token = %config.reward_token,
            reward_source = %config.reward_source,
            reward_per_second = config.reward_per_second,
            "Emission scheduler created"
        );

        Ok(Self {
            address,
            reward_per_second: config.reward_per_second,
            config,
            permissions,
            pools: Vec::new(),
            registered: HashSet::new(),
            total_weight: 0,
            last_distribution: deployed_at,
            events: EventLog::new(),
        })
    }

    // ---------------------------------------------------------------------
    // Views
    // ---------------------------------------------------------------------

    pub fn address(&self) -> AccountId {
        self.address
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn pools(&self) -> &[PoolEntry] {
        &self.pools
    }

    pub fn pool(&self, pool_id: usize) -> Option<&PoolEntry> {
        self.pools.get(pool_id)
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    pub fn is_registered(&self, pool: &AccountId) -> bool {
        self.registered.contains(pool)
    }

    pub fn total_weight(&self) -> Weight {
        self.total_weight
    }

    pub fn reward_per_second(&self) -> Amount {
        self.reward_per_second
    }

    pub fn last_distribution_time(&self) -> Timestamp {
        self.last_distribution
    }

    /// Amount a tick at `now` would pull.
    pub fn pending_emission(&self, now: Timestamp) -> Amount {
        self.reward_per_second
            .saturating_mul(now.saturating_sub(self.last_distribution) as u128)
    }

    pub fn drain_events(&mut self) -> Vec<StakingEvent> {
        self.events.drain()
    }

    // ---------------------------------------------------------------------
    // Entry points
    // ---------------------------------------------------------------------

    /// Emission tick. Requires the distributor role.
    pub fn distribute_rewards(
        &mut self,
        ctx: &CallContext,
        tokens: &mut dyn TokenLedger,
        pools: &mut dyn PoolDirectory,
    ) -> Result<DistributionReport> {
        ensure_role(self.permissions.as_ref(), Role::Distributor, &ctx.caller)?;
        self.settle(ctx, tokens, pools)
    }

    /// Register `pool` with `weight`. Requires the governance role.
    pub fn add_pool(
        &mut self,
        ctx: &CallContext,
        tokens: &mut dyn TokenLedger,
        pools: &mut dyn PoolDirectory,
        pool: AccountId,
        weight: Weight,
    ) -> Result<()> {
        ensure_role(self.permissions.as_ref(), Role::Governance, &ctx.caller)?;
        if pool.is_zero() {
            return Err(StakingError::InvalidPool);
        }
        if self.registered.contains(&pool) {
            return Err(StakingError::DuplicatePool(pool));
        }
        if self.pools.len() >= self.config.max_pools {
            return Err(StakingError::CapacityExceeded {
                max: self.config.max_pools,
            });
        }
        let total_weight = self
            .total_weight
            .checked_add(weight)
            .ok_or(StakingError::ArithmeticOverflow("total pool weight"))?;

        self.settle(ctx, tokens, pools)?;

        tokens.approve(&self.config.reward_token, &self.address, &pool, Amount::MAX);
        self.pools.push(PoolEntry { pool, weight });
        self.registered.insert(pool);
        self.total_weight = total_weight;

        self.events.emit(StakingEvent::PoolAdded { pool, weight });
        info!(
            target: "emission",
            pool = %pool,
            weight,
            total_weight,
            "Pool registered"
        );
        Ok(())
    }

    /// Deregister the pool at `pool_id` and revoke its pull authorization.
    /// Requires the governance role.
    pub fn remove_pool(
        &mut self,
        ctx: &CallContext,
        tokens: &mut dyn TokenLedger,
        pools: &mut dyn PoolDirectory,
        pool_id: usize,
    ) -> Result<PoolEntry> {
        ensure_role(self.permissions.as_ref(), Role::Governance, &ctx.caller)?;
        if pool_id >= self.pools.len() {
            return Err(StakingError::PoolNotFound(pool_id));
        }

        self.settle(ctx, tokens, pools)?;

        let entry = self.pools.swap_remove(pool_id);
        self.registered.remove(&entry.pool);
        self.total_weight -= entry.weight;
        tokens.approve(&self.config.reward_token, &self.address, &entry.pool, 0);

        self.events.emit(StakingEvent::PoolRemoved {
            pool_id,
            pool: entry.pool,
        });
        info!(
            target: "emission",
            pool_id,
            pool = %entry.pool,
            total_weight = self.total_weight,
            "Pool removed"
        );
        Ok(entry)
    }

    /// Requires the governance role.
    pub fn adjust_weight(
        &mut self,
        ctx: &CallContext,
        tokens: &mut dyn TokenLedger,
        pools: &mut dyn PoolDirectory,
        pool_id: usize,
        new_weight: Weight,
    ) -> Result<()> {
        ensure_role(self.permissions.as_ref(), Role::Governance, &ctx.caller)?;
        let entry = *self
            .pools
            .get(pool_id)
            .ok_or(StakingError::PoolNotFound(pool_id))?;
        let total_weight = (self.total_weight - entry.weight)
            .checked_add(new_weight)
            .ok_or(StakingError::ArithmeticOverflow("total pool weight"))?;

        self.settle(ctx, tokens, pools)?;

        self.pools[pool_id].weight = new_weight;
        self.total_weight = total_weight;

        self.events.emit(StakingEvent::WeightAdjusted {
            pool_id,
            pool: entry.pool,
            new_weight,
        });
        info!(
            target: "emission",
            pool_id,
            pool = %entry.pool,
            old_weight = entry.weight,
            new_weight,
            total_weight,
            "Pool weight adjusted"
        );
        Ok(())
    }

    /// Requires the governance role.
    pub fn set_reward_per_second(
        &mut self,
        ctx: &CallContext,
        tokens: &mut dyn TokenLedger,
        pools: &mut dyn PoolDirectory,
        rate: Amount,
    ) -> Result<()> {
        ensure_role(self.permissions.as_ref(), Role::Governance, &ctx.caller)?;
        self.settle(ctx, tokens, pools)?;

        self.reward_per_second = rate;
        self.events.emit(StakingEvent::RewardPerSecondSet { rate });
        info!(target: "emission", rate, "Reward rate set");
        Ok(())
    }

    /// Settle emissions accrued since the last tick under the current rate
    /// and weights.
    ///
    /// Only the pull from the funding source can fail the tick; it happens
    /// before any state changes. Pool intake failures are logged, reported
    /// and otherwise ignored.
    fn settle(
        &mut self,
        ctx: &CallContext,
        tokens: &mut dyn TokenLedger,
        pools: &mut dyn PoolDirectory,
    ) -> Result<DistributionReport> {
        let elapsed: Seconds = ctx.now.saturating_sub(self.last_distribution);
        let total = self
            .reward_per_second
            .checked_mul(elapsed as u128)
            .ok_or(StakingError::ArithmeticOverflow("emission amount"))?;

        let mut report = DistributionReport {
            elapsed,
            ..DistributionReport::default()
        };

        if self.pools.is_empty() || self.total_weight == 0 || total == 0 {
            self.advance_clock(ctx.now);
            debug!(
                target: "emission",
                elapsed,
                pools = self.pools.len(),
                "Nothing to distribute"
            );
            return Ok(report);
        }

        let allocations = self
            .pools
            .iter()
            .map(|entry| Ok((entry.pool, mul_div(total, entry.weight, self.total_weight)?)))
            .collect::<Result<Vec<_>>>()?;

        let reward_token = self.config.reward_token;
        let source = self.config.reward_source;
        tokens.pull(&reward_token, &self.address, &source, total)?;

        self.advance_clock(ctx.now);
        report.total = total;

        let pool_ctx = ctx.with_caller(self.address);
        for (pool, amount) in allocations {
            let outcome = match pools.receiver_mut(&pool) {
                Some(receiver) => receiver.receive_distribution(&pool_ctx, tokens, amount),
                None => Err(StakingError::PoolNotFound(self.position_of(&pool))),
            };
            match outcome {
                Ok(()) => {
                    debug!(target: "emission", pool = %pool, amount, "Pool received emission");
                    report.delivered.push((pool, amount));
                }
                Err(err) => {
                    warn!(
                        target: "emission",
                        pool = %pool,
                        amount,
                        error = %err,
                        "Pool intake failed, skipping for this tick"
                    );
                    report.skipped.push(SkippedPool {
                        pool,
                        amount,
                        reason: err.to_string(),
                    });
                }
            }
        }

        let leftover = tokens.balance_of(&reward_token, &self.address);
        if leftover > DUST_THRESHOLD {
            match tokens.push(&reward_token, &self.address, &source, leftover) {
                Ok(()) => report.returned = leftover,
                Err(err) => warn!(
                    target: "emission",
                    leftover,
                    error = %err,
                    "Failed to return undistributed emission, keeping it in custody"
                ),
            }
        }

        self.events.emit(StakingEvent::EmissionDistributed {
            distributor: ctx.caller,
            amount: total,
        });
        info!(
            target: "emission",
            elapsed,
            total,
            delivered = report.total_delivered(),
            skipped = report.skipped.len(),
            returned = report.returned,
            "Emission distributed"
        );

        Ok(report)
    }

    fn advance_clock(&mut self, now: Timestamp) {
        self.last_distribution = self.last_distribution.max(now);
    }

    fn position_of(&self, pool: &AccountId) -> usize {
        self.pools
            .iter()
            .position(|entry| &entry.pool == pool)
            .unwrap_or(self.pools.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockstake_ledger::{InMemoryTokenLedger, RoleRegistry};
    use lockstake_primitives::{DistributionReceiver, BASE, MAX_POOL_COUNT};
    use std::collections::BTreeMap;

    fn test_account(label: &str) -> AccountId {
        AccountId::from_label(label)
    }

    fn reward_token() -> AccountId {
        test_account("reward-token")
    }

    fn treasury() -> AccountId {
        test_account("treasury")
    }

    fn governance() -> AccountId {
        test_account("governance")
    }

    fn keeper() -> AccountId {
        test_account("keeper")
    }

    /// Pulls whatever it is offered, or refuses everything.
    #[derive(Debug)]
    struct TestReceiver {
        address: AccountId,
        received: Amount,
        refuse: bool,
    }

    impl TestReceiver {
        fn new(label: &str) -> Self {
            Self {
                address: test_account(label),
                received: 0,
                refuse: false,
            }
        }
    }

    impl DistributionReceiver for TestReceiver {
        fn receiver_address(&self) -> AccountId {
            self.address
        }

        fn receive_distribution(
            &mut self,
            ctx: &CallContext,
            tokens: &mut dyn TokenLedger,
            amount: Amount,
        ) -> Result<()> {
            if self.refuse {
                return Err(StakingError::ZeroShares);
            }
            tokens.pull(&reward_token(), &self.address, &ctx.caller, amount)?;
            self.received += amount;
            Ok(())
        }
    }

    struct Harness {
        scheduler: EmissionScheduler,
        tokens: InMemoryTokenLedger,
        receivers: BTreeMap<AccountId, TestReceiver>,
    }

    impl Harness {
        fn new(max_pools: usize) -> Self {
            let roles = RoleRegistry::new();
            roles.grant(Role::Governance, governance());
            roles.grant(Role::Distributor, keeper());

            let mut config = SchedulerConfig::new(reward_token(), treasury());
            config.max_pools = max_pools;
            let scheduler =
                EmissionScheduler::new(test_account("scheduler"), config, Arc::new(roles), 0)
                    .unwrap();

            let mut tokens = InMemoryTokenLedger::new();
            tokens.mint(&reward_token(), &treasury(), 1_000_000).unwrap();
            tokens.approve(&reward_token(), &treasury(), &scheduler.address(), Amount::MAX);

            Self {
                scheduler,
                tokens,
                receivers: BTreeMap::new(),
            }
        }

        fn gov(&self, now: Timestamp) -> CallContext {
            CallContext::new(governance(), now)
        }

        fn add(&mut self, receiver: TestReceiver, weight: Weight, now: Timestamp) -> Result<()> {
            let pool = receiver.address;
            self.receivers.insert(pool, receiver);
            let ctx = self.gov(now);
            self.scheduler
                .add_pool(&ctx, &mut self.tokens, &mut self.receivers, pool, weight)
        }

        fn set_rate(&mut self, rate: Amount, now: Timestamp) -> Result<()> {
            let ctx = self.gov(now);
            self.scheduler
                .set_reward_per_second(&ctx, &mut self.tokens, &mut self.receivers, rate)
        }

        fn tick(&mut self, now: Timestamp) -> Result<DistributionReport> {
            self.scheduler.distribute_rewards(
                &CallContext::new(keeper(), now),
                &mut self.tokens,
                &mut self.receivers,
            )
        }

        fn received(&self, label: &str) -> Amount {
            self.receivers[&test_account(label)].received
        }
    }

    fn two_pool_harness() -> Harness {
        let mut h = Harness::new(MAX_POOL_COUNT);
        h.add(TestReceiver::new("pool-a"), BASE / 5, 0).unwrap();
        h.add(TestReceiver::new("pool-b"), BASE * 4 / 5, 0).unwrap();
        h.set_rate(10, 0).unwrap();
        h
    }

    #[test]
    fn test_weighted_split() {
        let mut h = two_pool_harness();

        let report = h.tick(100).unwrap();
        assert_eq!(report.elapsed, 100);
        assert_eq!(report.total, 1_000);
        assert_eq!(report.delivered_to(&test_account("pool-a")), 200);
        assert_eq!(report.delivered_to(&test_account("pool-b")), 800);
        assert_eq!(report.returned, 0);
        assert_eq!(h.received("pool-a"), 200);
        assert_eq!(h.received("pool-b"), 800);
        assert_eq!(h.tokens.balance_of(&reward_token(), &treasury()), 999_000);
        assert_eq!(h.scheduler.last_distribution_time(), 100);
    }

    #[test]
    fn test_failing_pool_is_isolated() {
        let mut h = two_pool_harness();
        h.receivers
            .get_mut(&test_account("pool-a"))
            .unwrap()
            .refuse = true;

        let report = h.tick(100).unwrap();
        assert!(report.was_skipped(&test_account("pool-a")));
        assert_eq!(report.skipped[0].amount, 200);
        assert_eq!(h.received("pool-b"), 800);
        assert_eq!(report.returned, 200);
        assert_eq!(h.tokens.balance_of(&reward_token(), &treasury()), 999_200);
        assert_eq!(h.scheduler.last_distribution_time(), 100);
    }

    #[test]
    fn test_unresolvable_pool_is_skipped() {
        let mut h = two_pool_harness();
        h.receivers.remove(&test_account("pool-b"));

        let report = h.tick(50).unwrap();
        assert!(report.was_skipped(&test_account("pool-b")));
        assert_eq!(h.received("pool-a"), 100);
        assert_eq!(report.returned, 400);
    }

    #[test]
    fn test_empty_registry_still_advances_clock() {
        let mut h = Harness::new(MAX_POOL_COUNT);
        h.set_rate(10, 0).unwrap();

        let report = h.tick(100).unwrap();
        assert_eq!(report.total, 0);
        assert_eq!(h.scheduler.last_distribution_time(), 100);
        assert_eq!(h.tokens.balance_of(&reward_token(), &treasury()), 1_000_000);

        // Time that passed with no pools is not emitted later.
        h.add(TestReceiver::new("pool-a"), 1, 100).unwrap();
        let report = h.tick(110).unwrap();
        assert_eq!(report.total, 100);
    }

    #[test]
    fn test_zero_total_weight_behaves_like_empty_registry() {
        let mut h = Harness::new(MAX_POOL_COUNT);
        h.add(TestReceiver::new("pool-a"), 0, 0).unwrap();
        h.set_rate(10, 0).unwrap();

        let report = h.tick(100).unwrap();
        assert_eq!(report.total, 0);
        assert!(report.delivered.is_empty());
        assert_eq!(h.scheduler.last_distribution_time(), 100);
    }

    #[test]
    fn test_clock_regression_emits_nothing() {
        let mut h = two_pool_harness();
        h.tick(100).unwrap();

        let report = h.tick(90).unwrap();
        assert_eq!(report.elapsed, 0);
        assert_eq!(report.total, 0);
        assert_eq!(h.scheduler.last_distribution_time(), 100);
    }

    #[test]
    fn test_registry_rejections() {
        let mut h = Harness::new(2);
        h.add(TestReceiver::new("pool-a"), 1, 0).unwrap();

        let ctx = h.gov(0);
        let err = h
            .scheduler
            .add_pool(&ctx, &mut h.tokens, &mut h.receivers, test_account("pool-a"), 1)
            .unwrap_err();
        assert_eq!(err, StakingError::DuplicatePool(test_account("pool-a")));

        let err = h
            .scheduler
            .add_pool(&ctx, &mut h.tokens, &mut h.receivers, AccountId::ZERO, 1)
            .unwrap_err();
        assert_eq!(err, StakingError::InvalidPool);

        h.add(TestReceiver::new("pool-b"), 1, 0).unwrap();
        let err = h.add(TestReceiver::new("pool-c"), 1, 0).unwrap_err();
        assert_eq!(err, StakingError::CapacityExceeded { max: 2 });
        assert_eq!(h.scheduler.pool_count(), 2);
        assert_eq!(h.scheduler.total_weight(), 2);
    }

    #[test]
    fn test_governance_and_distributor_roles_are_enforced() {
        let mut h = Harness::new(MAX_POOL_COUNT);
        let outsider = CallContext::new(test_account("outsider"), 10);

        let err = h
            .scheduler
            .distribute_rewards(&outsider, &mut h.tokens, &mut h.receivers)
            .unwrap_err();
        assert!(matches!(
            err,
            StakingError::PermissionDenied {
                role: Role::Distributor,
                ..
            }
        ));

        // The distributor cannot govern.
        let err = h
            .scheduler
            .set_reward_per_second(
                &CallContext::new(keeper(), 10),
                &mut h.tokens,
                &mut h.receivers,
                5,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            StakingError::PermissionDenied {
                role: Role::Governance,
                ..
            }
        ));
        assert_eq!(h.scheduler.reward_per_second(), 0);
        assert_eq!(h.scheduler.last_distribution_time(), 0);
    }

    #[test]
    fn test_add_pool_settles_under_old_weights() {
        let mut h = Harness::new(MAX_POOL_COUNT);
        h.add(TestReceiver::new("pool-a"), 1, 0).unwrap();
        h.set_rate(10, 0).unwrap();

        h.add(TestReceiver::new("pool-b"), 1, 100).unwrap();
        assert_eq!(h.received("pool-a"), 1_000);
        assert_eq!(h.received("pool-b"), 0);

        h.tick(200).unwrap();
        assert_eq!(h.received("pool-a"), 1_500);
        assert_eq!(h.received("pool-b"), 500);
    }

    #[test]
    fn test_remove_pool_swaps_and_revokes() {
        let mut h = Harness::new(MAX_POOL_COUNT);
        h.add(TestReceiver::new("pool-a"), 1, 0).unwrap();
        h.add(TestReceiver::new("pool-b"), 2, 0).unwrap();
        h.add(TestReceiver::new("pool-c"), 3, 0).unwrap();
        let scheduler = h.scheduler.address();
        assert_eq!(
            h.tokens
                .allowance(&reward_token(), &scheduler, &test_account("pool-a")),
            Amount::MAX
        );

        let ctx = h.gov(0);
        let removed = h
            .scheduler
            .remove_pool(&ctx, &mut h.tokens, &mut h.receivers, 0)
            .unwrap();
        assert_eq!(removed.pool, test_account("pool-a"));
        assert_eq!(h.scheduler.pool(0).unwrap().pool, test_account("pool-c"));
        assert_eq!(h.scheduler.total_weight(), 5);
        assert!(!h.scheduler.is_registered(&test_account("pool-a")));
        assert_eq!(
            h.tokens
                .allowance(&reward_token(), &scheduler, &test_account("pool-a")),
            0
        );

        let err = h
            .scheduler
            .remove_pool(&ctx, &mut h.tokens, &mut h.receivers, 2)
            .unwrap_err();
        assert_eq!(err, StakingError::PoolNotFound(2));
    }

    #[test]
    fn test_adjust_weight() {
        let mut h = two_pool_harness();
        let ctx = h.gov(100);
        h.scheduler
            .adjust_weight(&ctx, &mut h.tokens, &mut h.receivers, 0, BASE * 4 / 5)
            .unwrap();
        assert_eq!(h.received("pool-a"), 200);
        assert_eq!(h.scheduler.total_weight(), BASE * 8 / 5);

        h.tick(200).unwrap();
        assert_eq!(h.received("pool-a"), 700);
        assert_eq!(h.received("pool-b"), 1_300);

        let err = h
            .scheduler
            .adjust_weight(&ctx, &mut h.tokens, &mut h.receivers, 7, 1)
            .unwrap_err();
        assert_eq!(err, StakingError::PoolNotFound(7));
    }

    #[test]
    fn test_repeated_rate_is_idempotent() {
        let mut once = two_pool_harness();
        let mut twice = two_pool_harness();

        once.set_rate(20, 50).unwrap();
        twice.set_rate(20, 50).unwrap();
        twice.set_rate(20, 50).unwrap();

        once.tick(100).unwrap();
        twice.tick(100).unwrap();
        assert_eq!(once.received("pool-a"), twice.received("pool-a"));
        assert_eq!(once.received("pool-b"), twice.received("pool-b"));
        assert_eq!(once.received("pool-a"), 100 + 200);
    }

    #[test]
    fn test_unfunded_tick_fails_without_advancing() {
        let mut h = two_pool_harness();
        h.tokens
            .approve(&reward_token(), &treasury(), &h.scheduler.address(), 0);

        let err = h.tick(100).unwrap_err();
        assert!(matches!(err, StakingError::TransferFailure(_)));
        assert_eq!(h.scheduler.last_distribution_time(), 0);
        assert_eq!(h.received("pool-a"), 0);
    }

    #[test]
    fn test_events_and_report_serialization() {
        let mut h = two_pool_harness();
        h.scheduler.drain_events();

        let report = h.tick(10).unwrap();
        let events = h.scheduler.drain_events();
        assert_eq!(
            events,
            vec![StakingEvent::EmissionDistributed {
                distributor: keeper(),
                amount: 100,
            }]
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total"], 100);
        assert_eq!(json["skipped"].as_array().unwrap().len(), 0);
    }
}
