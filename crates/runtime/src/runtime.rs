//! Staking runtime host
//!
//! Owns the token ledger, every deployed pool and the emission scheduler.
//! Each entry point runs against a snapshot of that state: if the call
//! fails, the snapshot is restored, so no failed call leaves partial
//! effects behind. Calls are serialized by `&mut self`.

use crate::config::{resolve_account, RuntimeConfig};
use crate::issuance::TokenIssuance;
use anyhow::{anyhow, Context};
use lockstake_emission::{DistributionReport, EmissionScheduler, PoolEntry, SchedulerConfig};
use lockstake_ledger::{InMemoryTokenLedger, RoleRegistry};
use lockstake_pool::{ClaimOutcome, DepositReceipt, PoolConfig, TimeLockedPool};
use lockstake_primitives::{
    ensure_role, AccountId, Amount, CallContext, Permissions, Result, Role, Seconds,
    StakingError, StakingEvent, Timestamp, TokenId, TokenLedger, Weight,
};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub struct StakingRuntime<L = InMemoryTokenLedger> {
    tokens: L,
    pools: BTreeMap<AccountId, TimeLockedPool>,
    scheduler: EmissionScheduler,
    roles: Arc<RoleRegistry>,
    events: Vec<StakingEvent>,
}

impl<L> fmt::Debug for StakingRuntime<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StakingRuntime")
            .field("pools", &self.pools.keys().collect::<Vec<_>>())
            .field("scheduler", &self.scheduler)
            .field("pending_events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl StakingRuntime<InMemoryTokenLedger> {
    /// Deploy everything described by `config` on a fresh in-memory ledger.
    pub fn from_config(config: &RuntimeConfig) -> anyhow::Result<Self> {
        Self::with_ledger(InMemoryTokenLedger::new(), config)
    }

    /// Load a TOML deployment file and deploy it.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config = RuntimeConfig::load(path)?;
        Self::from_config(&config)
    }
}

impl<L: TokenIssuance + Clone> StakingRuntime<L> {
    /// Empty deployment: a scheduler with no pools and no role grants.
    pub fn new(
        tokens: L,
        scheduler_address: AccountId,
        scheduler_config: SchedulerConfig,
        deployed_at: Timestamp,
    ) -> Result<Self> {
        let roles = Arc::new(RoleRegistry::new());
        let permissions: Arc<dyn Permissions> = roles.clone();
        let scheduler =
            EmissionScheduler::new(scheduler_address, scheduler_config, permissions, deployed_at)?;

        Ok(Self {
            tokens,
            pools: BTreeMap::new(),
            scheduler,
            roles,
            events: Vec::new(),
        })
    }

    /// Deploy `config` on top of an existing ledger.
    ///
    /// Seeds balances, grants roles, authorizes the scheduler to pull from
    /// its reward source, deploys pools in file order and registers those
    /// carrying an emission weight on behalf of the first governance account.
    pub fn with_ledger(tokens: L, config: &RuntimeConfig) -> anyhow::Result<Self> {
        let scheduler_address = config.scheduler.address();
        let scheduler_config = config.scheduler.to_scheduler_config();
        let mut runtime = Self::new(
            tokens,
            scheduler_address,
            scheduler_config.clone(),
            config.deployed_at,
        )
        .context("Failed to create emission scheduler")?;

        for label in &config.roles.governance {
            runtime.grant_role(Role::Governance, resolve_account(label));
        }
        for label in &config.roles.distributor {
            runtime.grant_role(Role::Distributor, resolve_account(label));
        }

        for balance in &config.balances {
            runtime
                .mint_tokens(
                    &resolve_account(&balance.token),
                    &resolve_account(&balance.account),
                    balance.amount.into(),
                )
                .with_context(|| {
                    format!(
                        "Failed to seed {} of {} for {}",
                        balance.amount, balance.token, balance.account
                    )
                })?;
        }

        runtime.approve(
            &scheduler_config.reward_token,
            &scheduler_config.reward_source,
            &scheduler_address,
            Amount::MAX,
        );

        for spec in &config.pools {
            runtime
                .deploy_pool(spec.address(), spec.to_pool_config())
                .with_context(|| format!("Failed to deploy pool {}", spec.address))?;
        }

        let weighted: Vec<_> = config
            .pools
            .iter()
            .filter_map(|spec| spec.weight.map(|weight| (spec, weight)))
            .collect();
        if !weighted.is_empty() {
            let governor = config
                .roles
                .governance
                .first()
                .map(|label| resolve_account(label))
                .ok_or_else(|| anyhow!("pools with an emission weight need a governance account"))?;
            for (spec, weight) in weighted {
                runtime
                    .add_pool(governor, config.deployed_at, &spec.address(), weight.into())
                    .with_context(|| format!("Failed to register pool {}", spec.address))?;
            }
        }

        info!(
            target: "staking",
            scheduler = %scheduler_address,
            pools = runtime.pools.len(),
            registered = runtime.scheduler.pool_count(),
            "Deployment complete"
        );
        Ok(runtime)
    }

    // ---------------------------------------------------------------------
    // Deployment and token helpers
    // ---------------------------------------------------------------------

    pub fn grant_role(&self, role: Role, account: AccountId) {
        self.roles.grant(role, account);
    }

    pub fn revoke_role(&self, role: Role, account: &AccountId) {
        self.roles.revoke(role, account);
    }

    /// Deploy a pool. A configured escrow pool receives a standing
    /// authorization over this pool's reward-token custody.
    pub fn deploy_pool(&mut self, address: AccountId, config: PoolConfig) -> Result<()> {
        if self.pools.contains_key(&address) {
            return Err(StakingError::DuplicatePool(address));
        }
        let pool = TimeLockedPool::new(address, config)?;
        if let Some(escrow) = pool.config().escrow_pool {
            self.tokens
                .approve(&pool.config().reward_token, &address, &escrow, Amount::MAX);
        }
        self.pools.insert(address, pool);
        Ok(())
    }

    /// Create `amount` of `token` for `account`.
    pub fn mint_tokens(&mut self, token: &TokenId, account: &AccountId, amount: Amount) -> Result<()> {
        self.tokens.issue(token, account, amount)?;
        Ok(())
    }

    pub fn approve(&mut self, token: &TokenId, owner: &AccountId, spender: &AccountId, amount: Amount) {
        self.tokens.approve(token, owner, spender, amount);
    }

    // ---------------------------------------------------------------------
    // Views
    // ---------------------------------------------------------------------

    pub fn pool(&self, address: &AccountId) -> Option<&TimeLockedPool> {
        self.pools.get(address)
    }

    pub fn pool_addresses(&self) -> Vec<AccountId> {
        self.pools.keys().copied().collect()
    }

    pub fn scheduler(&self) -> &EmissionScheduler {
        &self.scheduler
    }

    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    pub fn tokens(&self) -> &L {
        &self.tokens
    }

    /// Direct ledger access for token mechanics outside the staking core.
    pub fn tokens_mut(&mut self) -> &mut L {
        &mut self.tokens
    }

    pub fn balance_of(&self, token: &TokenId, account: &AccountId) -> Amount {
        self.tokens.balance_of(token, account)
    }

    /// Notifications from committed calls, oldest call first. Within a call
    /// they are grouped by component, pools before the scheduler.
    pub fn drain_events(&mut self) -> Vec<StakingEvent> {
        std::mem::take(&mut self.events)
    }

    // ---------------------------------------------------------------------
    // Pool entry points
    // ---------------------------------------------------------------------

    pub fn deposit(
        &mut self,
        pool: &AccountId,
        caller: AccountId,
        now: Timestamp,
        amount: Amount,
        duration: Seconds,
        receiver: &AccountId,
    ) -> Result<DepositReceipt> {
        let ctx = CallContext::new(caller, now);
        self.transact(|rt| {
            let target = rt.pools.get_mut(pool).ok_or(StakingError::UnknownPool(*pool))?;
            target.deposit(&ctx, &mut rt.tokens, amount, duration, receiver)
        })
    }

    pub fn withdraw(
        &mut self,
        pool: &AccountId,
        caller: AccountId,
        now: Timestamp,
        deposit_id: usize,
        receiver: &AccountId,
    ) -> Result<Amount> {
        let ctx = CallContext::new(caller, now);
        self.transact(|rt| {
            let target = rt.pools.get_mut(pool).ok_or(StakingError::UnknownPool(*pool))?;
            target.withdraw(&ctx, &mut rt.tokens, deposit_id, receiver)
        })
    }

    /// Claim rewards, resolving the pool's configured escrow pool.
    pub fn claim_rewards(
        &mut self,
        pool: &AccountId,
        caller: AccountId,
        now: Timestamp,
        receiver: &AccountId,
    ) -> Result<ClaimOutcome> {
        let ctx = CallContext::new(caller, now);
        self.transact(|rt| {
            let escrow_address = rt
                .pools
                .get(pool)
                .ok_or(StakingError::UnknownPool(*pool))?
                .config()
                .escrow_pool;

            // Lift the escrow out of the map so both pools can be borrowed.
            let mut escrow = escrow_address.and_then(|address| rt.pools.remove(&address));
            let outcome = match rt.pools.get_mut(pool) {
                Some(target) => target.claim_rewards(&ctx, &mut rt.tokens, escrow.as_mut(), receiver),
                None => Err(StakingError::UnknownPool(*pool)),
            };
            if let Some(escrow) = escrow {
                rt.pools.insert(escrow.address(), escrow);
            }
            outcome
        })
    }

    pub fn transfer_shares(
        &mut self,
        pool: &AccountId,
        caller: AccountId,
        now: Timestamp,
        to: &AccountId,
        amount: Amount,
    ) -> Result<()> {
        let ctx = CallContext::new(caller, now);
        self.transact(|rt| {
            let target = rt.pools.get_mut(pool).ok_or(StakingError::UnknownPool(*pool))?;
            target.transfer_shares(&ctx, to, amount)
        })
    }

    /// Fund a pool directly, outside the emission schedule.
    pub fn fund_pool(
        &mut self,
        pool: &AccountId,
        caller: AccountId,
        now: Timestamp,
        amount: Amount,
    ) -> Result<()> {
        let ctx = CallContext::new(caller, now);
        self.transact(|rt| {
            let target = rt.pools.get_mut(pool).ok_or(StakingError::UnknownPool(*pool))?;
            target.distribute_rewards(&ctx, &mut rt.tokens, amount)
        })
    }

    // ---------------------------------------------------------------------
    // Scheduler entry points
    // ---------------------------------------------------------------------

    pub fn distribute_rewards(&mut self, caller: AccountId, now: Timestamp) -> Result<DistributionReport> {
        let ctx = CallContext::new(caller, now);
        self.transact(|rt| {
            rt.scheduler
                .distribute_rewards(&ctx, &mut rt.tokens, &mut rt.pools)
        })
    }

    pub fn add_pool(
        &mut self,
        caller: AccountId,
        now: Timestamp,
        pool: &AccountId,
        weight: Weight,
    ) -> Result<()> {
        let ctx = CallContext::new(caller, now);
        self.transact(|rt| {
            ensure_role(rt.roles.as_ref(), Role::Governance, &caller)?;
            if !pool.is_zero() && !rt.pools.contains_key(pool) {
                return Err(StakingError::UnknownPool(*pool));
            }
            rt.scheduler
                .add_pool(&ctx, &mut rt.tokens, &mut rt.pools, *pool, weight)
        })
    }

    pub fn remove_pool(&mut self, caller: AccountId, now: Timestamp, pool_id: usize) -> Result<PoolEntry> {
        let ctx = CallContext::new(caller, now);
        self.transact(|rt| {
            rt.scheduler
                .remove_pool(&ctx, &mut rt.tokens, &mut rt.pools, pool_id)
        })
    }

    pub fn adjust_weight(
        &mut self,
        caller: AccountId,
        now: Timestamp,
        pool_id: usize,
        new_weight: Weight,
    ) -> Result<()> {
        let ctx = CallContext::new(caller, now);
        self.transact(|rt| {
            rt.scheduler
                .adjust_weight(&ctx, &mut rt.tokens, &mut rt.pools, pool_id, new_weight)
        })
    }

    pub fn set_reward_per_second(&mut self, caller: AccountId, now: Timestamp, rate: Amount) -> Result<()> {
        let ctx = CallContext::new(caller, now);
        self.transact(|rt| {
            rt.scheduler
                .set_reward_per_second(&ctx, &mut rt.tokens, &mut rt.pools, rate)
        })
    }

    /// Run `call` all-or-nothing.
    ///
    /// The snapshot is a full clone of the token ledger, every pool and the
    /// scheduler, so each entry point costs O(total state) before it runs.
    fn transact<T>(&mut self, call: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let snapshot = (
            self.tokens.clone(),
            self.pools.clone(),
            self.scheduler.clone(),
        );
        match call(self) {
            Ok(value) => {
                self.collect_events();
                Ok(value)
            }
            Err(err) => {
                let (tokens, pools, scheduler) = snapshot;
                self.tokens = tokens;
                self.pools = pools;
                self.scheduler = scheduler;
                debug!(target: "staking", error = %err, "Call reverted");
                Err(err)
            }
        }
    }

    fn collect_events(&mut self) {
        for pool in self.pools.values_mut() {
            self.events.extend(pool.drain_events());
        }
        self.events.extend(self.scheduler.drain_events());
    }
}
