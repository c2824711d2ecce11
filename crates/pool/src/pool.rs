//! Time-Locked Pool
//!
//! Deposits lock principal for a chosen duration and mint claim-shares
//! scaled by a duration multiplier. Shares accrue the pool's reward token
//! pro-rata through [`RewardState`]. Claims optionally re-lock a portion of
//! the rewards as a fresh deposit in a companion escrow pool.
//!
//! Withdrawals and claims validate first, then update the pool's own
//! bookkeeping, and only then move tokens out. If that transfer fails the
//! bookkeeping is put back before the error returns. Deposits and reward
//! intake pull tokens in before recording anything. A failed call leaves
//! the pool untouched.

use crate::config::PoolConfig;
use crate::deposit::{clamp_lock_duration, Deposit};
use lockstake_ledger::ShareLedger;
use lockstake_primitives::{
    apply_fraction, mul_div, AccountId, Amount, CallContext, DistributionReceiver, EventLog,
    LedgerError, Result, Seconds, StakingError, StakingEvent, Timestamp, TokenLedger, BASE,
    DUST_THRESHOLD,
};
use lockstake_rewards::{RewardState, ShareDelta};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Result of a successful deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositReceipt {
    /// Index of the new deposit in the receiver's list
    pub deposit_id: usize,
    pub duration: Seconds,
    pub shares: Amount,
    pub end: Timestamp,
}

/// How a claim was split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimOutcome {
    pub escrowed: Amount,
    /// Liquid portion. Not transferred when at or below the dust threshold.
    pub liquid: Amount,
}

impl ClaimOutcome {
    pub fn total(&self) -> Amount {
        self.escrowed + self.liquid
    }
}

#[derive(Debug, Clone)]
pub struct TimeLockedPool {
    address: AccountId,
    config: PoolConfig,
    shares: ShareLedger,
    rewards: RewardState,
    deposits: HashMap<AccountId, Vec<Deposit>>,
    events: EventLog,
}

impl TimeLockedPool {
    pub fn new(address: AccountId, config: PoolConfig) -> Result<Self> {
        if address.is_zero() {
            return Err(StakingError::InvalidPool);
        }
        config.validate()?;
        if config.escrow_pool == Some(address) {
            return Err(StakingError::InvalidConfig(
                "a pool cannot escrow into itself".to_string(),
            ));
        }

        info!(
            target: "staking",
            pool = %address,
            max_bonus = config.max_bonus,
            max_lock_duration = config.max_lock_duration,
            transferable = config.transferable,
            "Pool created"
        );

        Ok(Self {
            address,
            rewards: RewardState::new(address),
            config,
            shares: ShareLedger::new(),
            deposits: HashMap::new(),
            events: EventLog::new(),
        })
    }

    // ---------------------------------------------------------------------
    // Views
    // ---------------------------------------------------------------------

    pub fn address(&self) -> AccountId {
        self.address
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn deposits_of(&self, account: &AccountId) -> &[Deposit] {
        self.deposits.get(account).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn deposit_count(&self, account: &AccountId) -> usize {
        self.deposits_of(account).len()
    }

    /// Sum of locked principal held for `account`.
    pub fn total_deposit_of(&self, account: &AccountId) -> Amount {
        self.deposits_of(account)
            .iter()
            .fold(0u128, |acc, d| acc.saturating_add(d.amount))
    }

    pub fn shares_of(&self, account: &AccountId) -> Amount {
        self.shares.balance_of(account)
    }

    pub fn total_shares(&self) -> Amount {
        self.shares.total_supply()
    }

    pub fn withdrawable_rewards_of(&self, account: &AccountId) -> Result<Amount> {
        self.rewards.withdrawable_rewards_of(&self.shares, account)
    }

    pub fn cumulative_rewards_of(&self, account: &AccountId) -> Result<Amount> {
        self.rewards.cumulative_rewards_of(&self.shares, account)
    }

    pub fn withdrawn_rewards_of(&self, account: &AccountId) -> Amount {
        self.rewards.withdrawn_rewards_of(account)
    }

    pub fn reward_state(&self) -> &RewardState {
        &self.rewards
    }

    pub fn drain_events(&mut self) -> Vec<StakingEvent> {
        self.events.drain()
    }

    /// `BASE + max_bonus * duration / max_lock_duration`
    pub fn get_multiplier(&self, duration: Seconds) -> Result<Amount> {
        let bonus = mul_div(
            self.config.max_bonus,
            duration as u128,
            self.config.max_lock_duration as u128,
        )?;
        BASE.checked_add(bonus)
            .ok_or(StakingError::ArithmeticOverflow("lock multiplier"))
    }

    fn shares_for(&self, amount: Amount, duration: Seconds) -> Result<Amount> {
        mul_div(amount, self.get_multiplier(duration)?, BASE)
    }

    // ---------------------------------------------------------------------
    // Entry points
    // ---------------------------------------------------------------------

    /// Lock `amount` of the deposit token pulled from `ctx.caller` and mint
    /// duration-weighted shares to `receiver`.
    pub fn deposit(
        &mut self,
        ctx: &CallContext,
        tokens: &mut dyn TokenLedger,
        amount: Amount,
        requested_duration: Seconds,
        receiver: &AccountId,
    ) -> Result<DepositReceipt> {
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }

        let duration = clamp_lock_duration(requested_duration, self.config.max_lock_duration);
        let end = ctx
            .now
            .checked_add(duration)
            .ok_or(StakingError::ArithmeticOverflow("deposit end time"))?;
        let shares = self.shares_for(amount, duration)?;
        self.shares.ensure_mintable(shares)?;

        tokens.pull(&self.config.deposit_token, &self.address, &ctx.caller, amount)?;

        let entries = self.deposits.entry(*receiver).or_default();
        entries.push(Deposit {
            amount,
            start: ctx.now,
            end,
        });
        let deposit_id = entries.len() - 1;

        self.shares.mint(receiver, shares)?;
        self.rewards
            .correct_on_shares_change(receiver, ShareDelta::Mint(shares));

        self.events.emit(StakingEvent::Deposited {
            pool: self.address,
            depositor: ctx.caller,
            receiver: *receiver,
            amount,
            duration,
            shares,
        });
        info!(
            target: "staking",
            pool = %self.address,
            depositor = %ctx.caller,
            receiver = %receiver,
            amount,
            duration,
            shares,
            "Deposit locked"
        );

        Ok(DepositReceipt {
            deposit_id,
            duration,
            shares,
            end,
        })
    }

    /// Release an expired deposit of `ctx.caller`: burn its shares and return
    /// the full principal to `receiver`.
    pub fn withdraw(
        &mut self,
        ctx: &CallContext,
        tokens: &mut dyn TokenLedger,
        deposit_id: usize,
        receiver: &AccountId,
    ) -> Result<Amount> {
        let deposit = self
            .deposits_of(&ctx.caller)
            .get(deposit_id)
            .copied()
            .ok_or(StakingError::DepositNotFound {
                account: ctx.caller,
                deposit_id,
            })?;
        if !deposit.is_unlocked(ctx.now) {
            return Err(StakingError::TooSoon {
                now: ctx.now,
                unlock_at: deposit.end,
            });
        }

        let shares = self.shares_for(deposit.amount, deposit.duration())?;
        self.shares.ensure_balance(&ctx.caller, shares)?;

        self.shares.burn(&ctx.caller, shares)?;
        self.rewards
            .correct_on_shares_change(&ctx.caller, ShareDelta::Burn(shares));
        self.remove_deposit(&ctx.caller, deposit_id);

        if let Err(err) =
            tokens.push(&self.config.deposit_token, &self.address, receiver, deposit.amount)
        {
            self.restore_deposit(&ctx.caller, deposit_id, deposit);
            self.shares.mint(&ctx.caller, shares)?;
            self.rewards
                .correct_on_shares_change(&ctx.caller, ShareDelta::Mint(shares));
            return Err(err.into());
        }

        self.events.emit(StakingEvent::Withdrawn {
            pool: self.address,
            account: ctx.caller,
            receiver: *receiver,
            deposit_id,
            amount: deposit.amount,
            shares,
        });
        info!(
            target: "staking",
            pool = %self.address,
            account = %ctx.caller,
            receiver = %receiver,
            deposit_id,
            amount = deposit.amount,
            shares,
            "Deposit withdrawn"
        );

        Ok(deposit.amount)
    }

    /// Collect `ctx.caller`'s accrued rewards for `receiver`.
    ///
    /// The escrowed portion becomes a fresh deposit in `escrow`, which must be
    /// the configured escrow pool. The liquid remainder is transferred
    /// directly unless it is dust.
    ///
    /// Custody is checked against both legs up front, and the rewards are
    /// marked withdrawn before either leg moves. If a leg fails the mark is
    /// reversed. An escrow deposit that already landed is not; the host's
    /// call boundary reverts it.
    pub fn claim_rewards(
        &mut self,
        ctx: &CallContext,
        tokens: &mut dyn TokenLedger,
        escrow: Option<&mut TimeLockedPool>,
        receiver: &AccountId,
    ) -> Result<ClaimOutcome> {
        let reward = self.rewards.withdrawable_rewards_of(&self.shares, &ctx.caller)?;
        let escrowed = apply_fraction(reward, self.config.escrow_portion)?;
        let liquid = reward - escrowed;
        let liquid_paid = if liquid > DUST_THRESHOLD { liquid } else { 0 };

        let escrow = match escrow {
            Some(pool) if escrowed > 0 => {
                if Some(pool.address) != self.config.escrow_pool
                    || pool.config.deposit_token != self.config.reward_token
                {
                    return Err(StakingError::EscrowUnavailable {
                        expected: self.config.escrow_pool,
                    });
                }
                Some(pool)
            }
            None if escrowed > 0 => {
                return Err(StakingError::EscrowUnavailable {
                    expected: self.config.escrow_pool,
                })
            }
            _ => None,
        };

        // Both legs come out of pool custody; check it covers them before
        // the first one commits.
        let needed = escrowed + liquid_paid;
        let available = tokens.balance_of(&self.config.reward_token, &self.address);
        if available < needed {
            return Err(LedgerError::InsufficientBalance {
                token: self.config.reward_token,
                account: self.address,
                available,
                needed,
            }
            .into());
        }

        let mut collected = EventLog::new();
        self.rewards
            .prepare_collect(&self.shares, &ctx.caller, &mut collected)?;

        if let Err(err) = self.pay_out(ctx, tokens, escrow, escrowed, liquid_paid, receiver) {
            self.rewards.restore_withdrawn(&ctx.caller, reward);
            return Err(err);
        }

        for event in collected.drain() {
            self.events.emit(event);
        }

        self.events.emit(StakingEvent::RewardsClaimed {
            pool: self.address,
            account: ctx.caller,
            receiver: *receiver,
            escrowed,
            liquid,
        });
        info!(
            target: "staking",
            pool = %self.address,
            account = %ctx.caller,
            receiver = %receiver,
            escrowed,
            liquid,
            "Rewards claimed"
        );

        Ok(ClaimOutcome { escrowed, liquid })
    }

    fn pay_out(
        &self,
        ctx: &CallContext,
        tokens: &mut dyn TokenLedger,
        escrow: Option<&mut TimeLockedPool>,
        escrowed: Amount,
        liquid: Amount,
        receiver: &AccountId,
    ) -> Result<()> {
        if let Some(pool) = escrow {
            let escrow_ctx = ctx.with_caller(self.address);
            pool.deposit(&escrow_ctx, tokens, escrowed, self.config.escrow_duration, receiver)?;
        }
        if liquid > 0 {
            tokens.push(&self.config.reward_token, &self.address, receiver, liquid)?;
        }
        Ok(())
    }

    fn remove_deposit(&mut self, account: &AccountId, deposit_id: usize) {
        if let Some(entries) = self.deposits.get_mut(account) {
            entries.swap_remove(deposit_id);
            if entries.is_empty() {
                self.deposits.remove(account);
            }
        }
    }

    /// Inverse of `remove_deposit`.
    fn restore_deposit(&mut self, account: &AccountId, deposit_id: usize, deposit: Deposit) {
        let entries = self.deposits.entry(*account).or_default();
        entries.push(deposit);
        let last = entries.len() - 1;
        entries.swap(deposit_id, last);
    }

    /// Move claim-shares from `ctx.caller` to `to`, carrying no past rewards.
    pub fn transfer_shares(&mut self, ctx: &CallContext, to: &AccountId, amount: Amount) -> Result<()> {
        if !self.config.transferable {
            return Err(StakingError::TransferDisabled);
        }
        self.shares.transfer(&ctx.caller, to, amount)?;
        self.rewards.correct_on_transfer(&ctx.caller, to, amount);

        self.events.emit(StakingEvent::SharesTransferred {
            pool: self.address,
            from: ctx.caller,
            to: *to,
            amount,
        });
        debug!(
            target: "staking",
            pool = %self.address,
            from = %ctx.caller,
            to = %to,
            amount,
            "Claim-shares transferred"
        );
        Ok(())
    }

    /// Pull `amount` of reward token from `ctx.caller` and fold it into the
    /// accrual rate. Fails with `ZeroShares` before pulling when no shares
    /// are outstanding.
    pub fn distribute_rewards(
        &mut self,
        ctx: &CallContext,
        tokens: &mut dyn TokenLedger,
        amount: Amount,
    ) -> Result<()> {
        if self.shares.total_supply() == 0 {
            return Err(StakingError::ZeroShares);
        }
        if amount > 0 {
            tokens.pull(&self.config.reward_token, &self.address, &ctx.caller, amount)?;
        }
        self.rewards
            .distribute(&self.shares, &ctx.caller, amount, &mut self.events)
    }
}

impl DistributionReceiver for TimeLockedPool {
    fn receiver_address(&self) -> AccountId {
        self.address
    }

    fn receive_distribution(
        &mut self,
        ctx: &CallContext,
        tokens: &mut dyn TokenLedger,
        amount: Amount,
    ) -> Result<()> {
        self.distribute_rewards(ctx, tokens, amount)
    }
}
