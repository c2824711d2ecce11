//! Point-per-share reward accounting
//!
//! `cumulative(account) = (points_per_share * shares(account) + correction(account)) / POINTS_MULTIPLIER`
//!
//! ## Key Invariants
//! - `points_per_share` never decreases
//! - Every share mint, burn and transfer is paired with the matching
//!   correction, computed with the `points_per_share` in effect before the
//!   balance change, in the same call
//! - `cumulative(account) >= withdrawn(account)` for every account
//!
//! Points and corrections are unbounded integers, so no product in this
//! module can overflow.

use lockstake_primitives::{
    AccountId, Amount, EventLog, Result, ShareSource, StakingError, StakingEvent,
    POINTS_MULTIPLIER,
};
use num_bigint::{BigInt, BigUint};
use num_traits::{ToPrimitive, Zero};
use std::collections::HashMap;
use tracing::debug;

/// Direction of a claim-share supply change for one account.
///
/// Burning is the positive correction: the burned shares' past accrual is
/// kept in the correction term. Minting is negative: new shares must not
/// inherit accrual from before they existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareDelta {
    Mint(Amount),
    Burn(Amount),
}

impl ShareDelta {
    /// Signed share delta under the correction sign convention.
    pub fn signed(&self) -> BigInt {
        match *self {
            ShareDelta::Mint(amount) => -BigInt::from(amount),
            ShareDelta::Burn(amount) => BigInt::from(amount),
        }
    }
}

/// Reward accrual state for one pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardState {
    pool: AccountId,
    points_per_share: BigUint,
    points_correction: HashMap<AccountId, BigInt>,
    withdrawn_rewards: HashMap<AccountId, Amount>,
}

impl RewardState {
    pub fn new(pool: AccountId) -> Self {
        Self {
            pool,
            points_per_share: BigUint::zero(),
            points_correction: HashMap::new(),
            withdrawn_rewards: HashMap::new(),
        }
    }

    pub fn points_per_share(&self) -> &BigUint {
        &self.points_per_share
    }

    pub fn points_correction(&self, account: &AccountId) -> BigInt {
        self.points_correction
            .get(account)
            .cloned()
            .unwrap_or_default()
    }

    pub fn withdrawn_rewards_of(&self, account: &AccountId) -> Amount {
        self.withdrawn_rewards.get(account).copied().unwrap_or(0)
    }

    /// Total rewards ever earned by `account`, withdrawn or not.
    pub fn cumulative_rewards_of<S: ShareSource + ?Sized>(
        &self,
        shares: &S,
        account: &AccountId,
    ) -> Result<Amount> {
        let raw = BigInt::from(&self.points_per_share * BigUint::from(shares.shares_of(account)));
        let corrected = raw + self.points_correction(account);
        (corrected / BigInt::from(POINTS_MULTIPLIER))
            .to_u128()
            .ok_or(StakingError::ArithmeticOverflow(
                "cumulative rewards out of range",
            ))
    }

    /// Rewards earned by `account` and not yet withdrawn.
    pub fn withdrawable_rewards_of<S: ShareSource + ?Sized>(
        &self,
        shares: &S,
        account: &AccountId,
    ) -> Result<Amount> {
        self.cumulative_rewards_of(shares, account)?
            .checked_sub(self.withdrawn_rewards_of(account))
            .ok_or(StakingError::ArithmeticOverflow(
                "withdrawn rewards exceed cumulative rewards",
            ))
    }

    /// Fold `amount` into the accrual rate of every outstanding share.
    ///
    /// The remainder `amount * POINTS_MULTIPLIER mod total_shares` is
    /// permanently undistributed dust.
    pub fn distribute<S: ShareSource + ?Sized>(
        &mut self,
        shares: &S,
        distributor: &AccountId,
        amount: Amount,
        log: &mut EventLog,
    ) -> Result<()> {
        let total_shares = shares.total_shares();
        if total_shares == 0 {
            return Err(StakingError::ZeroShares);
        }

        if amount > 0 {
            let increment = BigUint::from(amount) * BigUint::from(POINTS_MULTIPLIER)
                / BigUint::from(total_shares);
            self.points_per_share += increment;

            log.emit(StakingEvent::RewardsDistributed {
                pool: self.pool,
                distributor: *distributor,
                amount,
            });
            debug!(
                target: "staking",
                pool = %self.pool,
                distributor = %distributor,
                amount,
                total_shares,
                "Distributed rewards"
            );
        }

        Ok(())
    }

    /// Mark everything withdrawable by `account` as withdrawn and return it.
    ///
    /// The caller moves the tokens; it may split the amount (escrowed vs
    /// liquid) without touching this state again.
    pub fn prepare_collect<S: ShareSource + ?Sized>(
        &mut self,
        shares: &S,
        account: &AccountId,
        log: &mut EventLog,
    ) -> Result<Amount> {
        let withdrawable = self.withdrawable_rewards_of(shares, account)?;
        if withdrawable > 0 {
            // withdrawn + withdrawable == cumulative, which fits in an Amount.
            *self.withdrawn_rewards.entry(*account).or_insert(0) += withdrawable;

            log.emit(StakingEvent::RewardsWithdrawn {
                pool: self.pool,
                account: *account,
                amount: withdrawable,
            });
            debug!(
                target: "staking",
                pool = %self.pool,
                account = %account,
                amount = withdrawable,
                "Rewards marked withdrawn"
            );
        }
        Ok(withdrawable)
    }

    /// Reverse a `prepare_collect` of `amount` whose payout failed.
    pub fn restore_withdrawn(&mut self, account: &AccountId, amount: Amount) {
        if let Some(withdrawn) = self.withdrawn_rewards.get_mut(account) {
            *withdrawn = withdrawn.saturating_sub(amount);
            if *withdrawn == 0 {
                self.withdrawn_rewards.remove(account);
            }
        }
    }

    /// Pair a mint or burn of `account`'s shares with its correction.
    pub fn correct_on_shares_change(&mut self, account: &AccountId, delta: ShareDelta) {
        let adjustment = delta.signed() * BigInt::from(self.points_per_share.clone());
        *self.points_correction.entry(*account).or_default() += adjustment;
    }

    /// Pair a share transfer with offsetting corrections so neither party's
    /// cumulative rewards move.
    pub fn correct_on_transfer(&mut self, from: &AccountId, to: &AccountId, amount: Amount) {
        let magnitude = BigInt::from(&self.points_per_share * BigUint::from(amount));
        *self.points_correction.entry(*from).or_default() += &magnitude;
        *self.points_correction.entry(*to).or_default() -= magnitude;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockstake_ledger::ShareLedger;

    fn test_account(label: &str) -> AccountId {
        AccountId::from_label(label)
    }

    struct Fixture {
        state: RewardState,
        shares: ShareLedger,
        log: EventLog,
        funder: AccountId,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                state: RewardState::new(test_account("pool")),
                shares: ShareLedger::new(),
                log: EventLog::new(),
                funder: test_account("funder"),
            }
        }

        fn mint(&mut self, account: &AccountId, amount: Amount) {
            self.shares.mint(account, amount).unwrap();
            self.state
                .correct_on_shares_change(account, ShareDelta::Mint(amount));
        }

        fn burn(&mut self, account: &AccountId, amount: Amount) {
            self.shares.burn(account, amount).unwrap();
            self.state
                .correct_on_shares_change(account, ShareDelta::Burn(amount));
        }

        fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: Amount) {
            self.shares.transfer(from, to, amount).unwrap();
            self.state.correct_on_transfer(from, to, amount);
        }

        fn distribute(&mut self, amount: Amount) -> Result<()> {
            self.state
                .distribute(&self.shares, &self.funder, amount, &mut self.log)
        }

        fn withdrawable(&self, account: &AccountId) -> Amount {
            self.state
                .withdrawable_rewards_of(&self.shares, account)
                .unwrap()
        }
    }

    #[test]
    fn test_distribute_requires_outstanding_shares() {
        let mut f = Fixture::new();
        assert_eq!(f.distribute(100), Err(StakingError::ZeroShares));
        assert_eq!(f.distribute(0), Err(StakingError::ZeroShares));
        assert!(f.state.points_per_share().is_zero());
    }

    #[test]
    fn test_distribute_zero_is_a_noop() {
        let mut f = Fixture::new();
        let alice = test_account("alice");
        f.mint(&alice, 100);

        f.distribute(0).unwrap();
        assert!(f.state.points_per_share().is_zero());
        assert!(f.log.is_empty());
    }

    #[test]
    fn test_rewards_split_pro_rata() {
        let mut f = Fixture::new();
        let alice = test_account("alice");
        let bob = test_account("bob");
        f.mint(&alice, 150);
        f.mint(&bob, 50);

        f.distribute(1_000).unwrap();

        assert_eq!(f.withdrawable(&alice), 750);
        assert_eq!(f.withdrawable(&bob), 250);
    }

    #[test]
    fn test_uneven_split_rounds_down() {
        let mut f = Fixture::new();
        let alice = test_account("alice");
        let bob = test_account("bob");
        // 400 does not divide POINTS_MULTIPLIER, so points per share truncate.
        f.mint(&alice, 300);
        f.mint(&bob, 100);

        f.distribute(1_000).unwrap();

        assert_eq!(f.withdrawable(&alice), 749);
        assert_eq!(f.withdrawable(&bob), 249);
    }

    #[test]
    fn test_late_minter_gains_nothing_retroactively() {
        let mut f = Fixture::new();
        let alice = test_account("alice");
        let bob = test_account("bob");
        f.mint(&alice, 100);
        f.distribute(1_000).unwrap();

        f.mint(&bob, 100);
        assert_eq!(f.withdrawable(&bob), 0);
        assert_eq!(f.withdrawable(&alice), 1_000);

        f.distribute(1_000).unwrap();
        assert_eq!(f.withdrawable(&bob), 500);
        assert_eq!(f.withdrawable(&alice), 1_500);
    }

    #[test]
    fn test_burn_keeps_earned_rewards() {
        let mut f = Fixture::new();
        let alice = test_account("alice");
        let bob = test_account("bob");
        f.mint(&alice, 100);
        f.mint(&bob, 100);
        f.distribute(1_000).unwrap();

        let before = f.withdrawable(&alice);
        f.burn(&alice, 100);
        assert_eq!(f.withdrawable(&alice), before);

        f.distribute(1_000).unwrap();
        assert_eq!(before, 500);
        assert_eq!(f.withdrawable(&alice), before);
        assert_eq!(f.withdrawable(&bob), 1_500);
    }

    #[test]
    fn test_transfer_moves_no_past_rewards() {
        let mut f = Fixture::new();
        let alice = test_account("alice");
        let bob = test_account("bob");
        f.mint(&alice, 100);
        f.distribute(1_000).unwrap();

        f.transfer(&alice, &bob, 50);
        assert_eq!(f.withdrawable(&alice), 1_000);
        assert_eq!(f.withdrawable(&bob), 0);

        f.distribute(1_000).unwrap();
        assert_eq!(f.withdrawable(&alice), 1_500);
        assert_eq!(f.withdrawable(&bob), 500);
    }

    #[test]
    fn test_prepare_collect_marks_withdrawn() {
        let mut f = Fixture::new();
        let alice = test_account("alice");
        f.mint(&alice, 100);
        f.distribute(500).unwrap();
        f.log.drain();

        let collected = f
            .state
            .prepare_collect(&f.shares, &alice, &mut f.log)
            .unwrap();
        assert_eq!(collected, 500);
        assert_eq!(f.state.withdrawn_rewards_of(&alice), 500);
        assert_eq!(f.withdrawable(&alice), 0);
        assert_eq!(
            f.log.drain(),
            vec![StakingEvent::RewardsWithdrawn {
                pool: test_account("pool"),
                account: alice,
                amount: 500,
            }]
        );

        // Nothing left: no bookkeeping change, no event.
        let again = f
            .state
            .prepare_collect(&f.shares, &alice, &mut f.log)
            .unwrap();
        assert_eq!(again, 0);
        assert!(f.log.is_empty());
    }

    #[test]
    fn test_restore_withdrawn_undoes_collect() {
        let mut f = Fixture::new();
        let alice = test_account("alice");
        f.mint(&alice, 100);
        f.distribute(500).unwrap();
        let before = f.state.clone();

        let collected = f
            .state
            .prepare_collect(&f.shares, &alice, &mut f.log)
            .unwrap();
        f.state.restore_withdrawn(&alice, collected);

        assert_eq!(f.state, before);
        assert_eq!(f.withdrawable(&alice), 500);
    }

    #[test]
    fn test_share_delta_sign_convention() {
        assert_eq!(ShareDelta::Mint(5).signed(), BigInt::from(-5));
        assert_eq!(ShareDelta::Burn(5).signed(), BigInt::from(5));
    }
}
