//! Claim-share ledger
//!
//! Balance and supply bookkeeping for a pool's claim-shares. Holds no
//! reward logic: the owning pool pairs every mutation here with the
//! matching correction in its reward accounting state.

use lockstake_primitives::{AccountId, Amount, Result, ShareSource, StakingError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLedger {
    balances: HashMap<AccountId, Amount>,
    total_supply: Amount,
}

impl ShareLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Number of accounts holding a non-zero balance.
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// Fails if minting `amount` would overflow the supply.
    pub fn ensure_mintable(&self, amount: Amount) -> Result<()> {
        self.total_supply
            .checked_add(amount)
            .map(|_| ())
            .ok_or(StakingError::ArithmeticOverflow("claim-share supply"))
    }

    /// Fails unless `account` holds at least `amount`.
    pub fn ensure_balance(&self, account: &AccountId, amount: Amount) -> Result<()> {
        let available = self.balance_of(account);
        if available < amount {
            return Err(StakingError::InsufficientShares {
                account: *account,
                available,
                needed: amount,
            });
        }
        Ok(())
    }

    pub fn mint(&mut self, account: &AccountId, amount: Amount) -> Result<()> {
        self.ensure_mintable(amount)?;
        if amount == 0 {
            return Ok(());
        }
        // Individual balances are bounded by the supply, so only the supply is checked.
        self.total_supply += amount;
        *self.balances.entry(*account).or_insert(0) += amount;
        Ok(())
    }

    pub fn burn(&mut self, account: &AccountId, amount: Amount) -> Result<()> {
        self.ensure_balance(account, amount)?;
        self.set_balance(account, self.balance_of(account) - amount);
        self.total_supply -= amount;
        Ok(())
    }

    pub fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: Amount) -> Result<()> {
        self.ensure_balance(from, amount)?;
        if from == to || amount == 0 {
            return Ok(());
        }
        self.set_balance(from, self.balance_of(from) - amount);
        *self.balances.entry(*to).or_insert(0) += amount;
        Ok(())
    }

    fn set_balance(&mut self, account: &AccountId, balance: Amount) {
        if balance == 0 {
            self.balances.remove(account);
        } else {
            self.balances.insert(*account, balance);
        }
    }
}

impl ShareSource for ShareLedger {
    fn shares_of(&self, account: &AccountId) -> Amount {
        self.balance_of(account)
    }

    fn total_shares(&self) -> Amount {
        self.total_supply
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_account(label: &str) -> AccountId {
        AccountId::from_label(label)
    }

    #[test]
    fn test_mint_burn_tracks_supply() {
        let mut shares = ShareLedger::new();
        let alice = test_account("alice");
        let bob = test_account("bob");

        shares.mint(&alice, 2_000).unwrap();
        shares.mint(&bob, 500).unwrap();
        assert_eq!(shares.total_supply(), 2_500);
        assert_eq!(shares.holder_count(), 2);

        shares.burn(&alice, 2_000).unwrap();
        assert_eq!(shares.balance_of(&alice), 0);
        assert_eq!(shares.total_supply(), 500);
        assert_eq!(shares.holder_count(), 1);
    }

    #[test]
    fn test_burn_beyond_balance_fails() {
        let mut shares = ShareLedger::new();
        let alice = test_account("alice");
        shares.mint(&alice, 10).unwrap();

        let err = shares.burn(&alice, 11).unwrap_err();
        assert_eq!(
            err,
            StakingError::InsufficientShares {
                account: alice,
                available: 10,
                needed: 11,
            }
        );
        assert_eq!(shares.total_supply(), 10);
    }

    #[test]
    fn test_transfer_preserves_supply() {
        let mut shares = ShareLedger::new();
        let alice = test_account("alice");
        let bob = test_account("bob");

        shares.mint(&alice, 100).unwrap();
        shares.transfer(&alice, &bob, 40).unwrap();

        assert_eq!(shares.shares_of(&alice), 60);
        assert_eq!(shares.shares_of(&bob), 40);
        assert_eq!(shares.total_shares(), 100);
        assert!(shares.transfer(&bob, &alice, 41).is_err());
    }

    #[test]
    fn test_mint_overflow_is_rejected() {
        let mut shares = ShareLedger::new();
        let alice = test_account("alice");
        shares.mint(&alice, Amount::MAX).unwrap();

        assert!(matches!(
            shares.mint(&alice, 1),
            Err(StakingError::ArithmeticOverflow(_))
        ));
    }
}
