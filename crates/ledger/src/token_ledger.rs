//! Token ledger implementations
//!
//! Provides a lightweight, deterministic multi-token ledger with ERC-20
//! style pull authorizations. Used by pools and the emission scheduler for
//! custody of deposit and reward tokens.

use lockstake_primitives::{AccountId, Amount, LedgerError, TokenId, TokenLedger};
use std::collections::{HashMap, HashSet};
use tracing::debug;

// -----------------------------------------------------------------------------
// In-memory implementation (for the runtime host or testing)
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenLedger {
    balances: HashMap<TokenId, HashMap<AccountId, Amount>>,
    allowances: HashMap<TokenId, HashMap<(AccountId, AccountId), Amount>>,
    supplies: HashMap<TokenId, Amount>,
}

impl InMemoryTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create new supply of `token` in `account`. Stands in for the token's
    /// own issuance mechanics.
    pub fn mint(
        &mut self,
        token: &TokenId,
        account: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let supply = self.supplies.get(token).copied().unwrap_or(0);
        let new_supply = supply
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow {
                token: *token,
                account: *account,
            })?;
        self.credit(token, account, amount)?;
        self.supplies.insert(*token, new_supply);
        debug!(target: "ledger", token = %token, account = %account, amount, "Minted tokens");
        Ok(())
    }

    pub fn total_supply(&self, token: &TokenId) -> Amount {
        self.supplies.get(token).copied().unwrap_or(0)
    }

    fn debit(
        &mut self,
        token: &TokenId,
        account: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let available = self.balance_of(token, account);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                token: *token,
                account: *account,
                available,
                needed: amount,
            });
        }
        self.balances
            .entry(*token)
            .or_default()
            .insert(*account, available - amount);
        Ok(())
    }

    fn credit(
        &mut self,
        token: &TokenId,
        account: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let current = self.balance_of(token, account);
        let updated = current
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow {
                token: *token,
                account: *account,
            })?;
        self.balances
            .entry(*token)
            .or_default()
            .insert(*account, updated);
        Ok(())
    }

    fn check_transfer(
        &self,
        token: &TokenId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let available = self.balance_of(token, from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                token: *token,
                account: *from,
                available,
                needed: amount,
            });
        }
        if from != to && self.balance_of(token, to).checked_add(amount).is_none() {
            return Err(LedgerError::BalanceOverflow {
                token: *token,
                account: *to,
            });
        }
        Ok(())
    }
}

impl TokenLedger for InMemoryTokenLedger {
    fn balance_of(&self, token: &TokenId, account: &AccountId) -> Amount {
        self.balances
            .get(token)
            .and_then(|accounts| accounts.get(account))
            .copied()
            .unwrap_or(0)
    }

    fn allowance(&self, token: &TokenId, owner: &AccountId, spender: &AccountId) -> Amount {
        self.allowances
            .get(token)
            .and_then(|grants| grants.get(&(*owner, *spender)))
            .copied()
            .unwrap_or(0)
    }

    fn approve(&mut self, token: &TokenId, owner: &AccountId, spender: &AccountId, amount: Amount) {
        let grants = self.allowances.entry(*token).or_default();
        if amount == 0 {
            grants.remove(&(*owner, *spender));
        } else {
            grants.insert((*owner, *spender), amount);
        }
    }

    fn transfer(
        &mut self,
        token: &TokenId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.check_transfer(token, from, to, amount)?;
        if from == to || amount == 0 {
            return Ok(());
        }
        self.debit(token, from, amount)?;
        self.credit(token, to, amount)
    }

    fn transfer_from(
        &mut self,
        token: &TokenId,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance(token, from, spender);
        if spender != from && allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                token: *token,
                owner: *from,
                spender: *spender,
                allowed,
                needed: amount,
            });
        }
        self.transfer(token, from, to, amount)?;
        if spender != from && allowed != Amount::MAX {
            self.approve(token, from, spender, allowed - amount);
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Mock ledger (for deterministic testing and failure injection)
// -----------------------------------------------------------------------------

/// A transfer observed by [`MockTokenLedger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerCall {
    pub token: TokenId,
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Amount,
}

#[derive(Debug, Clone, Default)]
pub struct MockTokenLedger {
    inner: InMemoryTokenLedger,
    transfer_calls: Vec<LedgerCall>,
    rejected: HashSet<AccountId>,
}

impl MockTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(
        &mut self,
        token: &TokenId,
        account: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.inner.mint(token, account, amount)
    }

    /// Every transfer into or out of `account` fails from now on.
    pub fn reject_account(&mut self, account: AccountId) {
        self.rejected.insert(account);
    }

    pub fn accept_account(&mut self, account: &AccountId) {
        self.rejected.remove(account);
    }

    pub fn get_transfer_calls(&self) -> &[LedgerCall] {
        &self.transfer_calls
    }

    pub fn clear_calls(&mut self) {
        self.transfer_calls.clear();
    }

    fn screen(&self, from: &AccountId, to: &AccountId) -> Result<(), LedgerError> {
        for account in [from, to] {
            if self.rejected.contains(account) {
                return Err(LedgerError::Rejected(format!(
                    "account {account} is blocked"
                )));
            }
        }
        Ok(())
    }
}

impl TokenLedger for MockTokenLedger {
    fn balance_of(&self, token: &TokenId, account: &AccountId) -> Amount {
        self.inner.balance_of(token, account)
    }

    fn allowance(&self, token: &TokenId, owner: &AccountId, spender: &AccountId) -> Amount {
        self.inner.allowance(token, owner, spender)
    }

    fn approve(&mut self, token: &TokenId, owner: &AccountId, spender: &AccountId, amount: Amount) {
        self.inner.approve(token, owner, spender, amount)
    }

    fn transfer(
        &mut self,
        token: &TokenId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.screen(from, to)?;
        self.inner.transfer(token, from, to, amount)?;
        self.transfer_calls.push(LedgerCall {
            token: *token,
            from: *from,
            to: *to,
            amount,
        });
        Ok(())
    }

    fn transfer_from(
        &mut self,
        token: &TokenId,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.screen(from, to)?;
        self.inner.transfer_from(token, spender, from, to, amount)?;
        self.transfer_calls.push(LedgerCall {
            token: *token,
            from: *from,
            to: *to,
            amount,
        });
        Ok(())
    }
}
