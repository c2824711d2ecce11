//! Collaborator capabilities consumed by the staking core
//!
//! The core never implements token mechanics, claim-share supply
//! bookkeeping or permission storage itself. It talks to them through
//! these traits; `lockstake-ledger` provides in-memory implementations.

use crate::context::CallContext;
use crate::errors::{LedgerError, Result, StakingError};
use crate::roles::Role;
use crate::units::{AccountId, Amount, TokenId};
use std::collections::{BTreeMap, HashMap};

/// Fungible token balances and pull authorizations.
pub trait TokenLedger {
    fn balance_of(&self, token: &TokenId, account: &AccountId) -> Amount;

    fn allowance(&self, token: &TokenId, owner: &AccountId, spender: &AccountId) -> Amount;

    /// Authorize `spender` to move up to `amount` of `owner`'s balance.
    /// `Amount::MAX` is a standing authorization that is never consumed.
    fn approve(&mut self, token: &TokenId, owner: &AccountId, spender: &AccountId, amount: Amount);

    /// Move `amount` out of `from`, which must be the party issuing the call.
    fn transfer(
        &mut self,
        token: &TokenId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> std::result::Result<(), LedgerError>;

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming allowance.
    fn transfer_from(
        &mut self,
        token: &TokenId,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> std::result::Result<(), LedgerError>;

    /// Pull `amount` from `from` into `collector`'s custody using the
    /// collector's allowance.
    fn pull(
        &mut self,
        token: &TokenId,
        collector: &AccountId,
        from: &AccountId,
        amount: Amount,
    ) -> std::result::Result<(), LedgerError> {
        self.transfer_from(token, collector, from, collector, amount)
    }

    /// Push `amount` out of `holder`'s custody to `to`.
    fn push(
        &mut self,
        token: &TokenId,
        holder: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> std::result::Result<(), LedgerError> {
        self.transfer(token, holder, to, amount)
    }
}

/// Read access to a claim-share ledger.
pub trait ShareSource {
    fn shares_of(&self, account: &AccountId) -> Amount;

    fn total_shares(&self) -> Amount;
}

/// Opaque role checks.
pub trait Permissions: Send + Sync {
    fn has_role(&self, role: Role, account: &AccountId) -> bool;
}

/// Fail with `PermissionDenied` unless `account` holds `role`.
pub fn ensure_role(permissions: &dyn Permissions, role: Role, account: &AccountId) -> Result<()> {
    if permissions.has_role(role, account) {
        Ok(())
    } else {
        Err(StakingError::PermissionDenied {
            role,
            account: *account,
        })
    }
}

/// Reward intake exposed by pools to the emission scheduler.
pub trait DistributionReceiver {
    fn receiver_address(&self) -> AccountId;

    /// Pull `amount` of reward token from `ctx.caller` and fold it into the
    /// accrual rate. May fail; callers isolate the failure.
    fn receive_distribution(
        &mut self,
        ctx: &CallContext,
        tokens: &mut dyn TokenLedger,
        amount: Amount,
    ) -> Result<()>;
}

/// Resolves pool handles to live receivers.
pub trait PoolDirectory {
    fn receiver_mut(&mut self, pool: &AccountId) -> Option<&mut dyn DistributionReceiver>;
}

impl<R: DistributionReceiver> PoolDirectory for BTreeMap<AccountId, R> {
    fn receiver_mut(&mut self, pool: &AccountId) -> Option<&mut dyn DistributionReceiver> {
        self.get_mut(pool).map(|r| r as &mut dyn DistributionReceiver)
    }
}

impl<R: DistributionReceiver> PoolDirectory for HashMap<AccountId, R> {
    fn receiver_mut(&mut self, pool: &AccountId) -> Option<&mut dyn DistributionReceiver> {
        self.get_mut(pool).map(|r| r as &mut dyn DistributionReceiver)
    }
}
