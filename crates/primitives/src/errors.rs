//! Error types for the staking core

use crate::roles::Role;
use crate::units::{AccountId, Amount, Timestamp, TokenId};
use thiserror::Error;

/// Failures reported by a token ledger when moving funds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient balance of token {token}: account {account} holds {available}, needs {needed}")]
    InsufficientBalance {
        token: TokenId,
        account: AccountId,
        available: Amount,
        needed: Amount,
    },

    #[error("insufficient allowance of token {token}: {spender} may move {allowed} from {owner}, needs {needed}")]
    InsufficientAllowance {
        token: TokenId,
        owner: AccountId,
        spender: AccountId,
        allowed: Amount,
        needed: Amount,
    },

    #[error("balance of token {token} would overflow for account {account}")]
    BalanceOverflow { token: TokenId, account: AccountId },

    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// Errors that can occur in pools, the reward accounting engine and the
/// emission scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StakingError {
    /// Zero-value deposit or mint attempted
    #[error("amount must be greater than zero")]
    ZeroAmount,

    /// Distribution attempted while no claim-shares are outstanding
    #[error("cannot distribute rewards: total share supply is zero")]
    ZeroShares,

    #[error("deposit {deposit_id} not found for account {account}")]
    DepositNotFound { account: AccountId, deposit_id: usize },

    #[error("pool index {0} not found in registry")]
    PoolNotFound(usize),

    /// Withdrawal before lock expiry
    #[error("deposit is still locked: now {now}, unlocks at {unlock_at}")]
    TooSoon { now: Timestamp, unlock_at: Timestamp },

    #[error("claim-share transfers are disabled for this pool")]
    TransferDisabled,

    #[error("pool {0} is already registered")]
    DuplicatePool(AccountId),

    #[error("pool registry is full ({max} pools)")]
    CapacityExceeded { max: usize },

    #[error("account {account} lacks the {role} role")]
    PermissionDenied { role: Role, account: AccountId },

    /// Underlying token pull/push rejected
    #[error("token transfer failed: {0}")]
    TransferFailure(#[from] LedgerError),

    #[error("pool handle must not be the zero account")]
    InvalidPool,

    #[error("pool {0} is not deployed")]
    UnknownPool(AccountId),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("arithmetic overflow: {0}")]
    ArithmeticOverflow(&'static str),

    #[error("insufficient claim-shares: account {account} holds {available}, needs {needed}")]
    InsufficientShares {
        account: AccountId,
        available: Amount,
        needed: Amount,
    },

    #[error("escrow pool unavailable (configured: {expected:?})")]
    EscrowUnavailable { expected: Option<AccountId> },
}

/// Result type for staking operations
pub type Result<T> = std::result::Result<T, StakingError>;
