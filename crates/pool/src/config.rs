//! Pool deployment parameters
//!
//! All parameters are fixed at construction; the pool never mutates them,
//! so a deposit's share amount can always be recomputed from its stored
//! duration.

use lockstake_primitives::{
    AccountId, Amount, Result, Seconds, StakingError, TokenId, BASE, MIN_LOCK_DURATION,
};
use serde::{Deserialize, Serialize};

fn default_transferable() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Token locked by depositors
    pub deposit_token: TokenId,
    /// Token distributed to claim-share holders
    pub reward_token: TokenId,
    /// Extra multiplier at `max_lock_duration`, scaled by `BASE`
    pub max_bonus: Amount,
    pub max_lock_duration: Seconds,
    /// Fraction of claimed rewards re-locked in the escrow pool, scaled by `BASE`
    #[serde(default)]
    pub escrow_portion: Amount,
    /// Lock duration requested for escrowed rewards
    #[serde(default)]
    pub escrow_duration: Seconds,
    #[serde(default)]
    pub escrow_pool: Option<AccountId>,
    /// Whether claim-shares may move between accounts
    #[serde(default = "default_transferable")]
    pub transferable: bool,
}

impl PoolConfig {
    /// Transferable pool without escrow.
    pub fn new(
        deposit_token: TokenId,
        reward_token: TokenId,
        max_bonus: Amount,
        max_lock_duration: Seconds,
    ) -> Self {
        Self {
            deposit_token,
            reward_token,
            max_bonus,
            max_lock_duration,
            escrow_portion: 0,
            escrow_duration: 0,
            escrow_pool: None,
            transferable: true,
        }
    }

    /// Route `portion` of every claim into `escrow_pool`, locked for `duration`.
    pub fn with_escrow(mut self, escrow_pool: AccountId, portion: Amount, duration: Seconds) -> Self {
        self.escrow_pool = Some(escrow_pool);
        self.escrow_portion = portion;
        self.escrow_duration = duration;
        self
    }

    pub fn non_transferable(mut self) -> Self {
        self.transferable = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_lock_duration < MIN_LOCK_DURATION {
            return Err(StakingError::InvalidConfig(format!(
                "max_lock_duration {} is below the minimum lock of {}s",
                self.max_lock_duration, MIN_LOCK_DURATION
            )));
        }
        if self.escrow_portion > BASE {
            return Err(StakingError::InvalidConfig(format!(
                "escrow_portion {} exceeds BASE",
                self.escrow_portion
            )));
        }
        match self.escrow_pool {
            None if self.escrow_portion > 0 => Err(StakingError::InvalidConfig(
                "escrow_portion is set but no escrow_pool is configured".to_string(),
            )),
            Some(pool) if pool.is_zero() => Err(StakingError::InvalidConfig(
                "escrow_pool must not be the zero account".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
