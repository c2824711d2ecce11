use lockstake_primitives::{AccountId, Amount, Result, StakingError, TokenId, MAX_POOL_COUNT};
use serde::{Deserialize, Serialize};

fn default_max_pools() -> usize {
    MAX_POOL_COUNT
}

/// Emission scheduler deployment parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub reward_token: TokenId,
    /// Account the scheduler pulls emissions from and returns leftovers to.
    /// Must authorize the scheduler to pull the reward token.
    pub reward_source: AccountId,
    #[serde(default = "default_max_pools")]
    pub max_pools: usize,
    /// Rate in effect from deployment
    #[serde(default)]
    pub reward_per_second: Amount,
}

impl SchedulerConfig {
    pub fn new(reward_token: TokenId, reward_source: AccountId) -> Self {
        Self {
            reward_token,
            reward_source,
            max_pools: MAX_POOL_COUNT,
            reward_per_second: 0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_pools == 0 || self.max_pools > MAX_POOL_COUNT {
            return Err(StakingError::InvalidConfig(format!(
                "max_pools must be within 1..={}, got {}",
                MAX_POOL_COUNT, self.max_pools
            )));
        }
        if self.reward_source.is_zero() {
            return Err(StakingError::InvalidConfig(
                "reward_source must not be the zero account".to_string(),
            ));
        }
        Ok(())
    }
}
