//! Deployment configuration
//!
//! Accounts, pools and tokens are named by human labels in the TOML file.
//! A label that is a 64-character hex string is taken as a raw account id;
//! any other label is hashed into one. TOML integers are 64-bit, so
//! amounts and weights are read as `u64` and widened on deployment.

use anyhow::{Context, Result};
use lockstake_emission::SchedulerConfig;
use lockstake_pool::PoolConfig;
use lockstake_primitives::{AccountId, Seconds, Timestamp, MAX_POOL_COUNT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_max_pools() -> usize {
    MAX_POOL_COUNT
}

fn default_transferable() -> bool {
    true
}

/// Resolve a configuration label to an account id.
pub fn resolve_account(label: &str) -> AccountId {
    if label.len() == 64 {
        if let Ok(id) = AccountId::from_hex(label) {
            return id;
        }
    }
    AccountId::from_label(label)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Host time of deployment; the emission clock starts here.
    #[serde(default)]
    pub deployed_at: Timestamp,
    pub scheduler: SchedulerSpec,
    #[serde(default)]
    pub pools: Vec<PoolSpec>,
    /// Initial token balances
    #[serde(default)]
    pub balances: Vec<TokenBalance>,
    #[serde(default)]
    pub roles: RolesSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerSpec {
    pub address: String,
    pub reward_token: String,
    pub reward_source: String,
    #[serde(default = "default_max_pools")]
    pub max_pools: usize,
    #[serde(default)]
    pub reward_per_second: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSpec {
    pub address: String,
    pub deposit_token: String,
    pub reward_token: String,
    pub max_bonus: u64,
    pub max_lock_duration: Seconds,
    #[serde(default)]
    pub escrow_pool: Option<String>,
    #[serde(default)]
    pub escrow_portion: u64,
    #[serde(default)]
    pub escrow_duration: Seconds,
    #[serde(default = "default_transferable")]
    pub transferable: bool,
    /// Emission weight to register with at deployment, if any
    #[serde(default)]
    pub weight: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub token: String,
    pub account: String,
    pub amount: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolesSpec {
    #[serde(default)]
    pub governance: Vec<String>,
    #[serde(default)]
    pub distributor: Vec<String>,
}

impl RuntimeConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Failed to parse deployment config")
    }

    /// Load a deployment file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read deployment config {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("Invalid deployment config {}", path.display()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize deployment config")
    }
}

impl SchedulerSpec {
    pub fn address(&self) -> AccountId {
        resolve_account(&self.address)
    }

    pub fn to_scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            reward_token: resolve_account(&self.reward_token),
            reward_source: resolve_account(&self.reward_source),
            max_pools: self.max_pools,
            reward_per_second: self.reward_per_second.into(),
        }
    }
}

impl PoolSpec {
    pub fn address(&self) -> AccountId {
        resolve_account(&self.address)
    }

    pub fn to_pool_config(&self) -> PoolConfig {
        PoolConfig {
            deposit_token: resolve_account(&self.deposit_token),
            reward_token: resolve_account(&self.reward_token),
            max_bonus: self.max_bonus.into(),
            max_lock_duration: self.max_lock_duration,
            escrow_portion: self.escrow_portion.into(),
            escrow_duration: self.escrow_duration,
            escrow_pool: self.escrow_pool.as_deref().map(resolve_account),
            transferable: self.transferable,
        }
    }
}
