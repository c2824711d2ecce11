//! Role registry backing the `Permissions` capability

use lockstake_primitives::{AccountId, Permissions, Role};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use tracing::info;

/// Thread-safe role grants. Administration of who may grant is left to the
/// host; the staking core only ever asks `has_role`.
#[derive(Debug, Default)]
pub struct RoleRegistry {
    grants: RwLock<HashMap<Role, HashSet<AccountId>>>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, role: Role, account: AccountId) {
        let inserted = self.grants.write().entry(role).or_default().insert(account);
        if inserted {
            info!(target: "roles", role = %role, account = %account, "Granted role");
        }
    }

    pub fn revoke(&self, role: Role, account: &AccountId) {
        let removed = self
            .grants
            .write()
            .get_mut(&role)
            .map(|members| members.remove(account))
            .unwrap_or(false);
        if removed {
            info!(target: "roles", role = %role, account = %account, "Revoked role");
        }
    }

    pub fn members(&self, role: Role) -> Vec<AccountId> {
        let mut members: Vec<AccountId> = self
            .grants
            .read()
            .get(&role)
            .map(|m| m.iter().copied().collect())
            .unwrap_or_default();
        members.sort();
        members
    }
}

impl Permissions for RoleRegistry {
    fn has_role(&self, role: Role, account: &AccountId) -> bool {
        self.grants
            .read()
            .get(&role)
            .is_some_and(|members| members.contains(account))
    }
}
