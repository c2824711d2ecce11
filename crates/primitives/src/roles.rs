use serde::{Deserialize, Serialize};
use std::fmt;

/// Capabilities the core checks before privileged operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Add, remove and reweight pools; change the emission rate.
    Governance,
    /// Trigger an emission tick.
    Distributor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Governance => write!(f, "governance"),
            Role::Distributor => write!(f, "distributor"),
        }
    }
}
