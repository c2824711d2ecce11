//! Lockstake Ledgers
//!
//! In-memory implementations of the collaborators the staking core
//! consumes through capability traits: a multi-token ledger with pull
//! authorizations, a call-recording mock for failure injection, the
//! claim-share ledger, and a role registry.

pub mod permissions;
pub mod share_ledger;
pub mod token_ledger;

pub use permissions::RoleRegistry;
pub use share_ledger::ShareLedger;
pub use token_ledger::{InMemoryTokenLedger, LedgerCall, MockTokenLedger};
