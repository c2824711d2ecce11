//! Units shared by every staking component

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Token amount in base units.
pub type Amount = u128;

/// Seconds since the Unix epoch, as reported by the host.
pub type Timestamp = u64;

/// A span of time in seconds.
pub type Seconds = u64;

/// Emission weight of a registered pool.
pub type Weight = u128;

/// Identity of an account, pool, scheduler or token.
/// Serialized as a 64-character hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountId(pub [u8; 32]);

/// Tokens are addressed the same way accounts are.
pub type TokenId = AccountId;

impl AccountId {
    /// The null handle. Never a valid pool.
    pub const ZERO: AccountId = AccountId([0u8; 32]);

    /// Derive a deterministic identity from a human-readable label.
    pub fn from_label(label: &str) -> Self {
        Self(*blake3::hash(label.as_bytes()).as_bytes())
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        AccountId::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", hex::encode(&self.0[..8]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_ids_are_deterministic() {
        let a = AccountId::from_label("alice");
        let b = AccountId::from_label("alice");
        let c = AccountId::from_label("bob");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.is_zero());
        assert!(AccountId::ZERO.is_zero());
    }

    #[test]
    fn test_hex_parsing() {
        let id = AccountId::from_label("pool");
        let parsed = AccountId::from_hex(&id.to_hex()).unwrap();
        assert_eq!(parsed, id);

        assert!(AccountId::from_hex("abcd").is_err());
    }

    #[test]
    fn test_serializes_as_hex_string() {
        let id = AccountId::from_label("scheduler");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.to_hex()));
        assert_eq!(serde_json::from_str::<AccountId>(&json).unwrap(), id);
        assert!(serde_json::from_str::<AccountId>("\"not-hex\"").is_err());
    }

    #[test]
    fn test_display_is_short_prefix() {
        let id = AccountId([0xab; 32]);
        assert_eq!(id.to_string(), "abababababababab");
        assert_eq!(format!("{id:?}"), "AccountId(abababababababab)");
    }
}
