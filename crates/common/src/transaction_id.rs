//! Transaction identifier using UUIDv7
//!
//! UUIDv7 provides time-ordered uniqueness with deterministic total ordering,
//! so identifiers allocated later always compare greater. That is useful
//! when reading coordinator logs, and all that transaction identity needs.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Transaction identifier using UUIDv7 for time-ordered uniqueness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Generate a new transaction ID using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create from existing UUID (for testing/deserialization)
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Convert to bytes (16 bytes, big-endian)
    pub fn to_bytes(&self) -> [u8; 16] {
        *self.0.as_bytes()
    }

    /// Parse from bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid transaction ID: {}", e))
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = TransactionId::new();
        let b = TransactionId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_ids_are_time_ordered() {
        let earlier = TransactionId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let later = TransactionId::new();
        assert!(earlier < later);
    }

    #[test]
    fn test_roundtrip_through_string() {
        let id = TransactionId::new();
        let parsed = TransactionId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_roundtrip_through_bytes() {
        let id = TransactionId::new();
        assert_eq!(id, TransactionId::from_bytes(id.to_bytes()));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(TransactionId::parse("not-a-uuid").is_err());
    }
}
