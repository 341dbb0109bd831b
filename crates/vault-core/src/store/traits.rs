//! Persistence backend trait and record type

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A stored credential record: the encrypted token plus bookkeeping
///
/// The token is opaque to the backend; it is never decrypted, logged, or
/// inspected below the store layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Opaque authenticated-encryption token
    #[serde(with = "token_base64")]
    pub token: Vec<u8>,
    /// When the record was first created
    pub created_at: DateTime<Utc>,
    /// When the token was last replaced
    pub updated_at: DateTime<Utc>,
}

impl Record {
    pub fn new(token: Vec<u8>) -> Self {
        let now = Utc::now();
        Self {
            token,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Serialize tokens as base64 so they survive JSON transport
mod token_base64 {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        STANDARD.encode(bytes).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

/// Trait for vault persistence backends
///
/// One logical table: service name (primary key) to encrypted token. Backends
/// must make `upsert` atomic per name so that a concurrent reader never
/// observes a half-written record.
#[async_trait]
pub trait VaultBackend: Send + Sync {
    /// Idempotently create the underlying table/collection; safe on every startup
    async fn ensure_schema(&self) -> Result<()>;

    /// Insert a record for `name`, or replace the existing one
    async fn upsert(&self, name: &str, token: Vec<u8>) -> Result<()>;

    /// Point lookup by exact name; `None` means no record exists
    async fn fetch(&self, name: &str) -> Result<Option<Record>>;

    /// Delete the record for `name`; returns whether one existed
    async fn remove(&self, name: &str) -> Result<bool>;

    /// List all stored service names (never tokens)
    async fn list(&self) -> Result<Vec<String>>;

    /// Human-readable name for this backend
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json_roundtrip() {
        let record = Record::new(vec![0, 1, 2, 255]);

        let json = serde_json::to_string(&record).unwrap();
        let parsed: Record = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.token, record.token);
        assert_eq!(parsed.created_at, record.created_at);
    }

    #[test]
    fn test_record_token_is_base64_in_json() {
        let record = Record::new(vec![0xde, 0xad, 0xbe, 0xef]);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("3q2+7w=="));
    }
}
