//! In-memory persistence backend for tests and ephemeral runs

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{Record, VaultBackend};
use crate::error::Result;

/// In-memory vault storage; nothing survives the process
#[derive(Default)]
pub struct MemoryBackend {
    records: RwLock<HashMap<String, Record>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VaultBackend for MemoryBackend {
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn upsert(&self, name: &str, token: Vec<u8>) -> Result<()> {
        let mut records = self.records.write().await;
        match records.get_mut(name) {
            Some(existing) => {
                existing.token = token;
                existing.updated_at = chrono::Utc::now();
            }
            None => {
                records.insert(name.to_string(), Record::new(token));
            }
        }
        Ok(())
    }

    async fn fetch(&self, name: &str) -> Result<Option<Record>> {
        Ok(self.records.read().await.get(name).cloned())
    }

    async fn remove(&self, name: &str) -> Result<bool> {
        Ok(self.records.write().await.remove(name).is_some())
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.records.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_and_fetch() {
        let backend = MemoryBackend::new();
        backend.ensure_schema().await.unwrap();

        backend.upsert("svc", vec![1, 2]).await.unwrap();
        let record = backend.fetch("svc").await.unwrap().unwrap();
        assert_eq!(record.token, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_single_record_per_name() {
        let backend = MemoryBackend::new();

        backend.upsert("svc", vec![1]).await.unwrap();
        backend.upsert("svc", vec![2]).await.unwrap();

        assert_eq!(backend.list().await.unwrap().len(), 1);
        assert_eq!(backend.fetch("svc").await.unwrap().unwrap().token, vec![2]);
    }
}
