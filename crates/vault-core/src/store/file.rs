//! JSON-file persistence backend
//!
//! Stores records in a single versioned JSON file in the user's data
//! directory. Tokens are base64-encoded in the file. Writes go through a
//! temp-file-then-rename so a crash never leaves a torn file behind.

use async_trait::async_trait;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::debug;

use super::{Record, VaultBackend};
use crate::error::{Result, VaultError};

/// On-disk file format
#[derive(Debug, Serialize, Deserialize)]
struct VaultFile {
    version: u32,
    records: HashMap<String, Record>,
}

const FILE_VERSION: u32 = 1;

/// File-backed vault storage
///
/// `ensure_schema` must run before any mutation: it is what loads an
/// existing vault file into the cache. Calling `upsert` on a fresh backend
/// without it writes a file containing only the new record.
pub struct FileBackend {
    /// Directory holding the vault file
    storage_dir: PathBuf,
    /// In-memory view of the file; the write lock serializes all mutations
    cache: RwLock<HashMap<String, Record>>,
}

impl FileBackend {
    /// Create a backend rooted at the default data directory
    pub fn new() -> Result<Self> {
        let storage_dir = Self::default_storage_dir()?;
        Ok(Self {
            storage_dir,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Create a backend with a custom storage directory (for testing)
    pub fn with_dir(storage_dir: PathBuf) -> Self {
        Self {
            storage_dir,
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn default_storage_dir() -> Result<PathBuf> {
        ProjectDirs::from("com", "credvault", "credvault")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                VaultError::StorageError("Could not determine data directory".to_string())
            })
    }

    /// Directory holding the vault file and related material (e.g. salt)
    pub fn storage_dir(&self) -> &std::path::Path {
        &self.storage_dir
    }

    fn vault_file_path(&self) -> PathBuf {
        self.storage_dir.join("vault.json")
    }

    /// Persist the given snapshot atomically; called with the write lock held
    async fn save(&self, records: &HashMap<String, Record>) -> Result<()> {
        let file = VaultFile {
            version: FILE_VERSION,
            records: records.clone(),
        };
        let contents = serde_json::to_string_pretty(&file)?;

        let path = self.vault_file_path();
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &path).await?;

        debug!("Saved {} records to {:?}", records.len(), path);
        Ok(())
    }
}

#[async_trait]
impl VaultBackend for FileBackend {
    async fn ensure_schema(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.storage_dir).await?;

        let path = self.vault_file_path();
        if !tokio::fs::try_exists(&path).await? {
            debug!("No vault file at {:?}, starting empty", path);
            return Ok(());
        }

        let contents = tokio::fs::read_to_string(&path).await?;
        let file: VaultFile = serde_json::from_str(&contents)?;
        if file.version != FILE_VERSION {
            return Err(VaultError::StorageError(format!(
                "Unsupported vault file version: {}",
                file.version
            )));
        }

        let mut cache = self.cache.write().await;
        debug!("Loaded {} records from {:?}", file.records.len(), path);
        *cache = file.records;
        Ok(())
    }

    async fn upsert(&self, name: &str, token: Vec<u8>) -> Result<()> {
        let mut cache = self.cache.write().await;

        match cache.get_mut(name) {
            Some(existing) => {
                existing.token = token;
                existing.updated_at = chrono::Utc::now();
            }
            None => {
                cache.insert(name.to_string(), Record::new(token));
            }
        }

        self.save(&cache).await
    }

    async fn fetch(&self, name: &str) -> Result<Option<Record>> {
        Ok(self.cache.read().await.get(name).cloned())
    }

    async fn remove(&self, name: &str) -> Result<bool> {
        let mut cache = self.cache.write().await;
        let existed = cache.remove(name).is_some();
        if existed {
            self.save(&cache).await?;
        }
        Ok(existed)
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.cache.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
