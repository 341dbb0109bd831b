//! Credential store: encrypted put/get over a persistence backend

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::VaultBackend;
use crate::crypto::{decrypt_string, encrypt_string, MasterKey, SecretString};
use crate::error::{Result, VaultError};

/// Default bound on any single backend call
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

/// Durable, keyed storage of encrypted credentials
///
/// Applies the cipher on the way in and out; the backend only ever sees
/// opaque tokens. One record per service name: `put` upserts, so storing
/// under an existing name replaces the token.
pub struct CredentialStore {
    backend: Arc<dyn VaultBackend>,
    op_timeout: Duration,
}

impl CredentialStore {
    /// Create a store over the given backend
    pub fn new(backend: Arc<dyn VaultBackend>) -> Self {
        Self {
            backend,
            op_timeout: DEFAULT_OP_TIMEOUT,
        }
    }

    /// Override the per-operation timeout
    pub fn with_op_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = op_timeout;
        self
    }

    /// Bound a backend call; a hang or I/O failure becomes `Unavailable`
    async fn bounded<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(VaultError::IoError(e))) => Err(VaultError::Unavailable(e.to_string())),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(VaultError::Unavailable(format!(
                "backend call exceeded {:?}",
                self.op_timeout
            ))),
        }
    }

    /// Idempotently create the underlying table; safe on every startup
    pub async fn ensure_schema(&self) -> Result<()> {
        debug!("Ensuring schema on {} backend", self.backend.backend_name());
        self.bounded(self.backend.ensure_schema()).await
    }

    /// Encrypt `plaintext` under `key` and store it for `name`
    ///
    /// Replaces any existing record for the name. Re-encryption produces a
    /// fresh token even for identical plaintext.
    pub async fn put(&self, name: &str, plaintext: &str, key: &MasterKey) -> Result<()> {
        if name.is_empty() {
            return Err(VaultError::EmptyServiceName);
        }

        let token = encrypt_string(key, plaintext)?;
        self.bounded(self.backend.upsert(name, token)).await?;

        info!("Stored credential for service: {}", name);
        Ok(())
    }

    /// Fetch and decrypt the credential for `name`
    ///
    /// Absent records fail with `NotFound`; a record whose token does not
    /// verify under `key` fails with `Authentication` or `MalformedToken`.
    /// Garbage plaintext is never returned.
    pub async fn get(&self, name: &str, key: &MasterKey) -> Result<SecretString> {
        let record = self
            .bounded(self.backend.fetch(name))
            .await?
            .ok_or_else(|| VaultError::NotFound(name.to_string()))?;

        let plaintext = decrypt_string(key, &record.token)?;
        debug!("Retrieved credential for service: {}", name);
        Ok(SecretString::new(plaintext))
    }

    /// Remove the credential for `name`
    pub async fn delete(&self, name: &str) -> Result<()> {
        let existed = self.bounded(self.backend.remove(name)).await?;
        if !existed {
            return Err(VaultError::NotFound(name.to_string()));
        }
        info!("Deleted credential for service: {}", name);
        Ok(())
    }

    /// List stored service names
    pub async fn list(&self) -> Result<Vec<String>> {
        self.bounded(self.backend.list()).await
    }
}
