//! Key-source collaborators
//!
//! The store only ever receives decoded key bytes, never raw configuration
//! strings. Each source here produces a [`MasterKey`] and fails fast when the
//! material has the wrong length.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use keyring::Entry;
use rand::{rngs::OsRng, RngCore};
use tracing::debug;
use zeroize::Zeroize;

use crate::crypto::{derive_key, KeyDerivationParams, MasterKey, KEY_LEN};
use crate::error::{Result, VaultError};

/// Decode a base64-encoded master key (e.g. from an environment variable)
pub fn from_base64(encoded: &str) -> Result<MasterKey> {
    let mut bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| VaultError::KeySourceError(format!("invalid base64 key: {}", e)))?;
    let key = MasterKey::from_slice(&bytes);
    bytes.zeroize();
    key
}

/// Derive a master key from an operator passphrase and stored salt
pub fn from_passphrase(
    passphrase: &str,
    salt: &str,
    params: Option<KeyDerivationParams>,
) -> Result<MasterKey> {
    derive_key(passphrase, salt, params)
}

/// Generate a fresh random master key
pub fn generate() -> MasterKey {
    let mut bytes = [0u8; KEY_LEN];
    OsRng.fill_bytes(&mut bytes);
    MasterKey::new(bytes)
}

/// OS keyring-backed key source
///
/// Stores the master key (base64) in the platform keyring, separate from the
/// vault's own datastore. The key is generated on first use.
pub struct KeyringSource {
    service: String,
    account: String,
}

impl KeyringSource {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }

    /// Fetch the key from the keyring, generating and storing one if absent
    pub fn get_or_create(&self) -> Result<MasterKey> {
        let entry = Entry::new(&self.service, &self.account)
            .map_err(|e| VaultError::KeySourceError(e.to_string()))?;

        if let Ok(encoded) = entry.get_password() {
            debug!("Loaded master key from OS keyring");
            return from_base64(&encoded);
        }

        let key = generate();
        let encoded = STANDARD.encode(key.as_bytes());
        entry
            .set_password(&encoded)
            .map_err(|e| VaultError::KeySourceError(e.to_string()))?;
        debug!("Generated new master key and stored it in OS keyring");
        Ok(key)
    }
}
