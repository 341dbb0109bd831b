//! Passphrase-based key derivation using Argon2id

use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;

use super::{MasterKey, KEY_LEN};
use crate::error::{Result, VaultError};

/// Parameters for Argon2id key derivation
#[derive(Debug, Clone)]
pub struct KeyDerivationParams {
    /// Memory cost in KiB (default: 65536 = 64MB)
    pub memory_cost: u32,
    /// Time cost / iterations (default: 3)
    pub time_cost: u32,
    /// Parallelism (default: 4)
    pub parallelism: u32,
}

impl Default for KeyDerivationParams {
    fn default() -> Self {
        Self {
            memory_cost: 65536,
            time_cost: 3,
            parallelism: 4,
        }
    }
}

/// Generate a cryptographically secure random salt
pub fn generate_salt() -> String {
    SaltString::generate(&mut OsRng).to_string()
}

/// Derive a 256-bit master key from a passphrase using Argon2id
pub fn derive_key(
    passphrase: &str,
    salt: &str,
    params: Option<KeyDerivationParams>,
) -> Result<MasterKey> {
    let params = params.unwrap_or_default();

    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| VaultError::KeyDerivationError(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let salt = SaltString::from_b64(salt)
        .map_err(|e| VaultError::KeyDerivationError(format!("Invalid salt: {}", e)))?;

    let password_hash = argon2
        .hash_password(passphrase.as_bytes(), &salt)
        .map_err(|e| VaultError::KeyDerivationError(e.to_string()))?;

    let hash = password_hash
        .hash
        .ok_or_else(|| VaultError::KeyDerivationError("No hash output".to_string()))?;

    if hash.as_bytes().len() < KEY_LEN {
        return Err(VaultError::KeyDerivationError(
            "Hash output too short".to_string(),
        ));
    }

    MasterKey::from_slice(&hash.as_bytes()[..KEY_LEN])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_params() -> KeyDerivationParams {
        KeyDerivationParams {
            memory_cost: 8192,
            time_cost: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn test_generate_salt_unique() {
        assert_ne!(generate_salt(), generate_salt());
    }

    #[test]
    fn test_derive_key_deterministic() {
        let salt = generate_salt();

        let key1 = derive_key("test-passphrase", &salt, Some(fast_params())).unwrap();
        let key2 = derive_key("test-passphrase", &salt, Some(fast_params())).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_passphrase_sensitive() {
        let salt = generate_salt();

        let key1 = derive_key("passphrase1", &salt, Some(fast_params())).unwrap();
        let key2 = derive_key("passphrase2", &salt, Some(fast_params())).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_salt_sensitive() {
        let key1 = derive_key("passphrase", &generate_salt(), Some(fast_params())).unwrap();
        let key2 = derive_key("passphrase", &generate_salt(), Some(fast_params())).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }
}
