//! Error types for vault-core

use thiserror::Error;

/// Result type alias for vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Vault error types
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("No credential stored for service: {0}")]
    NotFound(String),

    #[error("Token failed authentication - wrong key or tampered data")]
    Authentication,

    #[error("Stored token is malformed: {0}")]
    MalformedToken(String),

    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("A record for this service already exists: {0}")]
    ConstraintViolation(String),

    #[error("Invalid master key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("Service name must not be empty")]
    EmptyServiceName,

    #[error("Encryption failed: {0}")]
    EncryptionError(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationError(String),

    #[error("Key source error: {0}")]
    KeySourceError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
