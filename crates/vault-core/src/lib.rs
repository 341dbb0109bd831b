//! # vault-core
//!
//! Core functionality for the local credential vault:
//! - AES-256-GCM authenticated encryption with zeroize-on-drop key handling
//! - Keyed credential storage with upsert semantics over pluggable backends
//! - Key sourcing from base64 config values, passphrases, or the OS keyring

pub mod crypto;
pub mod error;
pub mod keysource;
pub mod store;

pub use crypto::{decrypt, decrypt_string, encrypt, encrypt_string, MasterKey, SecretString};
pub use error::{Result, VaultError};
pub use store::{CredentialStore, FileBackend, MemoryBackend, Record, VaultBackend};
