//! Cryptographic primitives for the credential vault
//!
//! This module provides:
//! - AES-256-GCM authenticated encryption with random per-call nonces
//! - Argon2id key derivation from passphrases
//! - Secure memory handling with zeroize

mod cipher;
mod key_derivation;
mod secure_memory;

pub use cipher::{decrypt, decrypt_string, encrypt, encrypt_string, NONCE_LEN, TAG_LEN};
pub use key_derivation::{derive_key, generate_salt, KeyDerivationParams};
pub use secure_memory::{MasterKey, SecretString, KEY_LEN};
