//! Persistent storage of encrypted credentials
//!
//! The [`CredentialStore`] applies the cipher; [`VaultBackend`]
//! implementations own durability. Two backends:
//! 1. JSON file (default)
//! 2. In-memory (tests, ephemeral runs)

mod credential_store;
mod file;
mod memory;
mod traits;

pub use credential_store::{CredentialStore, DEFAULT_OP_TIMEOUT};
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use traits::{Record, VaultBackend};
