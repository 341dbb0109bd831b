//! Command-line definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// credvault - local encrypted credential vault
#[derive(Parser, Debug)]
#[command(name = "credvault")]
#[command(version = "0.1.0")]
#[command(about = "Store and retrieve per-service secrets under a single master key")]
pub struct Cli {
    /// Override the vault data directory
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Base64-encoded 32-byte master key
    #[arg(long, env = "VAULT_MASTER_KEY", hide_env_values = true, global = true)]
    pub master_key: Option<String>,

    /// Derive the master key from this passphrase (salt is kept in the data dir)
    #[arg(
        long,
        env = "VAULT_PASSPHRASE",
        hide_env_values = true,
        global = true,
        conflicts_with = "master_key"
    )]
    pub passphrase: Option<String>,

    /// Load (or create) the master key in the OS keyring
    #[arg(long, global = true, conflicts_with_all = ["master_key", "passphrase"])]
    pub keyring: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Operator actions, dispatched to the store's put/get API
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the vault storage if absent; safe to run repeatedly
    Init,
    /// Encrypt and store a secret for a service
    Store {
        /// Service name, e.g. "github"
        service: String,
        /// The secret; read from stdin when omitted
        #[arg(long)]
        secret: Option<String>,
    },
    /// Decrypt and print the secret for a service
    Retrieve {
        /// Service name
        service: String,
    },
    /// Remove the record for a service
    Delete {
        /// Service name
        service: String,
    },
    /// List stored service names
    List,
}
