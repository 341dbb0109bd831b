//! credvault - command-line operator interface
//!
//! Thin dispatch layer over `vault-core`. Exit codes let scripts distinguish
//! outcomes: 0 success, 2 not found, 3 authentication failure, 4 storage
//! unavailable, 1 anything else.

mod cli;

use std::io::{BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::debug;

use vault_core::crypto::generate_salt;
use vault_core::keysource::{self, KeyringSource};
use vault_core::{CredentialStore, FileBackend, MasterKey, VaultError};

use cli::{Cli, Command};

const KEYRING_SERVICE: &str = "credvault";
const KEYRING_ACCOUNT: &str = "master-key";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            exit_code_for(&err)
        }
    }
}

fn exit_code_for(err: &VaultError) -> ExitCode {
    match err {
        VaultError::NotFound(_) => ExitCode::from(2),
        VaultError::Authentication | VaultError::MalformedToken(_) => ExitCode::from(3),
        VaultError::Unavailable(_) => ExitCode::from(4),
        _ => ExitCode::FAILURE,
    }
}

async fn run(args: Cli) -> vault_core::Result<()> {
    let backend = match &args.dir {
        Some(dir) => FileBackend::with_dir(dir.clone()),
        None => FileBackend::new()?,
    };
    let backend = Arc::new(backend);
    let store = CredentialStore::new(backend.clone());
    store.ensure_schema().await?;

    match &args.command {
        Command::Init => {
            println!("Vault ready at {:?}", backend.storage_dir());
            Ok(())
        }
        Command::Store { service, secret } => {
            let key = resolve_key(&args, &backend)?;
            let secret = match secret {
                Some(s) => s.clone(),
                None => read_secret_from_stdin(service)?,
            };
            store.put(service, &secret, &key).await?;
            println!("Stored secret for {}", service);
            Ok(())
        }
        Command::Retrieve { service } => {
            let key = resolve_key(&args, &backend)?;
            let secret = store.get(service, &key).await?;
            println!("{}", secret.expose());
            Ok(())
        }
        Command::Delete { service } => {
            store.delete(service).await?;
            println!("Deleted secret for {}", service);
            Ok(())
        }
        Command::List => {
            for name in store.list().await? {
                println!("{}", name);
            }
            Ok(())
        }
    }
}

/// Resolve the master key from one of the configured sources
fn resolve_key(args: &Cli, backend: &FileBackend) -> vault_core::Result<MasterKey> {
    if let Some(encoded) = &args.master_key {
        debug!("Using master key from configuration");
        return keysource::from_base64(encoded);
    }
    if let Some(passphrase) = &args.passphrase {
        let salt = load_or_create_salt(backend)?;
        debug!("Deriving master key from passphrase");
        return keysource::from_passphrase(passphrase, &salt, None);
    }
    if args.keyring {
        return KeyringSource::new(KEYRING_SERVICE, KEYRING_ACCOUNT).get_or_create();
    }
    Err(VaultError::KeySourceError(
        "no key source configured: set VAULT_MASTER_KEY, VAULT_PASSPHRASE, or pass --keyring"
            .to_string(),
    ))
}

/// Load the key-derivation salt, generating one on first use
///
/// The salt lives next to the vault file. It is not secret; it only pins the
/// passphrase-to-key mapping for this vault.
fn load_or_create_salt(backend: &FileBackend) -> vault_core::Result<String> {
    let path = backend.storage_dir().join("salt");
    if path.exists() {
        return Ok(std::fs::read_to_string(&path)?.trim().to_string());
    }
    let salt = generate_salt();
    std::fs::write(&path, &salt)?;
    Ok(salt)
}

fn read_secret_from_stdin(service: &str) -> vault_core::Result<String> {
    eprint!("Secret for {}: ", service);
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
