//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, WalletVaultError};
use crate::vault::VaultStore;

/// Minimum password length for newly created vaults.
const MIN_PASSWORD_LEN: usize = 8;

/// Maximum length of an account identifier.
const MAX_IDENTIFIER_LEN: usize = 256;

/// WalletVault CLI: encrypted wallet key manager.
#[derive(Parser)]
#[command(
    name = "walletvault",
    about = "Encrypted vault for wallet keys and recovery phrases",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file (default: wallets.enc, or `vault_file` in .walletvault.toml)
    #[arg(long, env = "WALLETVAULT_FILE", global = true)]
    pub vault_file: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Generate a new account and store it (needs the `keygen` feature)
    Create {
        /// HD derivation path
        #[arg(long, default_value = crate::keygen::DEFAULT_DERIVATION_PATH)]
        derivation_path: String,
        /// Chain tag (e.g. eth)
        #[arg(long)]
        chain: Option<String>,
    },

    /// Add (import) an account record
    Add {
        /// Account identifier (derived from the key or mnemonic when omitted)
        id: Option<String>,
        /// Private key (omit for interactive prompt)
        #[arg(long)]
        private_key: Option<String>,
        /// Recovery phrase (omit for interactive prompt)
        #[arg(long)]
        mnemonic: Option<String>,
        /// HD derivation path (e.g. m/44'/60'/0'/0/0)
        #[arg(long)]
        derivation_path: Option<String>,
        /// Chain tag (e.g. eth)
        #[arg(long)]
        chain: Option<String>,
        /// Extra field as KEY=VALUE (repeatable)
        #[arg(long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
        /// Overwrite an existing record with the same identifier
        #[arg(short, long)]
        force: bool,
    },

    /// List all account identifiers
    List,

    /// Show a single record
    Show {
        /// Account identifier
        id: String,
        /// Print private keys and mnemonics instead of masking them
        #[arg(long)]
        reveal: bool,
    },

    /// Delete a record
    Delete {
        /// Account identifier
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Export one record to a plaintext JSON file
    Export {
        /// Account identifier
        id: String,
        /// Output file path (default: <id without 0x>.json)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Write every record to a plaintext JSON backup (UNENCRYPTED)
    Backup {
        /// Output file path (default: wallets_backup.json)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Merge records from a plaintext JSON backup (backup entries win)
    Restore {
        /// Path to the backup file
        file: String,
    },

    /// Look up an account's balance on the configured RPC node
    Balance {
        /// Account identifier (must be in the vault)
        id: String,
    },

    /// Interactive menu: unlock once, edit in memory, save on exit
    Shell,

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the vault password for an existing vault, trying in order:
/// 1. `WALLETVAULT_PASSWORD` env var (scripts/CI)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var("WALLETVAULT_PASSWORD") {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Master password")
        .interact()
        .map_err(|e| WalletVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password with confirmation (first save of a new vault).
///
/// Also respects `WALLETVAULT_PASSWORD` for scripted usage.
/// Enforces a minimum password length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var("WALLETVAULT_PASSWORD") {
        if !pw.is_empty() {
            if pw.len() < MIN_PASSWORD_LEN {
                return Err(WalletVaultError::CommandFailed(format!(
                    "password must be at least {MIN_PASSWORD_LEN} characters"
                )));
            }
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose master password")
            .with_confirmation(
                "Confirm master password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| WalletVaultError::CommandFailed(format!("password prompt: {e}")))?;

        if password.len() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// Resolve the vault file path: `--vault-file` first, then settings.
pub fn vault_path(cli: &Cli) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    match &cli.vault_file {
        Some(path) => Ok(cwd.join(path)),
        None => Ok(Settings::load(&cwd)?.vault_path(&cwd)),
    }
}

/// Unlock the vault for a command that will write to it.
///
/// If no vault file exists yet, a new password is chosen (with
/// confirmation) and the file is created on the first save.
pub fn unlock_for_write(cli: &Cli) -> Result<VaultStore> {
    let path = vault_path(cli)?;
    let password = if path.exists() {
        prompt_password()?
    } else {
        output::info(&format!(
            "No vault at {} — a new one will be created.",
            path.display()
        ));
        prompt_new_password()?
    };
    VaultStore::open(&path, password.as_bytes())
}

/// Unlock an existing vault for reading.
///
/// Returns `None` (after telling the user) when no vault file exists:
/// an absent file is an empty vault, so there is nothing to decrypt.
pub fn unlock_for_read(cli: &Cli) -> Result<Option<VaultStore>> {
    let path = vault_path(cli)?;
    if !path.exists() {
        output::info(&format!("No vault at {} yet.", path.display()));
        output::tip("Run `walletvault add <ID>` to store your first account.");
        return Ok(None);
    }
    let password = prompt_password()?;
    VaultStore::open(&path, password.as_bytes()).map(Some)
}

/// Validate that an account identifier is safe to use as a map key and
/// as a file name stem.
///
/// Must be non-empty, at most 256 characters, and free of whitespace and
/// control characters.
pub fn validate_identifier(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(WalletVaultError::InvalidIdentifier(
            "identifier cannot be empty".into(),
        ));
    }

    if id.chars().count() > MAX_IDENTIFIER_LEN {
        return Err(WalletVaultError::InvalidIdentifier(format!(
            "identifier cannot exceed {MAX_IDENTIFIER_LEN} characters"
        )));
    }

    if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(WalletVaultError::InvalidIdentifier(format!(
            "'{}' contains whitespace or control characters",
            id.escape_debug()
        )));
    }

    Ok(())
}
