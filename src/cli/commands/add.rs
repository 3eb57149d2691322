//! `walletvault add` — import an account record into the vault.
//!
//! The vault does not check keys: whatever fields are given are stored
//! as-is.  Private key and mnemonic are prompted for securely when not
//! passed on the command line.  Without an identifier, the account address
//! is derived from the private key (or from the mnemonic) instead.

use std::io::{self, IsTerminal};

use crate::cli::output;
use crate::cli::{unlock_for_write, validate_identifier, Cli};
use crate::errors::{Result, WalletVaultError};
use crate::keygen::{import_account, key_generator};
use crate::vault::record::{Record, CHAIN, DERIVATION_PATH, MNEMONIC, PRIVATE_KEY};

/// Field values supplied on the command line.
#[derive(Debug, Default)]
pub struct AddOptions<'a> {
    pub private_key: Option<&'a str>,
    pub mnemonic: Option<&'a str>,
    pub derivation_path: Option<&'a str>,
    pub chain: Option<&'a str>,
    pub fields: &'a [String],
    pub force: bool,
}

/// Execute the `add` command.
pub fn execute(cli: &Cli, id: Option<&str>, opts: &AddOptions<'_>) -> Result<()> {
    if let Some(id) = id {
        validate_identifier(id)?;
    }
    let extra = parse_fields(opts.fields)?;

    let generator = match id {
        Some(_) => None,
        None => Some(key_generator().ok_or_else(|| {
            WalletVaultError::FeatureUnavailable(
                "Deriving the identifier from a key (rebuild with `--features keygen`, \
                 or pass the identifier)"
                    .into(),
            )
        })?),
    };

    if opts.private_key.is_some() || opts.mnemonic.is_some() {
        output::warning("Secret provided on command line — it may appear in shell history.");
    }

    let mut store = unlock_for_write(cli)?;
    if let Some(id) = id {
        ensure_free(store.vault().contains(id), id, opts.force)?;
    }

    let label = id.unwrap_or("the new account");
    let private_key = match opts.private_key {
        Some(v) => non_empty(v),
        None => prompt_secret(&format!("Private key for {label} (empty for none)"))?,
    };
    let mnemonic = match opts.mnemonic {
        Some(v) => non_empty(v),
        None => prompt_secret(&format!("Recovery phrase for {label} (empty for none)"))?,
    };
    let derivation_path = opts.derivation_path.and_then(non_empty);
    let chain = opts.chain.and_then(non_empty);

    let (id, record) = match generator {
        None => {
            let id = id.unwrap_or_default().to_string();
            let record = build_record(private_key, mnemonic, derivation_path, chain, extra);
            (id, record)
        }
        Some(generator) => {
            let account =
                import_account(generator.as_ref(), private_key, mnemonic, derivation_path)?;
            validate_identifier(&account.address)?;
            ensure_free(
                store.vault().contains(&account.address),
                &account.address,
                opts.force,
            )?;
            let record = build_record(
                Some(account.private_key),
                account.mnemonic,
                account.derivation_path,
                chain,
                extra,
            );
            (account.address, record)
        }
    };

    let replaced = store.upsert(&id, record);
    store.save()?;

    let detail = if replaced { "replaced" } else { "added" };
    crate::audit::log_audit(store.path(), "add", Some(&id), Some(detail));

    output::success(&format!(
        "Account '{id}' {detail} ({} total)",
        store.record_count()
    ));
    Ok(())
}

fn ensure_free(exists: bool, id: &str, force: bool) -> Result<()> {
    if exists && !force {
        return Err(WalletVaultError::RecordAlreadyExists(id.to_string()));
    }
    Ok(())
}

/// Assemble a record.  Well-known secret fields are always present (null
/// when absent) so every record has the same basic shape.
pub fn build_record(
    private_key: Option<String>,
    mnemonic: Option<String>,
    derivation_path: Option<String>,
    chain: Option<String>,
    extra: Vec<(String, Option<String>)>,
) -> Record {
    let mut record = Record::new()
        .with(PRIVATE_KEY, private_key)
        .with(MNEMONIC, mnemonic);
    if derivation_path.is_some() {
        record.set(DERIVATION_PATH, derivation_path);
    }
    if chain.is_some() {
        record.set(CHAIN, chain);
    }
    for (key, value) in extra {
        record.set(key, value);
    }
    record
}

/// Parse repeated `--field KEY=VALUE` arguments.  `KEY=` stores null.
pub fn parse_fields(raw: &[String]) -> Result<Vec<(String, Option<String>)>> {
    raw.iter()
        .map(|item| {
            let (key, value) = item.split_once('=').ok_or_else(|| {
                WalletVaultError::CommandFailed(format!("field '{item}' must be KEY=VALUE"))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(WalletVaultError::CommandFailed(format!(
                    "field '{item}' has an empty name"
                )));
            }
            Ok((key.to_string(), non_empty(value)))
        })
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Hidden prompt for a secret field; skipped when stdin is not a terminal.
fn prompt_secret(prompt: &str) -> Result<Option<String>> {
    if !io::stdin().is_terminal() {
        return Ok(None);
    }
    let value = dialoguer::Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| WalletVaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(non_empty(&value))
}
