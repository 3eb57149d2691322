//! Plaintext backup and single-record export.
//!
//! Everything here writes or reads **unencrypted** JSON.  These functions
//! sit outside the authenticated-encryption boundary: a backup file gives
//! anyone who can read it every private key and recovery phrase in the
//! vault.  Callers are expected to warn the user.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::record::{Record, Vault};
use super::store::write_atomic;
use crate::errors::{Result, WalletVaultError};

/// Write the whole vault to `dest` as pretty-printed plaintext JSON.
///
/// Refuses to write over `vault_path` so a backup can never clobber the
/// encrypted file it came from.
pub fn export_plaintext(dest: &Path, vault: &Vault, vault_path: &Path) -> Result<()> {
    refuse_vault_target(dest, vault_path)?;

    let json = serde_json::to_string_pretty(vault)
        .map_err(|e| WalletVaultError::SerializationError(format!("backup: {e}")))?;
    write_atomic(dest, json.as_bytes())?;

    debug!(path = %dest.display(), records = vault.len(), "plaintext backup written");
    Ok(())
}

/// Write a single record to `dest` as pretty-printed plaintext JSON.
pub fn export_record(dest: &Path, record: &Record, vault_path: &Path) -> Result<()> {
    refuse_vault_target(dest, vault_path)?;

    let json = serde_json::to_string_pretty(record)
        .map_err(|e| WalletVaultError::SerializationError(format!("record: {e}")))?;
    write_atomic(dest, json.as_bytes())?;

    debug!(path = %dest.display(), "record exported");
    Ok(())
}

/// Read a plaintext backup file.
///
/// The file must be a JSON object of identifier -> record, where every
/// record value is a string or null.
pub fn read_plaintext(src: &Path) -> Result<Vault> {
    if !src.is_file() {
        return Err(WalletVaultError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("backup file not found or is a directory: {}", src.display()),
        )));
    }

    let content = fs::read(src)?;
    serde_json::from_slice(&content).map_err(|e| {
        WalletVaultError::DeserializationFailed(format!("backup {}: {e}", src.display()))
    })
}

/// Default file name for a single-record export: the identifier without a
/// leading `0x`, plus `.json`.
pub fn default_record_filename(id: &str) -> String {
    let stem = id
        .strip_prefix("0x")
        .or_else(|| id.strip_prefix("0X"))
        .unwrap_or(id);
    let stem: String = stem
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{stem}.json")
}

fn refuse_vault_target(dest: &Path, vault_path: &Path) -> Result<()> {
    let same = match (fs::canonicalize(dest), fs::canonicalize(vault_path)) {
        (Ok(a), Ok(b)) => a == b,
        _ => dest == vault_path,
    };
    if same {
        return Err(WalletVaultError::CommandFailed(
            "refusing to write plaintext over the encrypted vault file".into(),
        ));
    }
    Ok(())
}
