//! High-level vault operations used by CLI commands.
//!
//! `VaultStore` ties a vault file path, the master password, and the
//! decrypted in-memory `Vault` together.  Commands load it once, mutate
//! records in memory, and call `save` to re-encrypt and replace the file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zeroize::Zeroizing;

use super::format;
use super::record::{MergeSummary, Record, Vault};
use crate::errors::{Result, WalletVaultError};

/// The main vault handle.  Create one with `VaultStore::open`, then use its
/// methods to manage records.
pub struct VaultStore {
    /// Path to the encrypted vault file on disk.
    path: PathBuf,

    /// Master password, kept to re-derive a key for each save (zeroized on drop).
    password: Zeroizing<Vec<u8>>,

    /// Decrypted records.
    vault: Vault,

    /// Whether a vault file existed when the store was opened.
    existed: bool,

    /// Whether in-memory records differ from what is on disk.
    dirty: bool,
}

impl VaultStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Open the vault at `path` with `password`.
    ///
    /// A missing file is not an error: the store starts empty and the file
    /// is created on the first `save`.  A present file must decrypt under
    /// `password`; on any failure the error is returned and the file is
    /// left alone.
    pub fn open(path: &Path, password: &[u8]) -> Result<Self> {
        let password = Zeroizing::new(password.to_vec());

        if !path.exists() {
            debug!(path = %path.display(), "no vault file, starting empty");
            return Ok(Self {
                path: path.to_path_buf(),
                password,
                vault: Vault::new(),
                existed: false,
                dirty: false,
            });
        }

        let bytes = fs::read(path)?;
        let vault = format::decode(&password, &bytes)?;
        info!(path = %path.display(), records = vault.len(), "vault unlocked");

        Ok(Self {
            path: path.to_path_buf(),
            password,
            vault,
            existed: true,
            dirty: false,
        })
    }

    // ------------------------------------------------------------------
    // Record operations
    // ------------------------------------------------------------------

    /// Look up a record by identifier.
    pub fn get(&self, id: &str) -> Result<&Record> {
        self.vault
            .get(id)
            .ok_or_else(|| WalletVaultError::RecordNotFound(id.to_string()))
    }

    /// Insert or replace a record.  Returns `true` if it replaced one.
    pub fn upsert(&mut self, id: &str, record: Record) -> bool {
        self.dirty = true;
        self.vault.insert(id, record).is_some()
    }

    /// Insert a record that must not exist yet.
    pub fn insert_new(&mut self, id: &str, record: Record) -> Result<()> {
        if self.vault.contains(id) {
            return Err(WalletVaultError::RecordAlreadyExists(id.to_string()));
        }
        self.upsert(id, record);
        Ok(())
    }

    /// Remove a record.
    pub fn remove(&mut self, id: &str) -> Result<Record> {
        let record = self
            .vault
            .remove(id)
            .ok_or_else(|| WalletVaultError::RecordNotFound(id.to_string()))?;
        self.dirty = true;
        Ok(record)
    }

    /// Merge records from a plaintext backup; incoming records win.
    pub fn merge(&mut self, incoming: Vault) -> MergeSummary {
        let summary = self.vault.merge(incoming);
        if summary.added + summary.replaced > 0 {
            self.dirty = true;
        }
        summary
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Encrypt the vault with a fresh salt and nonce and replace the file
    /// atomically.
    ///
    /// The bytes go to a temp file in the same directory, are synced, and
    /// the temp file is renamed over the target.  On failure the temp file
    /// is removed and the previous vault file is untouched.
    pub fn save(&mut self) -> Result<()> {
        let bytes = format::encode(&self.password, &self.vault)?;
        write_atomic(&self.path, &bytes)?;

        self.existed = true;
        self.dirty = false;
        info!(path = %self.path.display(), records = self.vault.len(), "vault saved");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The decrypted records.
    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    /// Returns the number of records in the vault.
    pub fn record_count(&self) -> usize {
        self.vault.len()
    }

    /// `true` if no vault file existed when this store was opened and it
    /// has not been saved since.
    pub fn is_new(&self) -> bool {
        !self.existed
    }

    /// `true` if there are unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Write `bytes` to `path` via temp file + rename.
///
/// The temp file is in the same directory so the rename stays on one
/// filesystem.  It is created owner-only on Unix.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    let result = write_and_sync(&tmp_path, bytes).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(WalletVaultError::Io(e));
    }
    Ok(())
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;

    // `mode` only applies on create; a leftover temp file keeps its old bits.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(bytes)?;
    file.sync_all()
}
