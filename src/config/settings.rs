use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, WalletVaultError};
use crate::rpc::RpcConfig;

/// Project-level configuration, loaded from `.walletvault.toml`.
///
/// Every field has a sensible default so WalletVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Encrypted vault file (relative paths resolve against the project dir).
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// Where `backup` writes the plaintext export by default.
    #[serde(default = "default_backup_file")]
    pub backup_file: String,

    /// JSON-RPC node used for balance lookups.
    #[serde(default)]
    pub rpc: RpcConfig,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_file() -> String {
    "wallets.enc".to_string()
}

fn default_backup_file() -> String {
    "wallets_backup.json".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_file: default_vault_file(),
            backup_file: default_backup_file(),
            rpc: RpcConfig::default(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".walletvault.toml";

    /// Load settings from `<project_dir>/.walletvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            WalletVaultError::ConfigError(format!(
                "Failed to parse {}: {e}",
                config_path.display()
            ))
        })?;

        Ok(settings)
    }

    /// Full path to the vault file.
    pub fn vault_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_file)
    }

    /// Full path to the default plaintext backup file.
    pub fn backup_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.backup_file)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
