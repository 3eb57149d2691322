use thiserror::Error;

/// All errors that can occur in WalletVault.
#[derive(Debug, Error)]
pub enum WalletVaultError {
    // --- Vault file errors ---
    #[error("Vault file is malformed: {0}")]
    MalformedFile(String),

    #[error("Decryption failed — wrong password or corrupted data")]
    AuthenticationFailed,

    #[error("Vault data could not be decoded: {0}")]
    DeserializationFailed(String),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    // --- Record errors ---
    #[error("Record '{0}' not found")]
    RecordNotFound(String),

    #[error("Record '{0}' already exists (use --force to overwrite)")]
    RecordAlreadyExists(String),

    #[error("Invalid account identifier: {0}")]
    InvalidIdentifier(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("Audit error: {0}")]
    AuditError(String),

    // --- Collaborator errors ---
    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Key derivation failed: {0}")]
    KeyGeneration(String),

    #[error("{0} is not available in this build")]
    FeatureUnavailable(String),
}

impl WalletVaultError {
    /// Returns `true` when the vault file could not be unlocked.
    ///
    /// A wrong password and a damaged file look the same to AES-GCM, and a
    /// truncated file is caught before decryption even starts.  The CLI
    /// reports all of these with one message.
    pub fn is_unlock_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed | Self::MalformedFile(_))
    }
}

/// Convenience type alias for WalletVault results.
pub type Result<T> = std::result::Result<T, WalletVaultError>;
