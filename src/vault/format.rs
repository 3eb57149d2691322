//! Binary vault file format.
//!
//! A vault file has this layout:
//!
//! ```text
//! [salt: 16 bytes][nonce: 12 bytes][AES-256-GCM ciphertext + 16-byte tag]
//! ```
//!
//! - **Salt**: fresh per save, feeds PBKDF2-HMAC-SHA256 (200 000 rounds).
//! - **Nonce**: fresh per save, used once with the derived key.
//! - **Ciphertext**: the vault serialized as a UTF-8 JSON object.
//!
//! There are no length prefixes, magic bytes, or version fields: the first
//! two sections have fixed sizes and the rest is ciphertext.

use tracing::{debug, warn};
use zeroize::Zeroize;

use super::record::Vault;
use crate::crypto::{self, NONCE_LEN, SALT_LEN};
use crate::errors::{Result, WalletVaultError};

/// Smallest byte count that can possibly be a vault file (salt + nonce).
pub const MIN_FILE_LEN: usize = SALT_LEN + NONCE_LEN;

/// Encrypt a vault under `password`.
///
/// Every call draws a new salt and nonce, so encoding the same vault twice
/// never yields the same bytes.
pub fn encode(password: &[u8], vault: &Vault) -> Result<Vec<u8>> {
    let salt = crypto::generate_salt()?;
    let mut key = crypto::derive_key(password, &salt);

    let mut plaintext = serde_json::to_vec(vault)
        .map_err(|e| WalletVaultError::SerializationError(format!("vault: {e}")))?;

    let sealed = crypto::encrypt(&key, &plaintext);
    key.zeroize();
    plaintext.zeroize();
    let sealed = sealed?;

    let mut out = Vec::with_capacity(SALT_LEN + sealed.len());
    out.extend_from_slice(&salt);
    out.extend_from_slice(&sealed);

    debug!(records = vault.len(), bytes = out.len(), "vault encoded");
    Ok(out)
}

/// Decrypt and parse vault file bytes.
///
/// Errors are kept distinct so the caller can decide what to do:
/// - `MalformedFile` when the input is too short to hold a salt and nonce
///   (checked before any key derivation),
/// - `AuthenticationFailed` when the tag does not verify,
/// - `DeserializationFailed` when decryption works but the JSON does not.
pub fn decode(password: &[u8], bytes: &[u8]) -> Result<Vault> {
    if bytes.len() < MIN_FILE_LEN {
        return Err(WalletVaultError::MalformedFile(format!(
            "{} bytes is shorter than the {MIN_FILE_LEN}-byte minimum",
            bytes.len()
        )));
    }

    let (salt, sealed) = bytes.split_at(SALT_LEN);
    let mut key = crypto::derive_key(password, salt);
    let opened = crypto::decrypt(&key, sealed);
    key.zeroize();

    let mut plaintext = opened.inspect_err(|_| warn!("vault authentication failed"))?;

    let parsed = serde_json::from_slice::<Vault>(&plaintext)
        .map_err(|e| WalletVaultError::DeserializationFailed(format!("vault JSON: {e}")));
    plaintext.zeroize();

    let vault = parsed?;
    debug!(records = vault.len(), "vault decoded");
    Ok(vault)
}
