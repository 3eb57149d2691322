//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The work factor is fixed at compile time so every vault file written by
//! this version can be opened by every other build of it.  A fresh salt is
//! generated for every save.

use rand::rngs::OsRng;
use rand::TryRngCore;
use sha2::Sha256;

use crate::errors::{Result, WalletVaultError};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count.  Not user-tunable: changing it breaks every
/// existing vault file.
pub const PBKDF2_ITERATIONS: u32 = 200_000;

/// Derive a 32-byte key from a password and salt.
///
/// Total over its inputs: any password (including the empty one) and any
/// salt produce a key.  The same password + salt always produce the same key.
pub fn derive_key(password: &[u8], salt: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, PBKDF2_ITERATIONS, &mut key);
    key
}

/// Generate a random 16-byte salt from the operating system RNG.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| WalletVaultError::EncryptionFailed(format!("system RNG unavailable: {e}")))?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_rfc_7914_pbkdf2_sha256_vector() {
        // RFC 7914 §11: P="passwd", S="salt", c=1, dkLen=64 (first 32 bytes).
        let mut out = [0u8; 32];
        pbkdf2::pbkdf2_hmac::<Sha256>(b"passwd", b"salt", 1, &mut out);
        assert_eq!(
            out[..8],
            [0x55, 0xac, 0x04, 0x6e, 0x56, 0xe3, 0x08, 0x9f]
        );
    }

    #[test]
    fn same_inputs_same_key() {
        let salt = [7u8; SALT_LEN];
        assert_eq!(derive_key(b"hunter2", &salt), derive_key(b"hunter2", &salt));
    }

    #[test]
    fn empty_password_is_accepted() {
        let salt = [1u8; SALT_LEN];
        let key = derive_key(b"", &salt);
        assert_ne!(key, [0u8; KEY_LEN]);
    }

    #[test]
    fn salts_are_random() {
        let a = generate_salt().unwrap();
        let b = generate_salt().unwrap();
        assert_ne!(a, b);
    }
}
