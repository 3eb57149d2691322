//! Integration tests for the encrypted vault file codec.

use walletvault::crypto::{decrypt, derive_key, NONCE_LEN, SALT_LEN, TAG_LEN};
use walletvault::errors::WalletVaultError;
use walletvault::vault::{decode, encode, Record, Vault, MIN_FILE_LEN};

fn sample_vault() -> Vault {
    let mut vault = Vault::new();
    vault.insert(
        "0xABC",
        Record::new()
            .with("private_key", Some("0x1".into()))
            .with("mnemonic", Some("a b c".into()))
            .with("derivation_path", Some("m/44'/60'/0'/0/0".into()))
            .with("chain", Some("eth".into())),
    );
    vault.insert(
        "0xDEF",
        Record::new()
            .with("private_key", None)
            .with("mnemonic", Some("x y z".into())),
    );
    vault
}

#[test]
fn roundtrip_preserves_every_field() {
    let vault = sample_vault();
    let bytes = encode(b"hunter2", &vault).unwrap();
    let decoded = decode(b"hunter2", &bytes).unwrap();
    assert_eq!(decoded, vault);

    let record = decoded.get("0xDEF").unwrap();
    assert!(record.contains("private_key"));
    assert_eq!(record.get("private_key"), None);
}

#[test]
fn roundtrip_empty_vault() {
    let bytes = encode(b"pw", &Vault::new()).unwrap();
    // "{}" is 2 bytes of plaintext.
    assert_eq!(bytes.len(), SALT_LEN + NONCE_LEN + 2 + TAG_LEN);
    assert!(decode(b"pw", &bytes).unwrap().is_empty());
}

#[test]
fn wrong_password_is_authentication_failure() {
    let bytes = encode(b"hunter2", &sample_vault()).unwrap();
    let err = decode(b"wrong", &bytes).unwrap_err();
    assert!(matches!(err, WalletVaultError::AuthenticationFailed));
    assert!(err.is_unlock_failure());
}

#[test]
fn any_flipped_bit_after_the_salt_is_detected() {
    let bytes = encode(b"pw", &sample_vault()).unwrap();
    let key = derive_key(b"pw", &bytes[..SALT_LEN]);
    assert!(decrypt(&key, &bytes[SALT_LEN..]).is_ok());

    // Every bit of nonce, ciphertext, and tag.
    for index in SALT_LEN..bytes.len() {
        for bit in 0..8 {
            let mut tampered = bytes.clone();
            tampered[index] ^= 1 << bit;
            assert!(
                matches!(
                    decrypt(&key, &tampered[SALT_LEN..]),
                    Err(WalletVaultError::AuthenticationFailed)
                ),
                "flip of bit {bit} in byte {index} was not detected"
            );
        }
    }
}

#[test]
fn tampered_file_fails_to_decode() {
    let bytes = encode(b"pw", &sample_vault()).unwrap();

    for index in [SALT_LEN, SALT_LEN + NONCE_LEN, bytes.len() - 1] {
        let mut tampered = bytes.clone();
        tampered[index] ^= 0x01;
        assert!(matches!(
            decode(b"pw", &tampered),
            Err(WalletVaultError::AuthenticationFailed)
        ));
    }
}

#[test]
fn flipped_salt_bit_derives_a_different_key() {
    let mut bytes = encode(b"pw", &sample_vault()).unwrap();
    bytes[0] ^= 0x80;
    assert!(matches!(
        decode(b"pw", &bytes),
        Err(WalletVaultError::AuthenticationFailed)
    ));
}

#[test]
fn encoding_twice_gives_different_bytes() {
    let vault = sample_vault();
    let a = encode(b"pw", &vault).unwrap();
    let b = encode(b"pw", &vault).unwrap();
    assert_ne!(a[..SALT_LEN], b[..SALT_LEN]);
    assert_ne!(a[SALT_LEN..MIN_FILE_LEN], b[SALT_LEN..MIN_FILE_LEN]);
    assert_ne!(a, b);
}

#[test]
fn short_input_is_malformed() {
    for len in [0, 1, SALT_LEN, MIN_FILE_LEN - 1] {
        let err = decode(b"pw", &vec![0u8; len]).unwrap_err();
        assert!(
            matches!(err, WalletVaultError::MalformedFile(_)),
            "{len} bytes: {err}"
        );
    }
}

#[test]
fn header_only_input_fails_authentication() {
    let err = decode(b"pw", &[0u8; MIN_FILE_LEN]).unwrap_err();
    assert!(matches!(err, WalletVaultError::AuthenticationFailed));
}
