//! Account generation and key-to-address derivation.
//!
//! The vault never needs this: it stores whatever fields it is given.  The
//! CLI uses it to create new accounts and to work out an account's address
//! when only a private key or recovery phrase is supplied.
//!
//! The secp256k1 backend lives behind the `keygen` feature flag.  Callers
//! ask [`key_generator`] for a [`KeyGenerator`] and get `None` when the
//! capability was not compiled in.
//!
//! Phrases are 12-word BIP-39 English mnemonics (128 bits of entropy plus a
//! 4-bit SHA-256 checksum).  Keys follow the BIP-44 Ethereum path by default.

use sha2::{Digest, Sha256};

use crate::errors::{Result, WalletVaultError};

/// Default BIP-44 derivation path for the first Ethereum account.
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

/// Entropy behind a generated phrase, in bytes.
pub const ENTROPY_LEN: usize = 16;

/// Words in a generated phrase.
pub const WORD_COUNT: usize = 12;

/// Bits per mnemonic word index.
const BITS_PER_WORD: usize = 11;

/// Key material for one account, ready to be stored as a record.
pub struct Account {
    /// Checksummed `0x` address; used as the record identifier.
    pub address: String,
    /// `0x`-prefixed hex private key.
    pub private_key: String,
    pub mnemonic: Option<String>,
    pub derivation_path: Option<String>,
}

/// Something that can create accounts and derive addresses from keys.
pub trait KeyGenerator {
    /// Create a fresh account from OS entropy.
    fn generate(&self, derivation_path: &str) -> Result<Account>;

    /// Derive the account behind a recovery phrase.
    fn from_mnemonic(&self, phrase: &str, derivation_path: &str) -> Result<Account>;

    /// Derive the address of a hex private key.  The key is kept as given.
    fn from_private_key(&self, private_key: &str) -> Result<Account>;
}

/// Build the key generator, if this build has one.
#[cfg(feature = "keygen")]
pub fn key_generator() -> Option<Box<dyn KeyGenerator>> {
    Some(Box::new(local::LocalKeyGenerator))
}

/// Build the key generator, if this build has one.
#[cfg(not(feature = "keygen"))]
pub fn key_generator() -> Option<Box<dyn KeyGenerator>> {
    None
}

/// Work out the account for an import where no identifier was given.
///
/// A private key decides the address; a phrase supplied next to it is
/// stored unchanged.  A phrase alone is expanded to its key at
/// `derivation_path` (or the default path).
pub fn import_account(
    generator: &dyn KeyGenerator,
    private_key: Option<String>,
    mnemonic: Option<String>,
    derivation_path: Option<String>,
) -> Result<Account> {
    match (private_key, mnemonic) {
        (Some(key), mnemonic) => {
            let mut account = generator.from_private_key(&key)?;
            account.mnemonic = mnemonic;
            account.derivation_path = derivation_path;
            Ok(account)
        }
        (None, Some(phrase)) => generator.from_mnemonic(
            &phrase,
            derivation_path.as_deref().unwrap_or(DEFAULT_DERIVATION_PATH),
        ),
        (None, None) => Err(WalletVaultError::KeyGeneration(
            "a private key or recovery phrase is needed to derive the address".into(),
        )),
    }
}

/// Split entropy plus checksum into BIP-39 word indices.
///
/// 128 entropy bits are followed by the top 4 bits of `SHA-256(entropy)`;
/// the resulting 132 bits are read as twelve 11-bit indices.
pub fn entropy_to_indices(entropy: &[u8; ENTROPY_LEN]) -> [u16; WORD_COUNT] {
    let checksum = Sha256::digest(entropy)[0];
    let checksum_bits = WORD_COUNT * BITS_PER_WORD - ENTROPY_LEN * 8;

    let mut bits = Vec::with_capacity(WORD_COUNT * BITS_PER_WORD);
    for byte in entropy {
        for j in (0..8).rev() {
            bits.push((byte >> j) & 1);
        }
    }
    for j in (8 - checksum_bits..8).rev() {
        bits.push((checksum >> j) & 1);
    }

    let mut indices = [0u16; WORD_COUNT];
    for (i, index) in indices.iter_mut().enumerate() {
        for bit in &bits[i * BITS_PER_WORD..(i + 1) * BITS_PER_WORD] {
            *index = (*index << 1) | u16::from(*bit);
        }
    }
    indices
}

#[cfg(feature = "keygen")]
mod local {
    use alloy::signers::local::coins_bip39::{English, Wordlist};
    use alloy::signers::local::{MnemonicBuilder, PrivateKeySigner};
    use rand::rngs::OsRng;
    use rand::TryRngCore;
    use zeroize::Zeroize;

    use super::{entropy_to_indices, Account, KeyGenerator, ENTROPY_LEN};
    use crate::errors::{Result, WalletVaultError};

    /// In-process secp256k1 keys via `alloy`'s local signer.
    pub struct LocalKeyGenerator;

    impl KeyGenerator for LocalKeyGenerator {
        fn generate(&self, derivation_path: &str) -> Result<Account> {
            let mut entropy = [0u8; ENTROPY_LEN];
            OsRng.try_fill_bytes(&mut entropy).map_err(|e| {
                WalletVaultError::KeyGeneration(format!("system RNG unavailable: {e}"))
            })?;
            let phrase = phrase_from_entropy(&entropy);
            entropy.zeroize();

            let mut phrase = phrase?;
            let account = self.from_mnemonic(&phrase, derivation_path);
            phrase.zeroize();
            account
        }

        fn from_mnemonic(&self, phrase: &str, derivation_path: &str) -> Result<Account> {
            let phrase = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
            let signer = MnemonicBuilder::<English>::default()
                .phrase(phrase.as_str())
                .derivation_path(derivation_path)
                .map_err(key_error)?
                .build()
                .map_err(key_error)?;

            Ok(Account {
                address: signer.address().to_string(),
                private_key: hex_key(&signer),
                mnemonic: Some(phrase),
                derivation_path: Some(derivation_path.to_string()),
            })
        }

        fn from_private_key(&self, private_key: &str) -> Result<Account> {
            let private_key = private_key.trim();
            let signer: PrivateKeySigner = private_key.parse().map_err(key_error)?;

            Ok(Account {
                address: signer.address().to_string(),
                private_key: private_key.to_string(),
                mnemonic: None,
                derivation_path: None,
            })
        }
    }

    /// Twelve English words for `entropy`.
    pub(super) fn phrase_from_entropy(entropy: &[u8; ENTROPY_LEN]) -> Result<String> {
        let words = entropy_to_indices(entropy)
            .iter()
            .map(|&index| {
                English::get(usize::from(index))
                    .map(|word| word.to_string())
                    .map_err(key_error)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(words.join(" "))
    }

    fn hex_key(signer: &PrivateKeySigner) -> String {
        format!("0x{}", hex::encode(signer.to_bytes()))
    }

    fn key_error(e: impl std::fmt::Display) -> WalletVaultError {
        WalletVaultError::KeyGeneration(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic stand-in: the address is derived from the input text.
    struct FakeGenerator;

    impl KeyGenerator for FakeGenerator {
        fn generate(&self, derivation_path: &str) -> Result<Account> {
            self.from_mnemonic("fresh words", derivation_path)
        }

        fn from_mnemonic(&self, phrase: &str, derivation_path: &str) -> Result<Account> {
            Ok(Account {
                address: format!("0xM{}", phrase.len()),
                private_key: "0xderived".into(),
                mnemonic: Some(phrase.to_string()),
                derivation_path: Some(derivation_path.to_string()),
            })
        }

        fn from_private_key(&self, private_key: &str) -> Result<Account> {
            Ok(Account {
                address: format!("0xK{}", private_key.len()),
                private_key: private_key.to_string(),
                mnemonic: None,
                derivation_path: None,
            })
        }
    }

    #[test]
    fn zero_entropy_indices() {
        // "abandon" x 11 + "about"
        let indices = entropy_to_indices(&[0u8; ENTROPY_LEN]);
        assert_eq!(indices[..11], [0u16; 11]);
        assert_eq!(indices[11], 3);
    }

    #[test]
    fn all_ones_entropy_indices() {
        // "zoo" x 11 + "wrong"
        let indices = entropy_to_indices(&[0xffu8; ENTROPY_LEN]);
        assert_eq!(indices[..11], [2047u16; 11]);
        assert_eq!(indices[11], 2037);
    }

    #[test]
    fn import_by_key_keeps_given_phrase() {
        let account = import_account(
            &FakeGenerator,
            Some("0xabc".into()),
            Some("a b c".into()),
            None,
        )
        .unwrap();
        assert_eq!(account.address, "0xK5");
        assert_eq!(account.private_key, "0xabc");
        assert_eq!(account.mnemonic.as_deref(), Some("a b c"));
    }

    #[test]
    fn import_by_phrase_uses_default_path() {
        let account = import_account(&FakeGenerator, None, Some("a b c".into()), None).unwrap();
        assert_eq!(account.address, "0xM5");
        assert_eq!(account.private_key, "0xderived");
        assert_eq!(
            account.derivation_path.as_deref(),
            Some(DEFAULT_DERIVATION_PATH)
        );
    }

    #[test]
    fn import_needs_some_key_material() {
        assert!(matches!(
            import_account(&FakeGenerator, None, None, None),
            Err(WalletVaultError::KeyGeneration(_))
        ));
    }

    #[cfg(not(feature = "keygen"))]
    #[test]
    fn no_generator_without_feature() {
        assert!(key_generator().is_none());
    }

    #[cfg(feature = "keygen")]
    mod local_tests {
        use super::super::local::phrase_from_entropy;
        use super::super::*;

        const TEST_PHRASE: &str = "test test test test test test test test test test test junk";
        const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
        const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

        #[test]
        fn phrase_vectors() {
            assert_eq!(
                phrase_from_entropy(&[0u8; ENTROPY_LEN]).unwrap(),
                "abandon abandon abandon abandon abandon abandon \
                 abandon abandon abandon abandon abandon about"
            );
            assert_eq!(
                phrase_from_entropy(&[0x7fu8; ENTROPY_LEN]).unwrap(),
                "legal winner thank year wave sausage worth useful legal winner thank yellow"
            );
            assert_eq!(
                phrase_from_entropy(&[0x80u8; ENTROPY_LEN]).unwrap(),
                "letter advice cage absurd amount doctor acoustic avoid letter advice cage above"
            );
        }

        #[test]
        fn mnemonic_derives_known_account() {
            let generator = key_generator().unwrap();
            let account = generator
                .from_mnemonic(TEST_PHRASE, DEFAULT_DERIVATION_PATH)
                .unwrap();
            assert_eq!(account.address, TEST_ADDRESS);
            assert_eq!(account.private_key, TEST_KEY);
        }

        #[test]
        fn private_key_derives_known_address() {
            let account = key_generator().unwrap().from_private_key(TEST_KEY).unwrap();
            assert_eq!(account.address, TEST_ADDRESS);
            assert_eq!(account.private_key, TEST_KEY);
            assert!(account.mnemonic.is_none());
        }

        #[test]
        fn generated_account_is_reproducible_from_its_phrase() {
            let generator = key_generator().unwrap();
            let account = generator.generate(DEFAULT_DERIVATION_PATH).unwrap();
            let phrase = account.mnemonic.clone().unwrap();
            assert_eq!(phrase.split_whitespace().count(), WORD_COUNT);

            let again = generator
                .from_mnemonic(&phrase, DEFAULT_DERIVATION_PATH)
                .unwrap();
            assert_eq!(again.address, account.address);
            assert_eq!(again.private_key, account.private_key);
        }

        #[test]
        fn bad_checksum_is_rejected() {
            let phrase = ["abandon"; WORD_COUNT].join(" ");
            assert!(key_generator()
                .unwrap()
                .from_mnemonic(&phrase, DEFAULT_DERIVATION_PATH)
                .is_err());
        }

        #[test]
        fn malformed_private_key_is_rejected() {
            assert!(key_generator().unwrap().from_private_key("0xnothex").is_err());
        }
    }
}
