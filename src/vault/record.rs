//! Record and Vault types.
//!
//! A `Record` is an opaque bag of string-or-null fields.  The vault engine
//! never looks inside: it only needs records to survive a JSON round-trip
//! unchanged.  A `Vault` maps account identifiers to records.
//!
//! Both types serialize transparently, so the plaintext of a vault file is
//! just a JSON object:
//!
//! ```text
//! { "0xABC": { "private_key": "0x1", "mnemonic": null, ... }, ... }
//! ```

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Well-known field: hex-encoded private key.
pub const PRIVATE_KEY: &str = "private_key";
/// Well-known field: BIP-39 recovery phrase.
pub const MNEMONIC: &str = "mnemonic";
/// Well-known field: HD derivation path (e.g. `m/44'/60'/0'/0/0`).
pub const DERIVATION_PATH: &str = "derivation_path";
/// Well-known field: chain tag (e.g. `eth`).
pub const CHAIN: &str = "chain";

/// Fields that hold key material and should not be echoed by default.
const SECRET_FIELDS: &[&str] = &[PRIVATE_KEY, MNEMONIC];

/// A single account entry: field name -> value (or null).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Option<String>>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value.  `None` stores a JSON null.
    pub fn set(&mut self, key: impl Into<String>, value: Option<String>) {
        self.fields.insert(key.into(), value);
    }

    /// Builder-style variant of [`Record::set`].
    pub fn with(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        self.set(key, value);
        self
    }

    /// The value of a field, if present and not null.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_deref())
    }

    /// Whether the field exists at all (null counts as present).
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Iterate over all fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns `true` for fields holding key material.
    pub fn is_secret_field(key: &str) -> bool {
        SECRET_FIELDS.contains(&key)
    }
}

impl Drop for Record {
    fn drop(&mut self) {
        for value in self.fields.values_mut() {
            value.zeroize();
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.set(k, v);
        }
        record
    }
}

/// Counts returned by [`Vault::merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Identifiers that were not in the vault before.
    pub added: usize,
    /// Identifiers whose record was overwritten by the incoming one.
    pub replaced: usize,
}

/// The decrypted, in-memory collection of records keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vault {
    records: BTreeMap<String, Record>,
}

impl Vault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    /// Insert or replace a record.  Returns the previous record, if any.
    pub fn insert(&mut self, id: impl Into<String>, record: Record) -> Option<Record> {
        self.records.insert(id.into(), record)
    }

    /// Remove a record.  Returns it if it existed.
    pub fn remove(&mut self, id: &str) -> Option<Record> {
        self.records.remove(id)
    }

    /// Identifiers in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Record> {
        self.records.iter()
    }

    /// Key-by-key union where `other` wins on identifier collisions.
    ///
    /// This is plain map merging, unrelated to encryption: whatever
    /// `other` holds for an identifier replaces the current record wholesale.
    pub fn merge(&mut self, other: Vault) -> MergeSummary {
        let mut summary = MergeSummary::default();
        for (id, record) in other.records {
            match self.records.insert(id, record) {
                Some(_) => summary.replaced += 1,
                None => summary.added += 1,
            }
        }
        summary
    }
}

impl<'a> IntoIterator for &'a Vault {
    type Item = (&'a String, &'a Record);
    type IntoIter = btree_map::Iter<'a, String, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Record)> for Vault {
    fn from_iter<I: IntoIterator<Item = (K, Record)>>(iter: I) -> Self {
        let mut vault = Vault::new();
        for (id, record) in iter {
            vault.insert(id, record);
        }
        vault
    }
}
