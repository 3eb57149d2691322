//! Vault module — encrypted record storage.
//!
//! This module provides:
//! - `Record` and `Vault` types (`record`)
//! - The encrypted file codec (`format`)
//! - `VaultStore` for opening, mutating, and atomically saving a vault (`store`)
//! - Plaintext backup, restore, and single-record export (`backup`)

pub mod backup;
pub mod format;
pub mod record;
pub mod store;

// Re-export the most commonly used items.
pub use backup::{export_plaintext, export_record, read_plaintext};
pub use format::{decode, encode, MIN_FILE_LEN};
pub use record::{MergeSummary, Record, Vault};
pub use store::VaultStore;
