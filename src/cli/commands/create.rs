//! `walletvault create` — generate a new account and store it.
//!
//! A fresh 12-word recovery phrase is drawn from OS entropy and expanded to
//! a key at the requested derivation path.  The account address becomes
//! the record identifier.  Only the address is printed.

use crate::cli::commands::add::build_record;
use crate::cli::output;
use crate::cli::{unlock_for_write, Cli};
use crate::errors::{Result, WalletVaultError};
use crate::keygen::key_generator;

/// Execute the `create` command.
pub fn execute(cli: &Cli, derivation_path: &str, chain: Option<&str>) -> Result<()> {
    // Check the capability before prompting for anything.
    let generator = key_generator().ok_or_else(|| {
        WalletVaultError::FeatureUnavailable(
            "Account generation (rebuild with `--features keygen`)".into(),
        )
    })?;

    let mut store = unlock_for_write(cli)?;
    let account = generator.generate(derivation_path)?;
    let id = account.address;

    let record = build_record(
        Some(account.private_key),
        account.mnemonic,
        account.derivation_path,
        chain.map(str::to_string),
        Vec::new(),
    );
    store.insert_new(&id, record)?;
    store.save()?;

    crate::audit::log_audit(store.path(), "create", Some(&id), Some(derivation_path));
    output::success(&format!(
        "Created account {id} ({} total)",
        store.record_count()
    ));
    output::tip(&format!(
        "Run `walletvault show {id} --reveal` and write the recovery phrase down."
    ));

    Ok(())
}
