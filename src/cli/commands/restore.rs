//! `walletvault restore` — merge records from a plaintext backup.
//!
//! Merging is key-by-key: a backup record with the same identifier as an
//! existing one replaces it entirely.

use std::path::Path;

use crate::cli::output;
use crate::cli::{unlock_for_write, validate_identifier, Cli};
use crate::errors::Result;
use crate::vault::read_plaintext;

/// Execute the `restore` command.
pub fn execute(cli: &Cli, file: &str) -> Result<()> {
    let source = Path::new(file);

    // Parse the backup before asking for a password so a bad file fails fast.
    let incoming = read_plaintext(source)?;
    for id in incoming.ids() {
        validate_identifier(id)?;
    }

    if incoming.is_empty() {
        output::warning("No records found in the backup file.");
        return Ok(());
    }

    let mut store = unlock_for_write(cli)?;
    let summary = store.merge(incoming);
    store.save()?;

    crate::audit::log_audit(
        store.path(),
        "restore",
        None,
        Some(&format!(
            "{} added, {} replaced from {}",
            summary.added,
            summary.replaced,
            source.display()
        )),
    );

    output::success(&format!(
        "Restored from {}: {} added, {} replaced ({} total)",
        source.display(),
        summary.added,
        summary.replaced,
        store.record_count()
    ));

    Ok(())
}
