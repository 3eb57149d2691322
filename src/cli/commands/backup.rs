//! `walletvault backup` — write every record to a plaintext JSON file.
//!
//! The backup is NOT encrypted.  It exists so records can be moved
//! between vaults with `restore`; treat the file like the keys themselves.

use std::path::PathBuf;

use crate::cli::output;
use crate::cli::{unlock_for_read, Cli};
use crate::config::Settings;
use crate::errors::Result;
use crate::vault::export_plaintext;

/// Execute the `backup` command.
pub fn execute(cli: &Cli, output_path: Option<&str>) -> Result<()> {
    let Some(store) = unlock_for_read(cli)? else {
        return Ok(());
    };

    let dest = match output_path {
        Some(p) => PathBuf::from(p),
        None => {
            let cwd = std::env::current_dir()?;
            Settings::load(&cwd)?.backup_path(&cwd)
        }
    };

    output::plaintext_warning("The backup");
    export_plaintext(&dest, store.vault(), store.path())?;

    crate::audit::log_audit(
        store.path(),
        "backup",
        None,
        Some(&format!(
            "{} records to {}",
            store.record_count(),
            dest.display()
        )),
    );
    output::success(&format!(
        "Backed up {} account(s) to {}",
        store.record_count(),
        dest.display()
    ));
    output::tip("Delete the backup file once it is stored somewhere safe.");

    Ok(())
}
