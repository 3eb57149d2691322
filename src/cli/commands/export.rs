//! `walletvault export` — write one record to a plaintext JSON file.

use std::path::PathBuf;

use crate::cli::output;
use crate::cli::{unlock_for_read, Cli};
use crate::errors::{Result, WalletVaultError};
use crate::vault::backup::{default_record_filename, export_record};

/// Execute the `export` command.
pub fn execute(cli: &Cli, id: &str, output_path: Option<&str>) -> Result<()> {
    let Some(store) = unlock_for_read(cli)? else {
        return Err(WalletVaultError::RecordNotFound(id.to_string()));
    };

    let record = store.get(id)?;
    let dest = match output_path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?.join(default_record_filename(id)),
    };

    output::plaintext_warning("The exported record");
    export_record(&dest, record, store.path())?;

    crate::audit::log_audit(
        store.path(),
        "export",
        Some(id),
        Some(&dest.display().to_string()),
    );
    output::success(&format!("Exported '{id}' to {}", dest.display()));

    Ok(())
}
