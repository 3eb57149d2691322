//! `walletvault delete` — remove a record from the vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{unlock_for_read, Cli};
use crate::errors::{Result, WalletVaultError};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, id: &str, force: bool) -> Result<()> {
    // Deleting from a vault that was never saved has nothing to remove.
    let Some(mut store) = unlock_for_read(cli)? else {
        return Err(WalletVaultError::RecordNotFound(id.to_string()));
    };

    // Fail before asking for confirmation if the record is not there.
    store.get(id)?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete account '{id}'? Its keys cannot be recovered."))
            .default(false)
            .interact()
            .map_err(|e| WalletVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    store.remove(id)?;
    store.save()?;

    crate::audit::log_audit(store.path(), "delete", Some(id), None);
    output::success(&format!(
        "Deleted account '{id}' ({} remaining)",
        store.record_count()
    ));

    Ok(())
}
