//! `walletvault show` — print a single record.

use crate::cli::output;
use crate::cli::{unlock_for_read, Cli};
use crate::errors::{Result, WalletVaultError};

/// Execute the `show` command.
pub fn execute(cli: &Cli, id: &str, reveal: bool) -> Result<()> {
    let Some(store) = unlock_for_read(cli)? else {
        return Err(WalletVaultError::RecordNotFound(id.to_string()));
    };

    let record = store.get(id)?;
    output::print_record(id, record, reveal);

    if reveal {
        crate::audit::log_audit(store.path(), "show", Some(id), Some("revealed"));
    } else {
        output::tip("Secret fields are masked. Pass --reveal to print them.");
    }

    Ok(())
}
