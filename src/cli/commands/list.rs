//! `walletvault list` — display stored account identifiers in a table.

use crate::cli::output;
use crate::cli::{unlock_for_read, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let Some(store) = unlock_for_read(cli)? else {
        return Ok(());
    };

    output::info(&format!(
        "{} — {} account(s)",
        store.path().display(),
        store.record_count()
    ));
    output::print_accounts_table(store.vault());

    Ok(())
}
