//! `walletvault balance` — look up an account balance over JSON-RPC.

use crate::cli::output;
use crate::cli::{unlock_for_read, Cli};
use crate::config::Settings;
use crate::errors::{Result, WalletVaultError};
use crate::rpc::{balance_client, format_ether};

/// Execute the `balance` command.
pub fn execute(cli: &Cli, id: &str) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;

    // Check the capability before prompting for anything.
    let client = balance_client(&settings.rpc).ok_or_else(|| {
        WalletVaultError::FeatureUnavailable(
            "Balance lookup (rebuild with `--features balance-check`)".into(),
        )
    })?;

    let Some(store) = unlock_for_read(cli)? else {
        return Err(WalletVaultError::RecordNotFound(id.to_string()));
    };
    store.get(id)?;

    let wei = client.balance_wei(id)?;
    output::info(&format!("{id} balance: {} ETH", format_ether(wei)));

    Ok(())
}
