//! `walletvault shell` — interactive menu session.
//!
//! Unlocks the vault once, applies every change in memory, and writes the
//! file when the user picks "Save" or "Save and exit".  Errors inside an
//! action are reported and the menu continues; nothing reaches the disk
//! until an explicit save.  If the process is interrupted, unsaved changes
//! are lost and the file keeps its last saved state.

use std::path::{Path, PathBuf};

use dialoguer::{Confirm, Input, Password, Select};

use crate::cli::commands::add::build_record;
use crate::cli::output;
use crate::cli::{unlock_for_write, validate_identifier, Cli};
use crate::config::Settings;
use crate::errors::{Result, WalletVaultError};
use crate::keygen::{import_account, key_generator, DEFAULT_DERIVATION_PATH};
use crate::rpc::{balance_client, format_ether};
use crate::vault::backup::{default_record_filename, export_record};
use crate::vault::{export_plaintext, read_plaintext, VaultStore};

/// Menu entries, in display order.
const MENU: &[&str] = &[
    "Create account",
    "Add account",
    "List accounts",
    "Show account",
    "Export account",
    "Delete account",
    "Check balance",
    "Backup all (plaintext)",
    "Restore from backup",
    "Save",
    "Save and exit",
    "Quit without saving",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Create,
    Add,
    List,
    Show,
    Export,
    Delete,
    Balance,
    Backup,
    Restore,
    Save,
    SaveAndExit,
    Quit,
}

impl Action {
    fn from_index(index: usize) -> Option<Self> {
        Some(match index {
            0 => Self::Create,
            1 => Self::Add,
            2 => Self::List,
            3 => Self::Show,
            4 => Self::Export,
            5 => Self::Delete,
            6 => Self::Balance,
            7 => Self::Backup,
            8 => Self::Restore,
            9 => Self::Save,
            10 => Self::SaveAndExit,
            11 => Self::Quit,
            _ => return None,
        })
    }
}

/// What the menu loop does after an action.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Execute the `shell` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    let mut store = unlock_for_write(cli)?;

    output::info(&format!(
        "Unlocked {} — {} account(s)",
        store.path().display(),
        store.record_count()
    ));

    loop {
        let index = Select::new()
            .with_prompt("Menu")
            .items(MENU)
            .default(0)
            .interact()
            .map_err(prompt_error)?;

        let Some(action) = Action::from_index(index) else {
            continue;
        };

        // A failed action (including a failed save) keeps the session and
        // its unsaved records alive.
        match step(&mut store, action, &settings, &cwd) {
            Ok(Flow::Exit) => return Ok(()),
            Ok(Flow::Continue) => {}
            Err(e) => output::error(&e.to_string()),
        }
    }
}

fn step(store: &mut VaultStore, action: Action, settings: &Settings, cwd: &Path) -> Result<Flow> {
    match action {
        Action::Create => create(store)?,
        Action::Add => add(store)?,
        Action::List => output::print_accounts_table(store.vault()),
        Action::Show => show(store)?,
        Action::Export => export(store)?,
        Action::Delete => delete(store)?,
        Action::Balance => balance(store, settings)?,
        Action::Backup => backup(store, settings, cwd)?,
        Action::Restore => restore(store)?,
        Action::Save => save(store)?,
        Action::SaveAndExit => {
            save(store)?;
            output::success("Goodbye.");
            return Ok(Flow::Exit);
        }
        Action::Quit => {
            if confirm_discard(store)? {
                output::info("Exited without saving.");
                return Ok(Flow::Exit);
            }
        }
    }
    Ok(Flow::Continue)
}

fn create(store: &mut VaultStore) -> Result<()> {
    let generator = key_generator().ok_or_else(|| {
        WalletVaultError::FeatureUnavailable(
            "Account generation (rebuild with `--features keygen`)".into(),
        )
    })?;

    let path = ask_optional("Derivation path (empty for default)")?;
    let chain = ask_optional("Chain (empty for none)")?;
    let account = generator.generate(path.as_deref().unwrap_or(DEFAULT_DERIVATION_PATH))?;
    let id = account.address;

    let record = build_record(
        Some(account.private_key),
        account.mnemonic,
        account.derivation_path,
        chain,
        Vec::new(),
    );
    store.insert_new(&id, record)?;

    crate::audit::log_audit(store.path(), "create", Some(&id), None);
    output::success(&format!("Created account {id} (unsaved)"));
    Ok(())
}

fn add(store: &mut VaultStore) -> Result<()> {
    let id = ask_optional("Account identifier (empty to derive from the key)")?;
    if let Some(id) = &id {
        validate_identifier(id)?;
        confirm_overwrite(store, id)?;
    }

    let private_key = ask_secret("Private key (empty for none)")?;
    let mnemonic = ask_secret("Recovery phrase (empty for none)")?;
    let derivation_path = ask_optional("Derivation path (empty for none)")?;
    let chain = ask_optional("Chain (empty for none)")?;

    let (id, record) = match id {
        Some(id) => {
            let record = build_record(private_key, mnemonic, derivation_path, chain, Vec::new());
            (id, record)
        }
        None => {
            let generator = key_generator().ok_or_else(|| {
                WalletVaultError::FeatureUnavailable(
                    "Deriving the identifier from a key (rebuild with `--features keygen`)".into(),
                )
            })?;
            let account =
                import_account(generator.as_ref(), private_key, mnemonic, derivation_path)?;
            confirm_overwrite(store, &account.address)?;
            let record = build_record(
                Some(account.private_key),
                account.mnemonic,
                account.derivation_path,
                chain,
                Vec::new(),
            );
            (account.address, record)
        }
    };

    let replaced = store.upsert(&id, record);
    let detail = if replaced { "replaced" } else { "added" };

    crate::audit::log_audit(store.path(), "add", Some(&id), Some(detail));
    output::success(&format!("Account '{id}' {detail} (unsaved)"));
    Ok(())
}

fn confirm_overwrite(store: &VaultStore, id: &str) -> Result<()> {
    if store.vault().contains(id) && !confirm(&format!("'{id}' exists. Overwrite?"))? {
        return Err(WalletVaultError::UserCancelled);
    }
    Ok(())
}

fn show(store: &VaultStore) -> Result<()> {
    let id = ask_identifier("Account identifier")?;
    let record = store.get(&id)?;
    let reveal = confirm("Reveal private key and mnemonic?")?;
    output::print_record(&id, record, reveal);
    if reveal {
        crate::audit::log_audit(store.path(), "show", Some(&id), Some("revealed"));
    }
    Ok(())
}

fn export(store: &VaultStore) -> Result<()> {
    let id = ask_identifier("Account identifier")?;
    let record = store.get(&id)?;

    let dest: String = Input::new()
        .with_prompt("Output file")
        .default(default_record_filename(&id))
        .interact_text()
        .map_err(prompt_error)?;
    let dest = PathBuf::from(dest);

    output::plaintext_warning("The exported record");
    export_record(&dest, record, store.path())?;

    crate::audit::log_audit(
        store.path(),
        "export",
        Some(&id),
        Some(&dest.display().to_string()),
    );
    output::success(&format!("Exported '{id}' to {}", dest.display()));
    Ok(())
}

fn delete(store: &mut VaultStore) -> Result<()> {
    let id = ask_identifier("Account identifier")?;
    store.get(&id)?;
    if !confirm(&format!("Delete account '{id}'?"))? {
        return Err(WalletVaultError::UserCancelled);
    }

    store.remove(&id)?;
    crate::audit::log_audit(store.path(), "delete", Some(&id), None);
    output::success(&format!("Deleted '{id}' (unsaved)"));
    Ok(())
}

fn balance(store: &VaultStore, settings: &Settings) -> Result<()> {
    let client = balance_client(&settings.rpc).ok_or_else(|| {
        WalletVaultError::FeatureUnavailable(
            "Balance lookup (rebuild with `--features balance-check`)".into(),
        )
    })?;

    let id = ask_identifier("Account identifier")?;
    store.get(&id)?;

    let wei = client.balance_wei(&id)?;
    output::info(&format!("{id} balance: {} ETH", format_ether(wei)));
    Ok(())
}

fn backup(store: &VaultStore, settings: &Settings, cwd: &Path) -> Result<()> {
    output::plaintext_warning("The backup");
    let dest: String = Input::new()
        .with_prompt("Backup file")
        .default(settings.backup_path(cwd).display().to_string())
        .interact_text()
        .map_err(prompt_error)?;
    let dest = PathBuf::from(dest);

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
    Ok(())
}

fn restore(store: &mut VaultStore) -> Result<()> {
    let src: String = Input::new()
        .with_prompt("Backup file path")
        .interact_text()
        .map_err(prompt_error)?;
    let src = PathBuf::from(src.trim());

    let incoming = read_plaintext(&src)?;
    for id in incoming.ids() {
        validate_identifier(id)?;
    }

    let summary = store.merge(incoming);
    crate::audit::log_audit(
        store.path(),
        "restore",
        None,
        Some(&format!(
            "{} added, {} replaced from {}",
            summary.added,
            summary.replaced,
            src.display()
        )),
    );
    output::success(&format!(
        "Restored: {} added, {} replaced (unsaved)",
        summary.added, summary.replaced
    ));
    Ok(())
}

fn save(store: &mut VaultStore) -> Result<()> {
    // A vault that was never written and is still empty stays absent.
    if !store.is_dirty() && (!store.is_new() || store.vault().is_empty()) {
        output::info("No changes to save.");
        return Ok(());
    }
    store.save()?;
    output::success(&format!(
        "Saved {} account(s) to {}",
        store.record_count(),
        store.path().display()
    ));
    Ok(())
}

fn confirm_discard(store: &VaultStore) -> Result<bool> {
    if !store.is_dirty() {
        return Ok(true);
    }
    confirm("Discard unsaved changes?")
}

// ---------------------------------------------------------------------------
// Prompt helpers
// ---------------------------------------------------------------------------

fn ask_identifier(prompt: &str) -> Result<String> {
    let id: String = Input::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(prompt_error)?;
    let id = id.trim().to_string();
    validate_identifier(&id)?;
    Ok(id)
}

fn ask_optional(prompt: &str) -> Result<Option<String>> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_error)?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

fn ask_secret(prompt: &str) -> Result<Option<String>> {
    let value = Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(prompt_error)?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

fn confirm(prompt: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(prompt_error)
}

fn prompt_error(e: dialoguer::Error) -> WalletVaultError {
    WalletVaultError::CommandFailed(format!("prompt: {e}"))
}
