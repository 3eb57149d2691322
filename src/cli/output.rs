//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::record::{Record, CHAIN, DERIVATION_PATH, MNEMONIC, PRIVATE_KEY};
use crate::vault::Vault;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print the plaintext warning shown before any unencrypted export.
pub fn plaintext_warning(what: &str) {
    warning(&format!(
        "{what} is written UNENCRYPTED. Anyone who can read it can spend from these accounts."
    ));
}

/// Print a table of accounts (No., Identifier, Chain, Stored fields).
///
/// Never prints field values.
pub fn print_accounts_table(vault: &Vault) {
    if vault.is_empty() {
        info("No accounts stored.");
        tip("Run `walletvault add <ID>` to store your first account.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Identifier", "Chain", "Stored"]);

    for (i, (id, record)) in vault.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            id.clone(),
            record.get(CHAIN).unwrap_or("-").to_string(),
            stored_summary(record),
        ]);
    }

    println!("{table}");
}

/// Print every field of a record, masking key material unless `reveal`.
pub fn print_record(id: &str, record: &Record, reveal: bool) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);

    for (key, value) in record.fields() {
        let shown = match value {
            None => style("null").dim().to_string(),
            Some(v) if Record::is_secret_field(key) && !reveal => mask(v),
            Some(v) => v.to_string(),
        };
        table.add_row(vec![key.to_string(), shown]);
    }

    println!("{}", style(id).bold());
    println!("{table}");
}

/// Short description of which well-known fields hold a value.
fn stored_summary(record: &Record) -> String {
    let labels = [
        (PRIVATE_KEY, "key"),
        (MNEMONIC, "mnemonic"),
        (DERIVATION_PATH, "path"),
    ];
    let present: Vec<&str> = labels
        .iter()
        .filter(|(field, _)| record.get(field).is_some())
        .map(|(_, label)| *label)
        .collect();
    if present.is_empty() {
        "-".to_string()
    } else {
        present.join(", ")
    }
}

/// Replace a secret with a fixed-width placeholder.
fn mask(value: &str) -> String {
    let words = value.split_whitespace().count();
    if words > 1 {
        format!("•••••• ({words} words)")
    } else {
        "••••••••".to_string()
    }
}
