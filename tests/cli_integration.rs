//! Integration tests for the WalletVault CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.
//! The master password comes from `WALLETVAULT_PASSWORD` and secrets are
//! passed as flags, so no interactive prompt is ever reached.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const PASSWORD: &str = "correct horse battery";

/// Helper: get a Command pointing at the walletvault binary.
fn walletvault() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("walletvault").expect("binary should exist");
    cmd.env_remove("WALLETVAULT_FILE")
        .env_remove("WALLETVAULT_PASSWORD")
        .env_remove("WALLETVAULT_LOG");
    cmd
}

/// Helper: a command running inside `dir` with the test password set.
fn in_vault(dir: &TempDir) -> Command {
    let mut cmd = walletvault();
    cmd.current_dir(dir.path())
        .env("WALLETVAULT_PASSWORD", PASSWORD)
        .args(["--vault-file", "wallets.enc"]);
    cmd
}

fn add_account(dir: &TempDir, id: &str, key: &str) {
    in_vault(dir)
        .args(["add", id, "--private-key", key, "--mnemonic", "a b c"])
        .assert()
        .success();
}

#[test]
fn help_flag_shows_usage() {
    walletvault()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Encrypted vault for wallet keys"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("backup"))
        .stdout(predicate::str::contains("restore"))
        .stdout(predicate::str::contains("shell"));
}

#[test]
fn version_flag_shows_version() {
    walletvault()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("walletvault"));
}

#[test]
fn no_args_shows_help() {
    walletvault()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn list_without_vault_reports_empty() {
    let tmp = TempDir::new().unwrap();
    walletvault()
        .current_dir(tmp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No vault"));
    tmp.child("wallets.enc").assert(predicate::path::missing());
}

#[test]
fn add_then_list_shows_identifier() {
    let tmp = TempDir::new().unwrap();
    add_account(&tmp, "0xABC", "0x1");

    tmp.child("wallets.enc").assert(predicate::path::exists());
    in_vault(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("0xABC"))
        .stdout(predicate::str::contains("0x1").not());
}

#[test]
fn vault_file_does_not_contain_plaintext() {
    let tmp = TempDir::new().unwrap();
    add_account(&tmp, "0xABC", "0xdeadbeef");

    let bytes = std::fs::read(tmp.child("wallets.enc").path()).unwrap();
    let text = String::from_utf8_lossy(&bytes);
    assert!(!text.contains("0xABC"));
    assert!(!text.contains("deadbeef"));
}

#[test]
fn show_masks_secrets_unless_revealed() {
    let tmp = TempDir::new().unwrap();
    add_account(&tmp, "0xABC", "0xdeadbeef");

    in_vault(&tmp)
        .args(["show", "0xABC"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deadbeef").not());

    in_vault(&tmp)
        .args(["show", "0xABC", "--reveal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0xdeadbeef"));
}

#[test]
fn add_existing_without_force_fails() {
    let tmp = TempDir::new().unwrap();
    add_account(&tmp, "0xABC", "0x1");

    in_vault(&tmp)
        .args(["add", "0xABC", "--private-key", "0x2", "--mnemonic", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn wrong_password_fails_without_touching_file() {
    let tmp = TempDir::new().unwrap();
    add_account(&tmp, "0xABC", "0x1");
    let before = std::fs::read(tmp.child("wallets.enc").path()).unwrap();

    walletvault()
        .current_dir(tmp.path())
        .env("WALLETVAULT_PASSWORD", "not the password")
        .args(["--vault-file", "wallets.enc", "add", "0xDEF", "--private-key", "0x2", "--mnemonic", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Incorrect password"));

    let after = std::fs::read(tmp.child("wallets.enc").path()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn short_password_rejected_for_new_vault() {
    let tmp = TempDir::new().unwrap();
    walletvault()
        .current_dir(tmp.path())
        .env("WALLETVAULT_PASSWORD", "short")
        .args(["add", "0xABC", "--private-key", "0x1", "--mnemonic", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));
    tmp.child("wallets.enc").assert(predicate::path::missing());
}

#[test]
fn invalid_identifier_rejected() {
    let tmp = TempDir::new().unwrap();
    in_vault(&tmp)
        .args(["add", "0x A", "--private-key", "0x1", "--mnemonic", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid account identifier"));
}

#[test]
fn delete_with_force_removes_record() {
    let tmp = TempDir::new().unwrap();
    add_account(&tmp, "0xABC", "0x1");
    add_account(&tmp, "0xDEF", "0x2");

    in_vault(&tmp)
        .args(["delete", "0xABC", "--force"])
        .assert()
        .success();

    in_vault(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("0xDEF"))
        .stdout(predicate::str::contains("0xABC").not());
}

#[test]
fn backup_and_restore_roundtrip() {
    let tmp = TempDir::new().unwrap();
    add_account(&tmp, "0xABC", "0x1");

    in_vault(&tmp)
        .args(["backup", "--output", "backup.json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("UNENCRYPTED"));
    tmp.child("backup.json")
        .assert(predicate::str::contains("\"private_key\": \"0x1\""));

    walletvault()
        .current_dir(tmp.path())
        .env("WALLETVAULT_PASSWORD", PASSWORD)
        .args(["--vault-file", "other.enc", "restore", "backup.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 added"));

    walletvault()
        .current_dir(tmp.path())
        .env("WALLETVAULT_PASSWORD", PASSWORD)
        .args(["--vault-file", "other.enc", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0xABC"));
}

#[test]
fn export_writes_single_record() {
    let tmp = TempDir::new().unwrap();
    add_account(&tmp, "0xABC", "0x1");

    in_vault(&tmp).args(["export", "0xABC"]).assert().success();
    tmp.child("ABC.json")
        .assert(predicate::str::contains("\"mnemonic\": \"a b c\""));
}

#[test]
fn vault_file_from_config() {
    let tmp = TempDir::new().unwrap();
    tmp.child(".walletvault.toml")
        .write_str("vault_file = \"custom.enc\"\n")
        .unwrap();

    walletvault()
        .current_dir(tmp.path())
        .env("WALLETVAULT_PASSWORD", PASSWORD)
        .args(["add", "0xABC", "--private-key", "0x1", "--mnemonic", ""])
        .assert()
        .success();

    tmp.child("custom.enc").assert(predicate::path::exists());
    tmp.child("wallets.enc").assert(predicate::path::missing());
}

#[cfg(not(feature = "balance-check"))]
#[test]
fn balance_requires_feature() {
    let tmp = TempDir::new().unwrap();
    in_vault(&tmp)
        .args(["balance", "0xABC"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not available in this build"));
}

#[cfg(not(feature = "keygen"))]
#[test]
fn create_requires_feature() {
    let tmp = TempDir::new().unwrap();
    in_vault(&tmp)
        .arg("create")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not available in this build"));
    tmp.child("wallets.enc").assert(predicate::path::missing());
}

#[cfg(not(feature = "keygen"))]
#[test]
fn add_without_identifier_requires_feature() {
    let tmp = TempDir::new().unwrap();
    in_vault(&tmp)
        .args(["add", "--private-key", "0x1", "--mnemonic", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not available in this build"));
}

#[cfg(feature = "keygen")]
#[test]
fn add_without_identifier_derives_address() {
    let tmp = TempDir::new().unwrap();
    in_vault(&tmp)
        .args([
            "add",
            "--private-key",
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
            "--mnemonic",
            "",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
        ));
}

#[cfg(feature = "keygen")]
#[test]
fn create_stores_generated_account() {
    let tmp = TempDir::new().unwrap();
    in_vault(&tmp)
        .arg("create")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created account 0x"));

    in_vault(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("key, mnemonic, path"));
}

#[test]
fn completions_unknown_shell_fails() {
    walletvault()
        .args(["completions", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn completions_bash() {
    walletvault()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("walletvault"));
}
