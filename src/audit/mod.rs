//! Audit log — SQLite-based operation history.
//!
//! Stores a record of every vault operation (add, delete, backup, restore,
//! etc.) in a local SQLite database next to the vault file:
//! `wallets.enc` -> `wallets.audit.db`.  Only identifiers and counts are
//! logged, never key material.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, operations silently continue without logging.  Built only
//! with the `audit-log` feature (on by default).

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub vault: String,
    pub identifier: Option<String>,
    pub details: Option<String>,
}

/// Path of the audit database that belongs to `vault_path`.
pub fn db_path(vault_path: &Path) -> PathBuf {
    let stem = vault_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "wallets".to_string());
    vault_path.with_file_name(format!("{stem}.audit.db"))
}

/// Display name used for the `vault` column.
fn vault_name(vault_path: &Path) -> String {
    vault_path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(feature = "audit-log")]
pub use sqlite::AuditLog;

#[cfg(feature = "audit-log")]
mod sqlite {
    use std::path::Path;

    use chrono::{DateTime, Utc};
    use rusqlite::Connection;

    use super::AuditEntry;
    use crate::errors::{Result, WalletVaultError};

    /// SQLite-backed audit log.
    pub struct AuditLog {
        conn: Connection,
    }

    impl AuditLog {
        /// Open (or create) the audit database at `db_path`.
        ///
        /// Returns `None` if the database can't be opened — callers should
        /// treat this as "audit logging unavailable" and continue normally.
        pub fn open(db_path: &Path) -> Option<Self> {
            let conn = Connection::open(db_path).ok()?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let perms = std::fs::Permissions::from_mode(0o600);
                let _ = std::fs::set_permissions(db_path, perms);
            }

            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS audit_log (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    timestamp   TEXT NOT NULL,
                    operation   TEXT NOT NULL,
                    vault       TEXT NOT NULL,
                    identifier  TEXT,
                    details     TEXT
                );",
            )
            .ok()?;

            Some(Self { conn })
        }

        /// Record an operation. Fire-and-forget — errors are silently ignored.
        pub fn log(
            &self,
            operation: &str,
            vault: &str,
            identifier: Option<&str>,
            details: Option<&str>,
        ) {
            let now = Utc::now().to_rfc3339();
            let _ = self.conn.execute(
                "INSERT INTO audit_log (timestamp, operation, vault, identifier, details)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![now, operation, vault, identifier, details],
            );
        }

        /// Query recent audit entries, most recent first.
        ///
        /// - `limit`: maximum number of entries to return.
        /// - `since`: if provided, only return entries newer than this timestamp.
        pub fn query(
            &self,
            limit: usize,
            since: Option<DateTime<Utc>>,
        ) -> Result<Vec<AuditEntry>> {
            let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
            let since_str = since.map(|ts| ts.to_rfc3339());

            let mut stmt = self
                .conn
                .prepare(
                    "SELECT id, timestamp, operation, vault, identifier, details
                     FROM audit_log
                     WHERE ?1 IS NULL OR timestamp >= ?1
                     ORDER BY id DESC
                     LIMIT ?2",
                )
                .map_err(|e| WalletVaultError::AuditError(format!("query prepare: {e}")))?;

            let rows = stmt
                .query_map(rusqlite::params![since_str, limit_i64], |row| {
                    let ts_str: String = row.get(1)?;
                    let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                    Ok(AuditEntry {
                        id: row.get(0)?,
                        timestamp,
                        operation: row.get(2)?,
                        vault: row.get(3)?,
                        identifier: row.get(4)?,
                        details: row.get(5)?,
                    })
                })
                .map_err(|e| WalletVaultError::AuditError(format!("query exec: {e}")))?;

            let mut entries = Vec::new();
            for row in rows {
                entries.push(
                    row.map_err(|e| WalletVaultError::AuditError(format!("row parse: {e}")))?,
                );
            }

            Ok(entries)
        }
    }
}

/// Convenience helper: log an audit event for the vault at `vault_path`.
///
/// Opens the audit database, logs the event, and silently ignores any errors.
/// This is safe to call from any command — it never fails the parent operation.
pub fn log_audit(vault_path: &Path, op: &str, identifier: Option<&str>, details: Option<&str>) {
    #[cfg(feature = "audit-log")]
    if let Some(audit) = AuditLog::open(&db_path(vault_path)) {
        audit.log(op, &vault_name(vault_path), identifier, details);
    }

    #[cfg(not(feature = "audit-log"))]
    {
        let _ = (vault_name(vault_path), op, identifier, details);
    }
}
