//! Schema bootstrap and upgrade-step registry.
//!
//! # Responsibility
//! - Create the `memo` table on a fresh database.
//! - Run registered upgrade steps when the requested version increases.
//! - Rebuild a plain-key `memo` table so row keys are never handed out twice.
//!
//! # Invariants
//! - Step versions are unique; a later registration replaces an earlier one.
//! - Every version between the stored and requested version needs a step.
//! - The resulting version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::{info, warn};
use rusqlite::{Connection, OptionalExtension};
use std::collections::BTreeMap;

/// Creates the `memo` table. Column layout is shared with existing files.
pub const BASE_SCHEMA_SQL: &str = include_str!("0001_memo.sql");

/// Copies a plain `INTEGER PRIMARY KEY` memo table into an `AUTOINCREMENT` one.
const REKEY_MEMO_SQL: &str = "
CREATE TABLE memo_rekeyed (
    no INTEGER PRIMARY KEY AUTOINCREMENT,
    content TEXT,
    datetime INTEGER
);
INSERT INTO memo_rekeyed (no, content, datetime) SELECT no, content, datetime FROM memo;
DROP TABLE memo;
ALTER TABLE memo_rekeyed RENAME TO memo;
";

/// Outcome of [`initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    /// Fresh database; the table was created at the requested version.
    Created { version: u32 },
    /// Stored version was older; the listed steps ran.
    Upgraded { from: u32, to: u32 },
    /// Stored version already matched.
    Current { version: u32 },
}

/// Ordered list of upgrade steps keyed by target version.
///
/// Empty by default. Register one step per version bump; the step with
/// `version = n` upgrades a database from `n - 1` to `n`.
#[derive(Debug, Clone, Default)]
pub struct MigrationPlan {
    steps: BTreeMap<u32, &'static str>,
}

impl MigrationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the SQL that upgrades the schema to `version`.
    pub fn with_step(mut self, version: u32, sql: &'static str) -> Self {
        self.steps.insert(version, sql);
        self
    }

    fn step(&self, version: u32) -> Option<&'static str> {
        self.steps.get(&version).copied()
    }
}

/// Ensures the `memo` table exists at `requested` schema version.
///
/// Runs inside one transaction, so a failing step leaves the stored
/// version and schema untouched.
pub fn initialize(
    conn: &mut Connection,
    requested: u32,
    plan: &MigrationPlan,
) -> DbResult<SchemaStatus> {
    if requested == 0 {
        return Err(DbError::InvalidSchemaVersion(requested));
    }

    let stored = current_user_version(conn)?;

    if stored > requested {
        warn!(
            "event=schema_init module=db status=error error_code=schema_too_new db_version={stored} requested={requested}"
        );
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: stored,
            requested,
        });
    }

    let tx = conn.transaction()?;
    let status = if stored == requested {
        // Older files may carry the version without the table.
        tx.execute_batch(BASE_SCHEMA_SQL)?;
        rekey_plain_memo_table(&tx)?;
        SchemaStatus::Current { version: stored }
    } else if stored == 0 {
        tx.execute_batch(BASE_SCHEMA_SQL)?;
        rekey_plain_memo_table(&tx)?;
        SchemaStatus::Created { version: requested }
    } else {
        rekey_plain_memo_table(&tx)?;
        for version in (stored + 1)..=requested {
            let sql = plan.step(version).ok_or(DbError::MissingMigration {
                from: stored,
                to: requested,
                missing: version,
            })?;
            tx.execute_batch(sql)?;
        }
        SchemaStatus::Upgraded {
            from: stored,
            to: requested,
        }
    };
    if stored != requested {
        tx.execute_batch(&format!("PRAGMA user_version = {requested};"))?;
    }
    tx.commit()?;

    info!("event=schema_init module=db status=ok outcome={status:?}");
    Ok(status)
}

/// Rebuilds `memo` with `AUTOINCREMENT` when it was declared without it.
///
/// Existing keys are copied as-is and the sequence starts after the highest
/// one. Returns whether a rebuild happened.
fn rekey_plain_memo_table(conn: &Connection) -> DbResult<bool> {
    let declared: Option<String> = conn
        .query_row(
            "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = 'memo';",
            [],
            |row| row.get(0),
        )
        .optional()?;
    let Some(declared) = declared else {
        return Ok(false);
    };
    if declared.to_ascii_uppercase().contains("AUTOINCREMENT") {
        return Ok(false);
    }

    conn.execute_batch(REKEY_MEMO_SQL)?;
    info!("event=schema_rekey module=db status=ok table=memo");
    Ok(true)
}

/// Reads the stored schema version.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::{rekey_plain_memo_table, MigrationPlan, BASE_SCHEMA_SQL};
    use rusqlite::Connection;

    #[test]
    fn later_registration_replaces_step() {
        let plan = MigrationPlan::new()
            .with_step(3, "-- three")
            .with_step(2, "-- two, first")
            .with_step(2, "-- two");
        assert_eq!(plan.step(3), Some("-- three"));
        assert_eq!(plan.step(2), Some("-- two"));
        assert_eq!(plan.step(4), None);
    }

    #[test]
    fn rekey_skips_table_that_already_autoincrements() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(BASE_SCHEMA_SQL).unwrap();
        assert!(!rekey_plain_memo_table(&conn).unwrap());
    }

    #[test]
    fn rekey_keeps_rows_and_keys_of_plain_table() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE memo (no INTEGER PRIMARY KEY, content TEXT, datetime INTEGER);
             INSERT INTO memo (no, content, datetime) VALUES (4, 'kept', 40);",
        )
        .unwrap();

        assert!(rekey_plain_memo_table(&conn).unwrap());
        assert!(!rekey_plain_memo_table(&conn).unwrap());
        let row: (i64, String, i64) = conn
            .query_row("SELECT no, content, datetime FROM memo;", [], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .unwrap();
        assert_eq!(row, (4, "kept".to_string(), 40));
    }

    #[test]
    fn rekey_skips_missing_table() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(!rekey_plain_memo_table(&conn).unwrap());
    }
}
