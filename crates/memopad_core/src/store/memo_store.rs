//! Memo store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read-all/update/delete over the `memo` table.
//! - Acquire and release one SQLite handle per operation.
//!
//! # Invariants
//! - Row keys come from the engine, never from the caller.
//! - Update/delete on a missing key affect zero rows and still succeed.
//! - Writes are serialized through one lock per store.

use crate::db::migrations::{initialize, MigrationPlan, SchemaStatus};
use crate::db::{open_handle, DbError, DbResult};
use crate::model::memo::{Memo, MemoId, NewMemo};
use log::{debug, error, info};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

const MEMO_SELECT_SQL: &str = "SELECT no, content, datetime FROM memo ORDER BY no ASC;";

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// A persisted row cannot be mapped to a `Memo`.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted memo data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable memo persistence.
pub trait MemoStore {
    /// Inserts a draft. The assigned id is visible only through `read_all`.
    fn create(&self, memo: &NewMemo) -> StoreResult<()>;
    /// Returns every row ordered by id ascending.
    fn read_all(&self) -> StoreResult<Vec<Memo>>;
    /// Overwrites content and timestamp of the row with `memo.id`.
    fn update(&self, memo: &Memo) -> StoreResult<()>;
    /// Removes the row with `memo.id`.
    fn delete(&self, memo: &Memo) -> StoreResult<()>;
    fn count(&self) -> StoreResult<u64>;
}

/// SQLite-backed memo store.
///
/// Holds only the database location. Each operation opens its own handle
/// and closes it before returning.
#[derive(Debug)]
pub struct SqliteMemoStore {
    path: PathBuf,
    schema: SchemaStatus,
    write_lock: Mutex<()>,
}

impl SqliteMemoStore {
    /// Opens the store at `path` with the current schema version and no
    /// upgrade steps.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Self::open_with_plan(path, SCHEMA_VERSION, &MigrationPlan::new())
    }

    /// Opens the store and initializes the schema at `schema_version`.
    ///
    /// # Errors
    /// - `DbError::UnsupportedSchemaVersion` when the file is newer.
    /// - `DbError::MissingMigration` when `plan` lacks a needed step.
    pub fn open_with_plan(
        path: impl AsRef<Path>,
        schema_version: u32,
        plan: &MigrationPlan,
    ) -> DbResult<Self> {
        let started_at = Instant::now();
        let path = path.as_ref().to_path_buf();
        info!("event=store_open module=store status=start schema_version={schema_version}");

        let schema = match open_handle(&path)
            .and_then(|mut conn| initialize(&mut conn, schema_version, plan))
        {
            Ok(schema) => schema,
            Err(err) => {
                error!(
                    "event=store_open module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err);
            }
        };

        info!(
            "event=store_open module=store status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(Self {
            path,
            schema,
            write_lock: Mutex::new(()),
        })
    }

    /// Schema outcome observed when this store was opened.
    pub fn schema_status(&self) -> SchemaStatus {
        self.schema
    }

    fn handle(&self) -> StoreResult<Connection> {
        Ok(open_handle(&self.path)?)
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        // The guard protects no data, so a poisoned lock is still usable.
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn run<T>(
        &self,
        event: &'static str,
        op: impl FnOnce(&Connection) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let started_at = Instant::now();
        debug!("event={event} module=store status=start");

        let result = self.handle().and_then(|conn| op(&conn));
        match &result {
            Ok(_) => debug!(
                "event={event} module=store status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event={event} module=store status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

impl MemoStore for SqliteMemoStore {
    fn create(&self, memo: &NewMemo) -> StoreResult<()> {
        let _guard = self.lock_writes();
        self.run("memo_create", |conn| {
            conn.execute(
                "INSERT INTO memo (content, datetime) VALUES (?1, ?2);",
                params![memo.content.as_str(), memo.created_at],
            )?;
            debug!(
                "event=memo_create module=store status=inserted id={}",
                conn.last_insert_rowid()
            );
            Ok(())
        })
    }

    fn read_all(&self) -> StoreResult<Vec<Memo>> {
        self.run("memo_read_all", |conn| {
            let mut stmt = conn.prepare(MEMO_SELECT_SQL)?;
            let mut rows = stmt.query([])?;
            let mut memos = Vec::new();
            while let Some(row) = rows.next()? {
                memos.push(parse_memo_row(row)?);
            }
            Ok(memos)
        })
    }

    fn update(&self, memo: &Memo) -> StoreResult<()> {
        let _guard = self.lock_writes();
        self.run("memo_update", |conn| {
            let changed = conn.execute(
                "UPDATE memo SET content = ?1, datetime = ?2 WHERE no = ?3;",
                params![memo.content.as_str(), memo.created_at, memo.id.get()],
            )?;
            debug!(
                "event=memo_update module=store status=applied id={} changed={changed}",
                memo.id
            );
            Ok(())
        })
    }

    fn delete(&self, memo: &Memo) -> StoreResult<()> {
        let _guard = self.lock_writes();
        self.run("memo_delete", |conn| {
            let changed = conn.execute("DELETE FROM memo WHERE no = ?1;", [memo.id.get()])?;
            debug!(
                "event=memo_delete module=store status=applied id={} changed={changed}",
                memo.id
            );
            Ok(())
        })
    }

    fn count(&self) -> StoreResult<u64> {
        self.run("memo_count", |conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM memo;", [], |row| row.get(0))?;
            u64::try_from(count)
                .map_err(|_| StoreError::InvalidData(format!("negative row count `{count}`")))
        })
    }
}

fn parse_memo_row(row: &Row<'_>) -> StoreResult<Memo> {
    let id: i64 = row.get("no")?;
    let content = row
        .get::<_, Option<String>>("content")?
        .ok_or_else(|| StoreError::InvalidData(format!("NULL content in memo.no={id}")))?;
    let created_at = row
        .get::<_, Option<i64>>("datetime")?
        .ok_or_else(|| StoreError::InvalidData(format!("NULL datetime in memo.no={id}")))?;

    Ok(Memo {
        id: MemoId::new(id),
        content,
        created_at,
    })
}

impl<T: MemoStore + ?Sized> MemoStore for &T {
    fn create(&self, memo: &NewMemo) -> StoreResult<()> {
        (**self).create(memo)
    }

    fn read_all(&self) -> StoreResult<Vec<Memo>> {
        (**self).read_all()
    }

    fn update(&self, memo: &Memo) -> StoreResult<()> {
        (**self).update(memo)
    }

    fn delete(&self, memo: &Memo) -> StoreResult<()> {
        (**self).delete(memo)
    }

    fn count(&self) -> StoreResult<u64> {
        (**self).count()
    }
}
