//! SQLite handle acquisition and schema bootstrap.
//!
//! # Responsibility
//! - Open short-lived, configured SQLite handles for store operations.
//! - Create the `memo` table and run registered upgrade steps.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - No memo data is read or written before `initialize` succeeds.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::open_handle;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// On-disk schema is newer than the version this binary asked for.
    UnsupportedSchemaVersion {
        db_version: u32,
        requested: u32,
    },
    /// Upgrade needs a step that was never registered.
    MissingMigration {
        from: u32,
        to: u32,
        missing: u32,
    },
    /// Version 0 is reserved for "never initialized".
    InvalidSchemaVersion(u32),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                requested,
            } => write!(
                f,
                "database schema version {db_version} is newer than requested {requested}"
            ),
            Self::MissingMigration { from, to, missing } => write!(
                f,
                "cannot upgrade schema from {from} to {to}: no upgrade step registered for version {missing}"
            ),
            Self::InvalidSchemaVersion(version) => {
                write!(f, "schema version must be at least 1, got {version}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
