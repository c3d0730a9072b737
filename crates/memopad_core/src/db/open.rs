//! Per-operation SQLite handle bootstrap.
//!
//! # Invariants
//! - Every returned handle has the busy timeout configured.
//! - Handles are never cached; dropping one closes the connection.

use super::DbResult;
use log::error;
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a configured handle to the database file at `path`.
///
/// The caller owns the handle for exactly one operation and drops it before
/// returning. Schema bootstrap is not performed here; see
/// [`crate::db::migrations::initialize`].
pub fn open_handle(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();

    let conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_handle module=db status=error duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    if let Err(err) = conn.busy_timeout(BUSY_TIMEOUT) {
        error!(
            "event=db_handle module=db status=error duration_ms={} error_code=db_configure_failed error={}",
            started_at.elapsed().as_millis(),
            err
        );
        return Err(err.into());
    }

    Ok(conn)
}
