//! Connection bootstrap for the catalog database.
//!
//! # Responsibility
//! - Open file-backed or in-memory SQLite connections.
//! - Apply connection pragmas and pending migrations.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections are migrated to `migrations::latest_version()`.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) the catalog database file and migrates it.
///
/// # Errors
/// - `DbError::MissingDatabasePath` when `path` is empty.
/// - `DbError::UnsupportedSchemaVersion` when the file was written by a newer build.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        error!("event=db_open module=db status=error mode=file error_code=db_path_missing");
        return Err(DbError::MissingDatabasePath);
    }
    open_logged("file", || Connection::open(path))
}

/// Opens a private in-memory catalog database, already migrated.
///
/// Mostly used by tests and by callers that seed data per run.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_logged("memory", Connection::open_in_memory)
}

fn open_logged(
    mode: &'static str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = open().map_err(|err| {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={err}",
            started_at.elapsed().as_millis()
        );
        DbError::from(err)
    })?;

    if let Err(err) = configure(&mut conn) {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={err}",
            started_at.elapsed().as_millis()
        );
        return Err(err);
    }

    info!(
        "event=db_open module=db status=ok mode={mode} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn configure(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)
}
