//! Unit of work over the single catalog connection.
//!
//! # Responsibility
//! - Own the SQLite connection shared by every repository.
//! - Open a transaction lazily on the first staged write.
//! - Expose one `commit` per business operation.
//!
//! # Invariants
//! - Staged writes are visible to all repositories of this unit of work.
//! - Dropping a unit of work with staged writes rolls them back.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbResult;
use crate::repo::account_repo::SqliteAccountRepository;
use crate::repo::manufacturer_repo::SqliteManufacturerRepository;
use crate::repo::perfume_repo::SqlitePerfumeRepository;
use crate::repo::{RepoError, RepoResult};
use log::{error, warn};
use rusqlite::{Connection, Params};
use std::cell::Cell;

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    (
        "manufacturers",
        &["manufacturer_id", "name", "country", "address"],
    ),
    (
        "perfumes",
        &[
            "perfume_id",
            "name",
            "ingredients",
            "release_date",
            "concentration",
            "longevity",
            "manufacturer_id",
        ],
    ),
    (
        "accounts",
        &[
            "account_id",
            "password",
            "email_address",
            "email_key",
            "note",
            "role",
        ],
    ),
];

/// Transactional scope batching repository writes behind one commit.
pub struct UnitOfWork {
    conn: Connection,
    staged_rows: Cell<usize>,
}

impl UnitOfWork {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` for partial schemas.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_catalog_connection_ready(&conn)?;
        Ok(Self {
            conn,
            staged_rows: Cell::new(0),
        })
    }

    /// Read access for specialized queries.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn perfumes(&self) -> SqlitePerfumeRepository<'_> {
        SqlitePerfumeRepository::new(self)
    }

    pub fn manufacturers(&self) -> SqliteManufacturerRepository<'_> {
        SqliteManufacturerRepository::new(self)
    }

    pub fn accounts(&self) -> SqliteAccountRepository<'_> {
        SqliteAccountRepository::new(self)
    }

    /// Whether writes are staged but not yet committed.
    pub fn has_pending_changes(&self) -> bool {
        !self.conn.is_autocommit()
    }

    /// Makes staged writes durable and returns the number of affected rows.
    ///
    /// Returns `Ok(0)` when nothing is staged. A failed commit rolls the
    /// staged writes back before the error is returned.
    pub fn commit(&self) -> DbResult<usize> {
        if self.conn.is_autocommit() {
            self.staged_rows.set(0);
            return Ok(0);
        }

        if let Err(err) = self.conn.execute_batch("COMMIT;") {
            error!("event=uow_commit module=repo status=error error={err}");
            self.discard();
            return Err(err.into());
        }

        Ok(self.staged_rows.replace(0))
    }

    /// Discards staged writes.
    pub fn rollback(&self) -> DbResult<()> {
        self.staged_rows.set(0);
        if self.conn.is_autocommit() {
            return Ok(());
        }
        self.conn.execute_batch("ROLLBACK;")?;
        Ok(())
    }

    /// Stages one write statement, opening the transaction if needed.
    pub(crate) fn execute<P: Params>(&self, sql: &str, params: P) -> RepoResult<usize> {
        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN DEFERRED;")?;
        }
        let changed = self.conn.execute(sql, params)?;
        self.staged_rows.set(self.staged_rows.get() + changed);
        Ok(changed)
    }

    fn discard(&self) {
        if let Err(err) = self.rollback() {
            error!("event=uow_rollback module=repo status=error error={err}");
        }
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        if self.has_pending_changes() {
            warn!(
                "event=uow_drop module=repo status=rollback staged_rows={}",
                self.staged_rows.get()
            );
            self.discard();
        }
    }
}

fn ensure_catalog_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
