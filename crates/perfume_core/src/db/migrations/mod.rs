//! Ordered schema migrations for the catalog database.
//!
//! # Invariants
//! - `version` values are strictly increasing.
//! - All pending migrations run inside one transaction.
//! - A migration's `backfill` runs right after its SQL, in the same transaction.

use crate::db::{DbError, DbResult};
use crate::model::account::fold_email;
use log::info;
use rusqlite::Connection;

#[derive(Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
    backfill: Option<fn(&Connection) -> DbResult<()>>,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_init.sql"),
        backfill: None,
    },
    Migration {
        version: 2,
        sql: include_str!("0002_lookup_indexes.sql"),
        backfill: None,
    },
    Migration {
        version: 3,
        sql: include_str!("0003_account_email_key.sql"),
        backfill: Some(backfill_account_email_keys),
    },
    Migration {
        version: 4,
        sql: include_str!("0004_account_email_key_unique.sql"),
        backfill: None,
    },
];

/// Latest schema version this build understands.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` up to [`latest_version`].
///
/// Databases written by a newer build are rejected untouched.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current = current_user_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }
    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        tx.execute_batch(migration.sql)?;
        if let Some(backfill) = migration.backfill {
            backfill(&tx)?;
        }
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={current} to_version={latest}");
    Ok(())
}

/// Reads the schema version stamped on `conn`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Fills `accounts.email_key` with the Unicode-folded email of every row.
///
/// SQLite's `lower()` only folds ASCII, so keys are computed here.
fn backfill_account_email_keys(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare(
        "SELECT account_id, email_address
         FROM accounts
         WHERE email_address IS NOT NULL;",
    )?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    for (account_id, email) in rows {
        conn.execute(
            "UPDATE accounts SET email_key = ?2 WHERE account_id = ?1;",
            rusqlite::params![account_id, fold_email(&email)],
        )?;
    }
    Ok(())
}
