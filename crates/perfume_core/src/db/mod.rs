//! SQLite storage bootstrap for the perfume catalog.
//!
//! # Responsibility
//! - Open and configure the single SQLite connection used by the core.
//! - Bring the schema up to the latest version before any repository runs.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - Foreign keys are enforced, so manufacturer deletes cascade to perfumes.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage-level failure raised while opening, migrating or committing.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Configured database path is blank.
    MissingDatabasePath,
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::MissingDatabasePath => write!(f, "database path must not be empty"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "catalog schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::MissingDatabasePath | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
