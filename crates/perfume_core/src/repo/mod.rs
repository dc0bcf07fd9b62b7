//! Persistence abstraction and its SQLite implementation.
//!
//! # Responsibility
//! - Define the generic record-store contract shared by every entity.
//! - Provide the unit of work that owns the connection and batches writes.
//! - Keep SQL details out of the service layer.
//!
//! # Invariants
//! - Every repository borrows the same `UnitOfWork`, so uncommitted writes
//!   are visible across repositories.
//! - Writes are durable only after `UnitOfWork::commit` succeeds.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account_repo;
pub mod manufacturer_repo;
pub mod perfume_repo;
pub mod unit_of_work;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository-level error for catalog persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Update or delete targeted a key that is not stored.
    NotFound { entity: &'static str, key: String },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    pub(crate) fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "catalog store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "catalog store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "catalog store requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record-store contract implemented once per entity.
///
/// Mutations only stage changes inside the owning unit of work; callers
/// decide when to commit.
pub trait Repository {
    type Entity;
    type Key: ?Sized;

    fn get_all(&self) -> RepoResult<Vec<Self::Entity>>;
    fn get_by_id(&self, id: &Self::Key) -> RepoResult<Option<Self::Entity>>;
    fn add(&self, entity: &Self::Entity) -> RepoResult<()>;
    /// Returns `RepoError::NotFound` when no stored row matches.
    fn update(&self, entity: &Self::Entity) -> RepoResult<()>;
    /// Returns `RepoError::NotFound` when no stored row matches.
    fn delete(&self, id: &Self::Key) -> RepoResult<()>;

    /// Records matching `predicate`, in `get_all` order.
    fn find(&self, predicate: impl Fn(&Self::Entity) -> bool) -> RepoResult<Vec<Self::Entity>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|entity| predicate(entity))
            .collect())
    }

    fn count(&self, predicate: impl Fn(&Self::Entity) -> bool) -> RepoResult<usize> {
        Ok(self.find(predicate)?.len())
    }
}
