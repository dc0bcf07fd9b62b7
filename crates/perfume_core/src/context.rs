//! Explicitly constructed service context.
//!
//! # Responsibility
//! - Own the unit of work (and through it the single store connection).
//! - Hand it to each service constructor by reference.

use crate::config::CoreConfig;
use crate::db::{open_db, open_db_in_memory};
use crate::repo::unit_of_work::UnitOfWork;
use crate::repo::RepoResult;
use rusqlite::Connection;
use std::path::Path;

/// Store handle shared by the auth, catalog and manufacturer services.
pub struct CoreContext {
    uow: UnitOfWork,
}

impl CoreContext {
    /// Opens the database file named by `config`.
    pub fn from_config(config: &CoreConfig) -> RepoResult<Self> {
        Self::open(&config.database_path)
    }

    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::from_connection(open_db(path)?)
    }

    pub fn in_memory() -> RepoResult<Self> {
        Self::from_connection(open_db_in_memory()?)
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> RepoResult<Self> {
        Ok(Self {
            uow: UnitOfWork::try_new(conn)?,
        })
    }

    pub fn unit_of_work(&self) -> &UnitOfWork {
        &self.uow
    }
}
