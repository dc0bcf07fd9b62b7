//! Account repository and credential lookups.
//!
//! # Invariants
//! - Email matching goes through the unique `email_key` column, folded with
//!   `fold_email`; password matching is exact.
//! - The services never write accounts; writes exist for provisioning.

use crate::model::account::{fold_email, Account};
use crate::repo::unit_of_work::UnitOfWork;
use crate::repo::{RepoError, RepoResult, Repository};
use rusqlite::{params, Row};

const ACCOUNT_SELECT_SQL: &str = "SELECT
    account_id,
    password,
    email_address,
    note,
    role
FROM accounts";

/// SQLite-backed account repository bound to one unit of work.
pub struct SqliteAccountRepository<'uow> {
    uow: &'uow UnitOfWork,
}

impl<'uow> SqliteAccountRepository<'uow> {
    pub fn new(uow: &'uow UnitOfWork) -> Self {
        Self { uow }
    }

    /// Account registered under `email`, compared case-insensitively.
    pub fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        if email.is_empty() {
            return Ok(None);
        }
        let mut stmt = self
            .uow
            .connection()
            .prepare(&format!("{ACCOUNT_SELECT_SQL} WHERE email_key = ?1;"))?;
        let mut rows = stmt.query([fold_email(email)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_account_row(row)?));
        }
        Ok(None)
    }
}

impl Repository for SqliteAccountRepository<'_> {
    type Entity = Account;
    type Key = i64;

    fn get_all(&self) -> RepoResult<Vec<Account>> {
        let mut stmt = self
            .uow
            .connection()
            .prepare(&format!("{ACCOUNT_SELECT_SQL} ORDER BY account_id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut accounts = Vec::new();
        while let Some(row) = rows.next()? {
            accounts.push(parse_account_row(row)?);
        }
        Ok(accounts)
    }

    fn get_by_id(&self, id: &i64) -> RepoResult<Option<Account>> {
        let mut stmt = self
            .uow
            .connection()
            .prepare(&format!("{ACCOUNT_SELECT_SQL} WHERE account_id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_account_row(row)?));
        }
        Ok(None)
    }

    fn add(&self, account: &Account) -> RepoResult<()> {
        self.uow.execute(
            "INSERT INTO accounts (account_id, password, email_address, email_key, note, role)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                account.account_id,
                account.password,
                account.email,
                account.email_key(),
                account.note,
                account.role_code,
            ],
        )?;
        Ok(())
    }

    fn update(&self, account: &Account) -> RepoResult<()> {
        let changed = self.uow.execute(
            "UPDATE accounts
             SET password = ?2, email_address = ?3, email_key = ?4, note = ?5, role = ?6
             WHERE account_id = ?1;",
            params![
                account.account_id,
                account.password,
                account.email,
                account.email_key(),
                account.note,
                account.role_code,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("account", account.account_id));
        }
        Ok(())
    }

    fn delete(&self, id: &i64) -> RepoResult<()> {
        let changed = self
            .uow
            .execute("DELETE FROM accounts WHERE account_id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found("account", id));
        }
        Ok(())
    }
}

/// Account whose email matches (any case) and whose password matches exactly.
///
/// Blank inputs never match.
pub fn authenticate_account(
    accounts: &SqliteAccountRepository<'_>,
    email: &str,
    password: &str,
) -> RepoResult<Option<Account>> {
    if email.is_empty() || password.is_empty() {
        return Ok(None);
    }
    Ok(accounts
        .find_by_email(email)?
        .filter(|account| account.password == password))
}

fn parse_account_row(row: &Row<'_>) -> RepoResult<Account> {
    Ok(Account {
        account_id: row.get("account_id")?,
        password: row.get("password")?,
        email: row.get("email_address")?,
        note: row.get("note")?,
        role_code: row.get("role")?,
    })
}
