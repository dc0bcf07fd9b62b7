//! Staff account entity and role mapping.
//!
//! # Invariants
//! - Email uniqueness is case-insensitive: the store keeps a unique
//!   `email_key` built with [`fold_email`].
//! - Only `Manager` and `Staff` roles grant access; every other code is denied.

use serde::{Deserialize, Serialize};

/// Persisted role code for managers.
pub const ROLE_CODE_MANAGER: i64 = 2;
/// Persisted role code for staff members.
pub const ROLE_CODE_STAFF: i64 = 3;

/// Access role derived from the persisted role code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Full create/update/delete/search permission.
    Manager,
    /// Read and search only.
    Staff,
}

impl AccountRole {
    /// Maps a stored role code; unknown or missing codes grant nothing.
    pub fn from_code(code: Option<i64>) -> Option<Self> {
        match code {
            Some(ROLE_CODE_MANAGER) => Some(Self::Manager),
            Some(ROLE_CODE_STAFF) => Some(Self::Staff),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Manager => ROLE_CODE_MANAGER,
            Self::Staff => ROLE_CODE_STAFF,
        }
    }

    /// Label shown next to the signed-in user.
    pub fn label(self) -> &'static str {
        match self {
            Self::Manager => "Manager",
            Self::Staff => "Staff",
        }
    }
}

/// Pre-provisioned staff account. Read-only from the services' point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: i64,
    pub email: Option<String>,
    /// Stored verbatim; hashing is a store concern.
    #[serde(skip_serializing)]
    pub password: String,
    pub note: String,
    /// Raw role code as persisted.
    pub role_code: Option<i64>,
}

impl Account {
    pub fn role(&self) -> Option<AccountRole> {
        AccountRole::from_code(self.role_code)
    }

    /// Folded lookup key of the stored email, `None` without an email.
    pub fn email_key(&self) -> Option<String> {
        self.email.as_deref().map(fold_email)
    }
}

/// Unicode lowercase form used to compare and index emails.
pub fn fold_email(email: &str) -> String {
    email.to_lowercase()
}
