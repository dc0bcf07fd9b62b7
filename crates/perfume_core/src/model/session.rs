//! Result of a login attempt, threaded explicitly into every service call.

use crate::model::account::AccountRole;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Option<i64>,
    pub email: String,
    pub note: String,
    pub role: Option<AccountRole>,
    pub authenticated: bool,
}

impl Session {
    /// Session for a failed or missing login.
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    pub fn is_manager(&self) -> bool {
        self.authenticated && self.role == Some(AccountRole::Manager)
    }

    pub fn is_staff(&self) -> bool {
        self.authenticated && self.role == Some(AccountRole::Staff)
    }

    /// Display label of the role, `None` when not signed in.
    pub fn role_label(&self) -> Option<&'static str> {
        if !self.authenticated {
            return None;
        }
        self.role.map(AccountRole::label)
    }
}
