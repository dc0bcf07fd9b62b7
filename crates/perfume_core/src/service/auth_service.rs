//! Authentication and role-based authorization.
//!
//! # Invariants
//! - Login never returns an error; every failure is an unauthenticated session.
//! - Only `Manager` and `Staff` accounts can sign in.
//! - Log events never carry passwords or email addresses.

use crate::context::CoreContext;
use crate::model::account::AccountRole;
use crate::model::session::Session;
use crate::repo::account_repo::authenticate_account;
use crate::repo::unit_of_work::UnitOfWork;
use log::{error, info};

/// Whether `session` may create, update or delete catalog records.
pub fn can_mutate(session: &Session) -> bool {
    session.authenticated && session.role == Some(AccountRole::Manager)
}

/// Whether `session` may list and search the catalog.
pub fn can_read(session: &Session) -> bool {
    session.authenticated
        && matches!(session.role, Some(AccountRole::Manager | AccountRole::Staff))
}

pub struct AuthService<'ctx> {
    uow: &'ctx UnitOfWork,
}

impl<'ctx> AuthService<'ctx> {
    pub fn new(ctx: &'ctx CoreContext) -> Self {
        Self {
            uow: ctx.unit_of_work(),
        }
    }

    /// Checks credentials and derives the session role.
    ///
    /// Email is matched case-insensitively, password exactly. Store failures
    /// are logged and reported as a failed login.
    pub fn login(&self, email: &str, password: &str) -> Session {
        if email.is_empty() || password.is_empty() {
            info!("event=login module=auth status=denied reason=missing_credentials");
            return Session::unauthenticated();
        }

        let account = match authenticate_account(&self.uow.accounts(), email, password) {
            Ok(Some(account)) => account,
            Ok(None) => {
                info!("event=login module=auth status=denied reason=bad_credentials");
                return Session::unauthenticated();
            }
            Err(err) => {
                error!("event=login module=auth status=error error={err}");
                return Session::unauthenticated();
            }
        };

        let Some(role) = account.role() else {
            info!(
                "event=login module=auth status=denied reason=role_not_allowed account_id={}",
                account.account_id
            );
            return Session::unauthenticated();
        };

        info!(
            "event=login module=auth status=ok account_id={} role={}",
            account.account_id,
            role.label()
        );
        Session {
            user_id: Some(account.account_id),
            // Matched through `email_key`, which only exists for stored emails.
            email: account.email.unwrap_or_default(),
            note: account.note,
            role: Some(role),
            authenticated: true,
        }
    }
}
