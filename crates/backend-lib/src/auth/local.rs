// ============================
// crates/backend-lib/src/auth/local.rs
// ============================
//! Username/password verification against the local user store.
//!
//! received credentials → user lookup → {not found | found}
//! → password verification → {mismatch | match}
//!
//! Store failures propagate as `AppError`; an unknown username or a wrong
//! password is an ordinary `AuthOutcome::Rejected`, not an error.
use super::password::CredentialHasher;
use crate::error::AppError;
use crate::storage::UserStore;
use crate::validation::{normalize_password, normalize_username};
use clubhouse_common::User;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Why a log-in attempt was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    UnknownUsername,
    WrongPassword,
}

impl AuthFailure {
    /// Human-readable reason
    pub fn reason(&self) -> &'static str {
        match self {
            AuthFailure::UnknownUsername => "Incorrect username",
            AuthFailure::WrongPassword => "Incorrect password",
        }
    }
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Result of verifying a set of credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated(User),
    Rejected(AuthFailure),
}

/// The local strategy: look the user up, then compare the password hash
#[derive(Clone)]
pub struct LocalStrategy {
    users: Arc<dyn UserStore>,
    hasher: CredentialHasher,
}

impl LocalStrategy {
    pub fn new(users: Arc<dyn UserStore>, hasher: CredentialHasher) -> Self {
        Self { users, hasher }
    }

    /// Verify raw credentials as submitted by the log-in form
    #[instrument(skip(self, password))]
    pub async fn verify(&self, username: &str, password: &str) -> Result<AuthOutcome, AppError> {
        let username = normalize_username(username);

        let Some(user) = self.users.find_by_username(&username).await? else {
            debug!("no such user");
            return Ok(AuthOutcome::Rejected(AuthFailure::UnknownUsername));
        };

        let matched = self
            .hasher
            .compare(normalize_password(password), user.password_hash.clone())
            .await?;
        if !matched {
            debug!(user_id = %user.id, "password mismatch");
            return Ok(AuthOutcome::Rejected(AuthFailure::WrongPassword));
        }

        Ok(AuthOutcome::Authenticated(user))
    }
}
