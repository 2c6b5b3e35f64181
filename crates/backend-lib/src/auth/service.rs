// =============
// crates/backend-lib/src/auth/service.rs
// =============
//! This module defines the `AuthService` trait, which is used for registration,
//! authentication and session identity.
use super::local::AuthOutcome;
use crate::error::AppError;
use crate::validation::ValidSignUp;
use async_trait::async_trait;
use clubhouse_common::{User, UserId};

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Hash the password and persist a validated sign-up
    async fn register(&self, sign_up: ValidSignUp) -> Result<User, AppError>;

    /// Verify username/password credentials
    async fn authenticate(&self, username: &str, password: &str) -> Result<AuthOutcome, AppError>;

    /// The session payload for a user: its identifier only
    fn serialize_user(&self, user: &User) -> UserId;

    /// Rehydrate the full user from a session payload
    async fn deserialize_user(&self, id: &UserId) -> Result<User, AppError>;
}
