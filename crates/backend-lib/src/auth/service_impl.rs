// ============================
// crates/backend-lib/src/auth/service_impl.rs
// ============================
//! `AuthService` implementation backed by a `UserStore`.
use super::local::{AuthOutcome, LocalStrategy};
use super::password::CredentialHasher;
use crate::auth::AuthService;
use crate::error::AppError;
use crate::storage::UserStore;
use crate::validation::ValidSignUp;
use async_trait::async_trait;
use clubhouse_common::{NewUser, User, UserId};
use std::sync::Arc;
use tracing::{info, instrument};

/// Auth service over a user store, built once and shared through `AppState`
pub struct DefaultAuth {
    users: Arc<dyn UserStore>,
    hasher: CredentialHasher,
    strategy: LocalStrategy,
}

impl DefaultAuth {
    pub fn new(users: Arc<dyn UserStore>, hasher: CredentialHasher) -> Self {
        let strategy = LocalStrategy::new(users.clone(), hasher);
        Self {
            users,
            hasher,
            strategy,
        }
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    #[instrument(skip_all, fields(username = %sign_up.username))]
    async fn register(&self, sign_up: ValidSignUp) -> Result<User, AppError> {
        let ValidSignUp {
            username,
            password,
            first_name,
            last_name,
            membership,
            admin,
        } = sign_up;

        let password_hash = self.hasher.hash(password).await?;
        let user = self
            .users
            .create(NewUser {
                username,
                password_hash,
                first_name,
                last_name,
                membership,
                admin,
            })
            .await?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<AuthOutcome, AppError> {
        self.strategy.verify(username, password).await
    }

    fn serialize_user(&self, user: &User) -> UserId {
        user.id
    }

    async fn deserialize_user(&self, id: &UserId) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }
}
