// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core backend functionality for the clubhouse chat server:
//! sign-up, local log-in and session identity.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod router;
pub mod storage;
pub mod validation;
pub mod views;

use crate::auth::{AuthService, CredentialHasher, DefaultAuth, SessionManager};
use crate::config::{Settings, StorageBackend};
use crate::storage::{FlatFileUserStore, MemoryUserStore, UserStore};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Session manager
    pub sessions: Arc<SessionManager>,
    /// Settings
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state over the given user store.
    ///
    /// Must be called from within a Tokio runtime (the session sweeper is spawned here).
    pub fn new(users: Arc<dyn UserStore>, settings: Settings) -> Self {
        let hasher = CredentialHasher::new(settings.password_work_factor);
        let auth = Arc::new(DefaultAuth::new(users, hasher));
        let sessions = Arc::new(SessionManager::with_ttl(settings.session_ttl()));

        Self {
            auth,
            sessions,
            settings: Arc::new(settings),
        }
    }

    /// Create the application state with the store the settings ask for
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let users: Arc<dyn UserStore> = match settings.storage {
            StorageBackend::Memory => Arc::new(MemoryUserStore::new()),
            StorageBackend::FlatFile => Arc::new(FlatFileUserStore::new(&settings.data_dir)?),
        };
        Ok(Self::new(users, settings))
    }
}
