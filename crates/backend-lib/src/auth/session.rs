// ============================
// crates/backend-lib/src/auth/session.rs
// ============================
//! Session token handling and management.
//!
//! A session holds only the user's identifier; the full user is loaded from
//! the store on every request that presents the token.
use crate::metrics::{SESSION_ACTIVE, SESSION_CREATED, SESSION_DESTROYED, SESSION_EXPIRED};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use clubhouse_common::UserId;
use metrics::{counter, gauge};
use rand::{rngs::OsRng, RngCore};
use std::{
    collections::HashMap,
    sync::{Arc, Weak},
    time::{Duration, SystemTime},
};
use tokio::sync::RwLock;

/// Default session TTL (time to live)
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7); // 7 days

/// Longest accepted session TTL
pub const MAX_SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// How often expired sessions are swept
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Session token size in bytes (256 bits of entropy)
const TOKEN_BYTES: usize = 32;

/// Session information
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: UserId,
    pub created_at: SystemTime,
    pub expires_at: SystemTime,
}

impl Session {
    fn is_live(&self, now: SystemTime) -> bool {
        now < self.expires_at
    }
}

/// Session manager mapping opaque tokens to user identifiers
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    /// Create a new session manager with the default TTL
    pub fn new() -> Self {
        Self::with_ttl(SESSION_TTL)
    }

    /// Create a new session manager. The TTL is capped at `MAX_SESSION_TTL`.
    ///
    /// Must be called from within a Tokio runtime: it spawns the sweeper,
    /// which stops once the last clone of the manager is dropped.
    pub fn with_ttl(ttl: Duration) -> Self {
        let manager = SessionManager {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: ttl.min(MAX_SESSION_TTL),
        };

        let weak = Arc::downgrade(&manager.sessions);
        tokio::spawn(cleanup_task(weak));

        manager
    }

    /// Session lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Create a session for a user and return its token
    pub async fn create(&self, user_id: UserId) -> String {
        let token = generate_token();
        let now = SystemTime::now();
        let session = Session {
            user_id,
            created_at: now,
            expires_at: now.checked_add(self.ttl).unwrap_or(now + MAX_SESSION_TTL),
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(token.clone(), session);

        counter!(SESSION_CREATED).increment(1);
        gauge!(SESSION_ACTIVE).set(sessions.len() as f64);

        token
    }

    /// Get a live session by token
    pub async fn get(&self, token: &str) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions
            .get(token)
            .filter(|s| s.is_live(SystemTime::now()))
            .cloned()
    }

    /// Resolve a token to the user it was issued for
    pub async fn resolve(&self, token: &str) -> Option<UserId> {
        self.get(token).await.map(|s| s.user_id)
    }

    /// Drop a session. Returns whether it existed.
    pub async fn destroy(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(token).is_some();
        if removed {
            counter!(SESSION_DESTROYED).increment(1);
            gauge!(SESSION_ACTIVE).set(sessions.len() as f64);
        }
        removed
    }

    /// Number of sessions currently held, expired ones included until swept
    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Remove every expired session, returning how many were dropped
    pub async fn purge_expired(&self) -> usize {
        purge(&self.sessions).await
    }
}

async fn purge(sessions: &RwLock<HashMap<String, Session>>) -> usize {
    let mut sessions = sessions.write().await;
    let now = SystemTime::now();
    let before_count = sessions.len();

    sessions.retain(|_, session| session.is_live(now));

    let after_count = sessions.len();
    let removed = before_count - after_count;
    if removed > 0 {
        counter!(SESSION_EXPIRED).increment(removed as u64);
        gauge!(SESSION_ACTIVE).set(after_count as f64);
    }
    removed
}

async fn cleanup_task(sessions: Weak<RwLock<HashMap<String, Session>>>) {
    loop {
        tokio::time::sleep(CLEANUP_INTERVAL).await;

        let Some(sessions) = sessions.upgrade() else {
            break;
        };
        let removed = purge(&sessions).await;
        if removed > 0 {
            tracing::debug!(removed, "swept expired sessions");
        }
    }
}

/// Generate a cryptographically secure, URL-safe session token
fn generate_token() -> String {
    let mut buffer = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}
