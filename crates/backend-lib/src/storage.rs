// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! User store abstraction with flat-file and in-memory implementations.
//!
//! Usernames are keyed lower-cased, so uniqueness and lookups are
//! case-insensitive in every backend. `create` is an atomic
//! "insert if username absent".
use crate::error::AppError;
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use clubhouse_common::{NewUser, User, UserId};
use dashmap::{mapref::entry::Entry, DashMap};
use sha2::{Digest, Sha256};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::fs as tokio_fs;

/// Trait for user store backends
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user, assigning its identifier.
    /// Fails with `UsernameTaken` if the username is already registered.
    async fn create(&self, user: NewUser) -> Result<User, AppError>;

    /// Look a user up by username (case-insensitive)
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Look a user up by identifier
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AppError>;
}

fn username_key(username: &str) -> String {
    username.to_ascii_lowercase()
}

/// In-memory user store
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<DashMap<UserId, User>>,
    usernames: Arc<DashMap<String, UserId>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, mut user: NewUser) -> Result<User, AppError> {
        user.username = username_key(&user.username);
        // The vacant entry holds the shard lock until the user is in place
        match self.usernames.entry(user.username.clone()) {
            Entry::Occupied(_) => Err(AppError::UsernameTaken(user.username)),
            Entry::Vacant(slot) => {
                let user = user.with_id(UserId::new());
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(user)
            },
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let Some(id) = self.usernames.get(&username_key(username)).map(|e| *e.value()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|e| e.value().clone()))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AppError> {
        Ok(self.users.get(id).map(|e| e.value().clone()))
    }
}

/// Flat-file implementation of the `UserStore` trait.
///
/// Layout under the root:
/// - `users/<id>.json`: the user record
/// - `usernames/<base64url(sha256(username))>`: the owning user id
///
/// The index entry is staged with the id already written, then published by
/// hard-linking it under its final name. Linking fails if the name exists,
/// which is what makes registration atomic across concurrent requests, and a
/// published entry is never empty.
#[derive(Clone)]
pub struct FlatFileUserStore {
    root: PathBuf,
}

impl FlatFileUserStore {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("users"))?;
        fs::create_dir_all(root.join("usernames"))?;
        Ok(Self { root })
    }

    fn user_path(&self, id: &UserId) -> PathBuf {
        self.root.join("users").join(format!("{id}.json"))
    }

    /// Fixed-length name, whatever the username's length
    fn username_path(&self, username: &str) -> PathBuf {
        let digest = Sha256::digest(username_key(username).as_bytes());
        self.root.join("usernames").join(URL_SAFE_NO_PAD.encode(digest))
    }

    async fn write_user(&self, user: &User) -> Result<(), AppError> {
        let path = self.user_path(&user.id);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(user)?;
        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for FlatFileUserStore {
    async fn create(&self, mut user: NewUser) -> Result<User, AppError> {
        user.username = username_key(&user.username);
        let index_path = self.username_path(&user.username);
        if tokio_fs::try_exists(&index_path).await? {
            return Err(AppError::UsernameTaken(user.username));
        }

        let user = user.with_id(UserId::new());
        let staged = index_path.with_extension(format!("{}.tmp", user.id));
        let published = async {
            self.write_user(&user).await?;
            tokio_fs::write(&staged, user.id.to_string()).await?;
            match tokio_fs::hard_link(&staged, &index_path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    Err(AppError::UsernameTaken(user.username.clone()))
                },
                Err(e) => Err(e.into()),
            }
        }
        .await;
        let _ = tokio_fs::remove_file(&staged).await;

        if let Err(e) = published {
            // The username stays free; drop the unreferenced record
            let _ = tokio_fs::remove_file(self.user_path(&user.id)).await;
            return Err(e);
        }

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let raw_id = match tokio_fs::read_to_string(self.username_path(username)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let id = UserId::parse(raw_id.trim())
            .ok_or_else(|| AppError::Store(format!("corrupt username index for {username}")))?;
        // Digest collisions resolve to nobody rather than to someone else
        Ok(self
            .find_by_id(&id)
            .await?
            .filter(|user| user.username == username_key(username)))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AppError> {
        let content = match tokio_fs::read(self.user_path(id)).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&content)?))
    }
}
