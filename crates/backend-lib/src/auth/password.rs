// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use crate::error::AppError;
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};
use zeroize::Zeroize;

/// Default hashing cost (log2 of the scrypt CPU/memory cost)
pub const DEFAULT_WORK_FACTOR: u8 = 10;
/// Lowest accepted work factor
pub const MIN_WORK_FACTOR: u8 = 4;
/// Highest accepted work factor
pub const MAX_WORK_FACTOR: u8 = 20;

/// Hash a password using scrypt with the given work factor
pub fn hash_password(plain: &str, work_factor: u8) -> anyhow::Result<String> {
    let params = Params::new(work_factor, 8, 1, Params::RECOMMENDED_LEN)
        .map_err(|e| anyhow::anyhow!("invalid scrypt parameters: {e}"))?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, params, &salt)
        .map_err(|e| anyhow::anyhow!("{e}"))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a hash
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}

/// Salted, deliberately slow one-way hashing for stored credentials.
///
/// Both operations run on the blocking pool so a hash never stalls the
/// request executor.
#[derive(Debug, Clone, Copy)]
pub struct CredentialHasher {
    work_factor: u8,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new(DEFAULT_WORK_FACTOR)
    }
}

impl CredentialHasher {
    pub fn new(work_factor: u8) -> Self {
        Self { work_factor }
    }

    pub fn work_factor(&self) -> u8 {
        self.work_factor
    }

    /// Hash a plaintext password. The plaintext is zeroized afterwards.
    pub async fn hash(&self, mut plain: String) -> Result<String, AppError> {
        let work_factor = self.work_factor;
        tokio::task::spawn_blocking(move || {
            let hashed = hash_password(&plain, work_factor);
            plain.zeroize();
            hashed
        })
        .await?
        .map_err(|e| AppError::Hashing(e.to_string()))
    }

    /// Check a plaintext password against a stored hash
    pub async fn compare(&self, mut plain: String, hash: String) -> Result<bool, AppError> {
        let matched = tokio::task::spawn_blocking(move || {
            let ok = verify_password(&hash, &plain);
            plain.zeroize();
            ok
        })
        .await?;
        Ok(matched)
    }
}
