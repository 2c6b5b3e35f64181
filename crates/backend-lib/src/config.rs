// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::password::{DEFAULT_WORK_FACTOR, MAX_WORK_FACTOR, MIN_WORK_FACTOR};
use crate::auth::MAX_SESSION_TTL;

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "clubhouse.toml";

/// Prefix for environment overrides, e.g. `CLUBHOUSE_BIND_ADDR`
pub const ENV_PREFIX: &str = "CLUBHOUSE_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Which user store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Users live in process memory and vanish on restart
    Memory,
    /// One JSON file per user under `data_dir`
    FlatFile,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Text,
    Json,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Data directory path (flat-file store)
    pub data_dir: PathBuf,
    /// User store backend
    pub storage: StorageBackend,
    /// Log level
    pub log_level: String,
    /// Log format
    pub log_format: LogFormat,
    /// Session TTL in seconds
    pub session_ttl_secs: u64,
    /// Name of the session cookie
    pub session_cookie_name: String,
    /// Add `Secure` to the session cookie (set when served over HTTPS)
    pub session_cookie_secure: bool,
    /// Password hashing cost, as a log2 work factor
    pub password_work_factor: u8,
    /// Where a failed log-in is redirected
    pub login_failure_redirect: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_dir: PathBuf::from("data"),
            storage: StorageBackend::FlatFile,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            session_ttl_secs: 60 * 60 * 24 * 7, // 7 days
            session_cookie_name: "clubhouse.sid".to_string(),
            session_cookie_secure: false,
            password_work_factor: DEFAULT_WORK_FACTOR,
            login_failure_redirect: "/log-in/failed".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `clubhouse.toml` and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load settings from the given TOML file (if present), then the environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            bail!("invalid log level: {}", self.log_level);
        }
        if self.session_ttl_secs == 0 || self.session_ttl_secs > MAX_SESSION_TTL.as_secs() {
            bail!(
                "session_ttl_secs must be between 1 and {}",
                MAX_SESSION_TTL.as_secs()
            );
        }
        if !(MIN_WORK_FACTOR..=MAX_WORK_FACTOR).contains(&self.password_work_factor) {
            bail!(
                "password_work_factor must be between {MIN_WORK_FACTOR} and {MAX_WORK_FACTOR}"
            );
        }
        if !self.login_failure_redirect.starts_with('/') || self.login_failure_redirect.contains('?')
        {
            bail!(
                "login_failure_redirect must be an absolute path without a query: {}",
                self.login_failure_redirect
            );
        }
        // Route pattern syntax would not register as a literal path
        if self
            .login_failure_redirect
            .contains(|c| matches!(c, ':' | '{' | '}' | '*'))
        {
            bail!(
                "login_failure_redirect must be a literal path: {}",
                self.login_failure_redirect
            );
        }
        // These already answer GET
        if ["/", "/sign-up"].contains(&self.login_failure_redirect.as_str()) {
            bail!(
                "login_failure_redirect clashes with an existing page: {}",
                self.login_failure_redirect
            );
        }
        if self.session_cookie_name.is_empty()
            || !self
                .session_cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            bail!("invalid session_cookie_name: {:?}", self.session_cookie_name);
        }
        Ok(())
    }

    /// Session lifetime
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}
