// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod local;
pub mod password;
mod service;
mod service_impl;
pub mod session;

pub use local::{AuthFailure, AuthOutcome, LocalStrategy};
pub use password::{hash_password, verify_password, CredentialHasher};
pub use service::AuthService;
pub use service_impl::DefaultAuth;
pub use session::{Session, SessionManager, MAX_SESSION_TTL, SESSION_TTL};
