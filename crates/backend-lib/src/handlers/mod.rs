// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers and the session cookie plumbing they share.

pub mod index;
pub mod log_in;
pub mod sign_up;

pub use index::{index, log_out};
pub use log_in::{log_in, log_in_failed};
pub use sign_up::{sign_up_get, sign_up_post};

use crate::{config::Settings, error::AppError, AppState};
use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use clubhouse_common::User;

/// Build a `HttpOnly` cookie carrying the session token
pub(crate) fn session_cookie(
    settings: &Settings,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        settings.session_cookie_name, settings.session_ttl_secs
    );
    if settings.session_cookie_secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Build a cookie that expires the session cookie immediately
pub(crate) fn clear_session_cookie(settings: &Settings) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        settings.session_cookie_name
    );
    if settings.session_cookie_secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Pull the session token out of the `Cookie` header(s)
pub(crate) fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// The signed-in user for this request.
///
/// A token whose user no longer exists is destroyed and treated as no session.
pub(crate) async fn current_user(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<User>, AppError> {
    let Some(token) = extract_session_token(headers, &state.settings.session_cookie_name) else {
        return Ok(None);
    };
    let Some(user_id) = state.sessions.resolve(&token).await else {
        return Ok(None);
    };
    match state.auth.deserialize_user(&user_id).await {
        Ok(user) => Ok(Some(user)),
        Err(AppError::UserNotFound(_)) => {
            tracing::warn!(%user_id, "session refers to a missing user");
            state.sessions.destroy(&token).await;
            Ok(None)
        },
        Err(e) => Err(e),
    }
}
