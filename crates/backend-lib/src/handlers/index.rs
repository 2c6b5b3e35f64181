// ============================
// crates/backend-lib/src/handlers/index.rs
// ============================
//! Landing page and log-out.
use super::{clear_session_cookie, current_user, extract_session_token};
use crate::views;
use crate::{error::AppError, AppState};
use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;

/// Landing page; shows the signed-in user's profile when there is one
pub async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    let profile = current_user(&state, &headers).await?.map(|user| user.profile());
    Ok(Html(views::index_page(profile.as_ref())))
}

/// End the session and go home
pub async fn log_out(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if let Some(token) = extract_session_token(&headers, &state.settings.session_cookie_name)
    {
        state.sessions.destroy(&token).await;
    }
    let cookie = clear_session_cookie(&state.settings)
        .map_err(|e| AppError::Internal(format!("invalid session cookie: {e}")))?;
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}
