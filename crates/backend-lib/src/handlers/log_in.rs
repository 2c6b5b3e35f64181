// ============================
// crates/backend-lib/src/handlers/log_in.rs
// ============================
//! Log-in handlers.
use super::session_cookie;
use crate::auth::AuthOutcome;
use crate::metrics::{LOGIN_FAILED, LOGIN_SUCCEEDED};
use crate::views;
use crate::{error::AppError, AppState};
use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use metrics::counter;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// Log-in form as submitted
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LogInForm {
    pub username: String,
    pub password: String,
}

/// Verify credentials; on success start a session and render the landing page
#[instrument(skip_all, fields(username = %form.username.trim()))]
pub async fn log_in(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LogInForm>,
) -> Result<Response, AppError> {
    let user = match state.auth.authenticate(&form.username, &form.password).await? {
        AuthOutcome::Authenticated(user) => user,
        AuthOutcome::Rejected(failure) => {
            info!(reason = failure.reason(), "log-in rejected");
            counter!(LOGIN_FAILED).increment(1);
            return Ok(Redirect::to(&state.settings.login_failure_redirect).into_response());
        },
    };

    let token = state.sessions.create(state.auth.serialize_user(&user)).await;
    let cookie = session_cookie(&state.settings, &token)
        .map_err(|e| AppError::Internal(format!("invalid session cookie: {e}")))?;

    info!(user_id = %user.id, "log-in succeeded");
    counter!(LOGIN_SUCCEEDED).increment(1);

    Ok((
        [(SET_COOKIE, cookie)],
        Html(views::index_page(Some(&user.profile()))),
    )
        .into_response())
}

/// Landing spot for rejected log-ins
pub async fn log_in_failed() -> Html<String> {
    Html(views::log_in_failed_page())
}
