// ============================
// crates/backend-lib/src/handlers/sign_up.rs
// ============================
//! Registration handlers.
use crate::metrics::{SIGNUP_CREATED, SIGNUP_REJECTED};
use crate::validation::{validate_sign_up, SignUpForm};
use crate::views::{self, SignUpPage};
use crate::{error::AppError, AppState};
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Render an empty registration form
pub async fn sign_up_get() -> Html<String> {
    Html(views::sign_up_page(&SignUpPage::default()))
}

/// Validate, hash and persist a new user, then redirect home.
///
/// Validation failures re-render the form (200) and stop there. Store and
/// hashing failures, duplicate usernames included, go to the error page.
#[instrument(skip_all, fields(username = %form.username.trim()))]
pub async fn sign_up_post(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SignUpForm>,
) -> Result<Response, AppError> {
    let valid = match validate_sign_up(&form) {
        Ok(valid) => valid,
        Err(errors) => {
            debug!(count = errors.len(), "sign-up rejected by validation");
            counter!(SIGNUP_REJECTED).increment(1);
            let page = SignUpPage {
                username: form.username.trim().to_string(),
                firstname: form.firstname.trim().to_string(),
                lastname: form.lastname.trim().to_string(),
                errors,
            };
            return Ok(Html(views::sign_up_page(&page)).into_response());
        },
    };

    state.auth.register(valid).await?;
    counter!(SIGNUP_CREATED).increment(1);

    Ok(Redirect::to("/").into_response())
}
