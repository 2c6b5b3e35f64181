// ========================================
// tests/integration/log_in_flow_tests.rs
// ========================================
//! Integration tests for local log-in
use axum::http::{header::SET_COOKIE, StatusCode};
use clubhouse_backend_lib::auth::{AuthFailure, AuthOutcome};

use crate::test_utils::{
    body_string, cookie_pair, location, send_form, sign_up_fields, spawn_app, spawn_flat_file_app,
};

#[tokio::test]
async fn test_unknown_username_redirects_to_failure_page() {
    let app = spawn_app();
    let response = app.log_in("nobody", "pw").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/log-in/failed"));
    assert!(response.headers().get(SET_COOKIE).is_none());

    let outcome = app.state.auth.authenticate("nobody", "pw").await.unwrap();
    match outcome {
        AuthOutcome::Rejected(failure) => {
            assert_eq!(failure, AuthFailure::UnknownUsername);
            assert_eq!(failure.reason(), "Incorrect username");
        },
        AuthOutcome::Authenticated(_) => panic!("unknown user must not authenticate"),
    }
}

#[tokio::test]
async fn test_wrong_password_redirects_to_failure_page() {
    let app = spawn_app();
    app.register("alice", "right-password").await;

    let response = app.log_in("alice", "wrong-password").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/log-in/failed"));
    assert!(response.headers().get(SET_COOKIE).is_none());

    match app.state.auth.authenticate("alice", "wrong-password").await.unwrap() {
        AuthOutcome::Rejected(failure) => assert_eq!(failure.reason(), "Incorrect password"),
        AuthOutcome::Authenticated(_) => panic!("wrong password must not authenticate"),
    }
}

#[tokio::test]
async fn test_failure_page_does_not_say_which_part_was_wrong() {
    let app = spawn_app();
    let response = app.get("/log-in/failed", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Incorrect username or password"));
    assert!(body.contains("action=\"/log-in\""));
}

#[tokio::test]
async fn test_successful_log_in_renders_profile_and_sets_cookie() {
    let app = spawn_app();
    app.register("alice", "s3cret").await;

    // Username lookup ignores case and surrounding whitespace
    let response = app.log_in(" ALICE ", "s3cret").await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("session cookie should be set");
    assert!(cookie.starts_with("clubhouse.sid="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));

    let user = match app.state.auth.authenticate("alice", "s3cret").await.unwrap() {
        AuthOutcome::Authenticated(user) => user,
        AuthOutcome::Rejected(failure) => panic!("expected success, got {failure:?}"),
    };

    let body = body_string(response).await;
    assert!(body.contains("Welcome back, Alice Liddell"));
    assert!(body.contains(&user.id.to_string()));
    assert!(body.contains("<dd class=\"username\">alice</dd>"));
    assert!(!body.contains(&user.password_hash));
    assert!(!body.contains("$scrypt$"));
}

#[tokio::test]
async fn test_empty_credentials_are_rejected() {
    let app = spawn_app();
    app.register("alice", "s3cret").await;

    let response = app.log_in("", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/log-in/failed"));
}

#[tokio::test]
async fn test_long_usernames_on_flat_file_store() {
    let (_state, router, _temp_dir) = spawn_flat_file_app();
    let long = "a".repeat(200);

    let response = send_form(
        &router,
        "/log-in",
        &[("username", long.as_str()), ("password", "pw")],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/log-in/failed"));

    let response = send_form(&router, "/sign-up", &sign_up_fields(&long, "pw"), None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/"));

    let response = send_form(
        &router,
        "/log-in",
        &[("username", long.as_str()), ("password", "pw")],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(cookie_pair(&response).is_some());
}
