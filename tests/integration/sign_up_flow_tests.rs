// =========================================
// tests/integration/sign_up_flow_tests.rs
// =========================================
//! Integration tests for the registration flow
use axum::http::StatusCode;
use clubhouse_backend_lib::auth::verify_password;
use clubhouse_backend_lib::storage::UserStore;

use crate::test_utils::{body_string, location, sign_up_fields, spawn_app};

#[tokio::test]
async fn test_sign_up_form_renders() {
    let app = spawn_app();
    let response = app.get("/sign-up", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("action=\"/sign-up\""));
    assert!(body.contains("name=\"firstname\""));
    assert!(!body.contains("class=\"errors\""));
}

#[tokio::test]
async fn test_valid_sign_up_persists_hashed_user() {
    let app = spawn_app();
    let response = app.register("  Alice ", "s3cret!").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/"));

    let user = app
        .users
        .find_by_username("alice")
        .await
        .unwrap()
        .expect("user should be stored");
    assert_eq!(user.username, "alice");
    assert_eq!(user.first_name, "Alice");
    assert_eq!(user.membership, "member");
    assert!(!user.admin);
    assert_ne!(user.password_hash, "s3cret!");
    assert!(verify_password(&user.password_hash, "s3cret!"));
}

#[tokio::test]
async fn test_missing_username_rerenders_without_persisting() {
    let app = spawn_app();
    let mut fields = sign_up_fields("", "pw");
    fields.retain(|(name, _)| *name != "username");

    let response = app.post_form("/sign-up", &fields, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("<li data-field=\"username\">Username is required</li>"));
    assert!(app.users.is_empty());
}

#[tokio::test]
async fn test_invalid_fields_are_all_reported_and_echoed() {
    let app = spawn_app();
    let fields = vec![
        ("username", "usér"),
        ("password", "hunter2"),
        ("firstname", "J0hn"),
        ("lastname", "Smith"),
        ("membership", "member"),
        ("admin", "maybe"),
    ];

    let response = app.post_form("/sign-up", &fields, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("data-field=\"username\""));
    assert!(body.contains("ASCII"));
    assert!(body.contains("data-field=\"firstname\""));
    assert!(body.contains("alphabetic"));
    assert!(body.contains("data-field=\"admin\""));
    assert!(!body.contains("data-field=\"lastname\""));

    // Previous values come back; the password never does
    assert!(body.contains("value=\"usér\""));
    assert!(body.contains("value=\"J0hn\""));
    assert!(body.contains("value=\"Smith\""));
    assert!(!body.contains("hunter2"));
    assert!(app.users.is_empty());
}

#[tokio::test]
async fn test_markup_in_names_is_escaped_on_echo() {
    let app = spawn_app();
    let fields = vec![
        ("username", "bob"),
        ("password", "pw"),
        ("firstname", "<script>"),
        ("lastname", "Smith"),
        ("membership", "member"),
        ("admin", "false"),
    ];

    let body = body_string(app.post_form("/sign-up", &fields, None).await).await;
    assert!(!body.contains("<script>"));
    assert!(body.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn test_duplicate_username_is_a_conflict() {
    let app = spawn_app();
    let first = app.register("Alice", "pw-one").await;
    assert_eq!(first.status(), StatusCode::SEE_OTHER);

    let second = app.register("alice", "pw-two").await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = body_string(second).await;
    assert!(body.contains("USER_001"));

    assert_eq!(app.users.len(), 1);
    let user = app.users.find_by_username("ALICE").await.unwrap().unwrap();
    assert!(verify_password(&user.password_hash, "pw-one"));
}
