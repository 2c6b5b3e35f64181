// =============================
// tests/unit/password_tests.rs
// =============================
//! Unit tests for credential hashing
use clubhouse_backend_lib::auth::password::{MIN_WORK_FACTOR, DEFAULT_WORK_FACTOR};
use clubhouse_backend_lib::auth::{hash_password, verify_password, CredentialHasher};

#[test]
fn test_password_hashing_and_verification() {
    let password = "SecureP@ssw0rd";
    let hash = hash_password(password, MIN_WORK_FACTOR).unwrap();

    // Hash should be different than the original password
    assert_ne!(password, hash);
    assert!(!hash.contains(password));

    assert!(verify_password(&hash, password));
    assert!(!verify_password(&hash, "securep@ssw0rd"));
}

#[test]
fn test_default_work_factor() {
    assert_eq!(CredentialHasher::default().work_factor(), DEFAULT_WORK_FACTOR);
    assert_eq!(DEFAULT_WORK_FACTOR, 10);

    let hash = hash_password("pw", DEFAULT_WORK_FACTOR).unwrap();
    assert!(hash.contains("ln=10"));
}

#[tokio::test]
async fn test_hasher_salts_every_hash() {
    let hasher = CredentialHasher::new(MIN_WORK_FACTOR);
    let first = hasher.hash("correct horse".to_string()).await.unwrap();
    let second = hasher.hash("correct horse".to_string()).await.unwrap();

    assert_ne!(first, second);
    assert!(hasher
        .compare("correct horse".to_string(), first)
        .await
        .unwrap());
    assert!(hasher
        .compare("correct horse".to_string(), second)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_compare_against_garbage_hash() {
    let hasher = CredentialHasher::new(MIN_WORK_FACTOR);
    assert!(!hasher
        .compare("pw".to_string(), "plaintext-not-a-hash".to_string())
        .await
        .unwrap());
}
