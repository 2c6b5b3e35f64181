// ==========================
// tests/unit/config_tests.rs
// ==========================
//! Unit tests for the configuration module
use clubhouse_backend_lib::config::{LogFormat, Settings, StorageBackend};
use figment::Jail;
use std::path::PathBuf;

#[test]
fn test_settings_default() {
    let settings = Settings::default();

    assert_eq!(settings.bind_addr.to_string(), "127.0.0.1:3000");
    assert_eq!(settings.data_dir, PathBuf::from("data"));
    assert_eq!(settings.storage, StorageBackend::FlatFile);
    assert_eq!(settings.log_format, LogFormat::Text);
    assert_eq!(settings.session_cookie_name, "clubhouse.sid");
    assert_eq!(settings.login_failure_redirect, "/log-in/failed");
    assert!(!settings.session_cookie_secure);
}

#[test]
fn test_cookie_name_validation() {
    let mut settings = Settings::default();
    settings.session_cookie_name = "bad name;".to_string();
    assert!(settings.validate().is_err());

    settings.session_cookie_name = "club_house-1.sid".to_string();
    assert!(settings.validate().is_ok());
}

#[test]
fn test_load_config_from_custom_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "deploy.toml",
            r#"
            storage = "flat_file"
            data_dir = "/var/lib/clubhouse"
            log_format = "json"
            session_cookie_secure = true
            password_work_factor = 12
            login_failure_redirect = "/oops"
            "#,
        )?;

        let settings = Settings::load_from("deploy.toml").map_err(|e| e.to_string())?;
        assert_eq!(settings.data_dir, PathBuf::from("/var/lib/clubhouse"));
        assert_eq!(settings.log_format, LogFormat::Json);
        assert!(settings.session_cookie_secure);
        assert_eq!(settings.password_work_factor, 12);
        assert_eq!(settings.login_failure_redirect, "/oops");
        Ok(())
    });
}

#[test]
fn test_env_overrides() {
    Jail::expect_with(|jail| {
        jail.set_env("CLUBHOUSE_BIND_ADDR", "0.0.0.0:9000");
        jail.set_env("CLUBHOUSE_STORAGE", "memory");
        jail.set_env("CLUBHOUSE_SESSION_TTL_SECS", "60");

        let settings = Settings::load().map_err(|e| e.to_string())?;
        assert_eq!(settings.bind_addr.to_string(), "0.0.0.0:9000");
        assert_eq!(settings.storage, StorageBackend::Memory);
        assert_eq!(settings.session_ttl_secs, 60);
        Ok(())
    });
}

#[test]
fn test_malformed_file_is_an_error() {
    Jail::expect_with(|jail| {
        jail.create_file("clubhouse.toml", "storage = \"postgres\"")?;
        assert!(Settings::load().is_err());
        Ok(())
    });
}
