//! Loading `AppConfig` from `config/default.toml` plus environment overrides,
//! and the checks `validate` applies before the server starts.

use std::env;
use std::sync::Mutex;

use it_assets::config::AppConfig;
use once_cell::sync::Lazy;

static SERIALIZE: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

const MANAGED_VARS: [&str; 9] = [
    "DATABASE_URL",
    "JWT_SECRET",
    "PUBLIC_URL",
    "APP_PORT",
    "APP_ENVIRONMENT",
    "APP_DATABASE__MAX_CONNECTIONS",
    "REPAIR_UTC_OFFSET_MINUTES",
    "SECURITY_METRICS_ADMIN_TOKEN",
    "LOGGING_JSON_FORMAT",
];

fn cleanup_env_vars() {
    for var in MANAGED_VARS {
        env::remove_var(var);
    }
}

#[test]
fn defaults_come_from_the_toml_file() {
    let _lock = SERIALIZE.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let config = AppConfig::from_env().expect("load config");

    assert_eq!(config.port, 8080);
    assert_eq!(config.repair.utc_offset_minutes, 480);
    assert_eq!(config.repair.max_allocation_attempts, 5);
    assert!(config.logging.json_format);
    assert_eq!(config.security.metrics_admin_token, None);
}

#[test]
fn section_prefixed_variables_override_nested_keys() {
    let _lock = SERIALIZE.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    env::set_var("DATABASE_URL", "postgres://test-host/testdb");
    env::set_var("REPAIR_UTC_OFFSET_MINUTES", "60");
    env::set_var("LOGGING_JSON_FORMAT", "false");
    env::set_var("APP_DATABASE__MAX_CONNECTIONS", "3");

    let config = AppConfig::from_env().expect("load config");
    cleanup_env_vars();

    assert_eq!(config.database.url, "postgres://test-host/testdb");
    assert_eq!(config.database.max_connections, 3);
    assert_eq!(config.repair.utc_offset_minutes, 60);
    assert!(!config.logging.json_format);
}

#[test]
fn blank_admin_token_is_treated_as_unset() {
    let _lock = SERIALIZE.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    env::set_var("SECURITY_METRICS_ADMIN_TOKEN", "   ");
    let config = AppConfig::from_env().expect("load config");
    cleanup_env_vars();

    assert_eq!(config.security.metrics_admin_token, None);
}

#[test]
fn placeholder_secret_fails_validation() {
    let _lock = SERIALIZE.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let config = AppConfig::from_env().expect("load config");
    assert!(config.validate().is_err());
}

#[test]
fn real_secret_and_absolute_url_pass_validation() {
    let _lock = SERIALIZE.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    env::set_var("JWT_SECRET", "a-long-random-secret");
    env::set_var("PUBLIC_URL", "https://assets.example.com/");
    let config = AppConfig::from_env().expect("load config");
    cleanup_env_vars();

    assert_eq!(config.public_url, "https://assets.example.com");
    config.validate().expect("valid config");
}

#[test]
fn relative_public_url_fails_validation() {
    let _lock = SERIALIZE.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    env::set_var("JWT_SECRET", "a-long-random-secret");
    env::set_var("PUBLIC_URL", "assets.example.com");
    let config = AppConfig::from_env().expect("load config");
    cleanup_env_vars();

    assert!(config.validate().is_err());
}
