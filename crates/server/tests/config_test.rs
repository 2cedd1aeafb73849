//! # Configuration Tests
//!
//! This file contains tests for the layered configuration loading logic: built-in
//! defaults, YAML files with `${VAR}` substitution, and environment overrides.

use onboard::constants::{DEFAULT_DOWNLOAD_FILE_NAME, DEFAULT_MODEL_CANDIDATES, GEMINI_API_BASE_URL};
use onboard_server::config::{get_config, ConfigError};
use std::env;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// A mutex to ensure that tests modifying the environment run sequentially.
// This is crucial because environment variables are a shared, global resource,
// and running tests in parallel (`cargo test` default) could cause them to interfere.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// A helper function to clear all environment variables used by `get_config`.
/// This ensures a clean slate before each test runs.
fn clear_env_vars() {
    env::remove_var("PORT");
    env::remove_var("GEMINI_API_KEY");
    env::remove_var("GEMINI_API_BASE_URL");
    env::remove_var("MODEL_CANDIDATES");
    env::remove_var("DOWNLOAD_FILE_NAME");
    env::remove_var("ONBOARD_PORT");
    env::remove_var("ONBOARD_MODEL_CANDIDATES");
    env::remove_var("ONBOARD_DOWNLOAD_FILE_NAME");
    env::remove_var("ONBOARD_TEST_SUBSTITUTED_KEY");
}

fn yaml_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp config file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp config file");
    file
}

#[test]
fn test_get_config_defaults() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();

    let config = get_config(None).expect("Configuration should load with defaults");

    assert_eq!(config.port, 9090);
    assert_eq!(config.gemini_api_key, None);
    assert_eq!(config.gemini_api_base_url, GEMINI_API_BASE_URL);
    assert_eq!(config.model_candidates, DEFAULT_MODEL_CANDIDATES.to_vec());
    assert_eq!(config.download_file_name, DEFAULT_DOWNLOAD_FILE_NAME);
}

#[test]
fn test_get_config_plain_env_vars() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();

    env::set_var("PORT", "9999");
    env::set_var("GEMINI_API_KEY", "test-api-key");

    let config = get_config(None).expect("Configuration should load successfully");

    assert_eq!(config.port, 9999);
    assert_eq!(config.gemini_api_key, Some("test-api-key".to_string()));

    clear_env_vars();
}

#[test]
fn test_get_config_blank_key_is_treated_as_missing() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();

    env::set_var("GEMINI_API_KEY", "   ");

    let config = get_config(None).expect("Configuration should load successfully");
    assert_eq!(config.gemini_api_key, None);

    clear_env_vars();
}

#[test]
fn test_get_config_prefixed_overrides() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();

    env::set_var("ONBOARD_PORT", "8181");
    env::set_var("ONBOARD_MODEL_CANDIDATES", "models/a, models/b,,gemini-c");
    env::set_var("ONBOARD_DOWNLOAD_FILE_NAME", "handbook.pdf");

    let config = get_config(None).expect("Configuration should load successfully");

    assert_eq!(config.port, 8181);
    assert_eq!(
        config.model_candidates,
        vec!["models/a", "models/b", "gemini-c"]
    );
    assert_eq!(config.download_file_name, "handbook.pdf");

    clear_env_vars();
}

#[test]
fn test_get_config_yaml_with_substitution() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();

    env::set_var("ONBOARD_TEST_SUBSTITUTED_KEY", "key-from-env");
    let file = yaml_file(
        r#"
port: 7070
gemini_api_key: "${ONBOARD_TEST_SUBSTITUTED_KEY}"
model_candidates:
  - models/only-one
"#,
    );

    let config = get_config(file.path().to_str()).expect("Configuration should load from YAML");

    assert_eq!(config.port, 7070);
    assert_eq!(config.gemini_api_key, Some("key-from-env".to_string()));
    assert_eq!(config.model_candidates, vec!["models/only-one"]);
    // Keys absent from the file keep their defaults.
    assert_eq!(config.download_file_name, DEFAULT_DOWNLOAD_FILE_NAME);

    clear_env_vars();
}

#[test]
fn test_get_config_unset_substitution_means_no_key() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();

    let file = yaml_file("gemini_api_key: \"${GEMINI_API_KEY}\"\n");

    let config = get_config(file.path().to_str()).expect("Configuration should load from YAML");
    assert_eq!(config.gemini_api_key, None);
}

#[test]
fn test_get_config_env_overrides_yaml() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();

    env::set_var("ONBOARD_PORT", "6060");
    let file = yaml_file("port: 7070\n");

    let config = get_config(file.path().to_str()).expect("Configuration should load from YAML");
    assert_eq!(config.port, 6060);

    clear_env_vars();
}

#[test]
fn test_get_config_invalid_port() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();

    env::set_var("PORT", "not-a-port");

    let result = get_config(None);
    assert!(matches!(result, Err(ConfigError::General(_))));

    clear_env_vars();
}

#[test]
fn test_get_config_missing_override_file() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();

    let result = get_config(Some("/nonexistent/onboard-config.yml"));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_config_error_messages() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();

    let err = get_config(Some("/nonexistent/onboard-config.yml")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Config file not found at '/nonexistent/onboard-config.yml'."
    );

    env::set_var("PORT", "not-a-port");
    let err: Box<dyn std::error::Error> = Box::new(get_config(None).unwrap_err());
    assert!(err.to_string().starts_with("Configuration error: "));

    clear_env_vars();
}
