//! Unit tests for configuration loading and graceful degradation
//!
//! Tests the implementation of:
//! - Missing TOML files SHALL NOT cause termination (defaults are used)
//! - Environment variables override TOML values
//! - Malformed TOML is reported as a configuration error
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate HOUSING_* variables are marked with #[serial].

use housing_common::config::HousingConfig;
use housing_common::Error;
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};

fn clear_env() {
    for var in [
        "HOUSING_CONFIG",
        "HOUSING_HOST",
        "HOUSING_PORT",
        "HOUSING_DATA_FOLDER",
        "HOUSING_MODEL_PATH",
        "HOUSING_LOG_LEVEL",
    ] {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_missing_explicit_file_uses_defaults() {
    clear_env();
    let config = HousingConfig::load(Some(Path::new("/nonexistent/housing.toml"))).unwrap();
    assert_eq!(config, HousingConfig::default());
}

#[test]
#[serial]
fn test_toml_file_is_loaded() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
        [server]
        host = "127.0.0.1"
        port = 8100

        [storage]
        default_collection = "raw"

        [logging]
        level = "info"
        "#,
    )
    .unwrap();

    let config = HousingConfig::load(Some(path.as_path())).unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8100);
    assert_eq!(config.storage.default_collection, "raw");
    assert_eq!(config.storage.default_db_name, "housing");
    assert_eq!(config.logging.level, "info");
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[server]\nport = 8100\n").unwrap();

    env::set_var("HOUSING_PORT", "9100");
    env::set_var("HOUSING_DATA_FOLDER", "/tmp/housing-test-data");
    let config = HousingConfig::load(Some(path.as_path())).unwrap();

    assert_eq!(config.server.port, 9100);
    assert_eq!(
        config.predictions_db_path(),
        PathBuf::from("/tmp/housing-test-data/predictions.db")
    );

    clear_env();
}

#[test]
#[serial]
fn test_config_env_var_locates_file() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("from-env.toml");
    std::fs::write(&path, "[model]\npath = \"/opt/models/linear.json\"\n").unwrap();

    env::set_var("HOUSING_CONFIG", &path);
    let config = HousingConfig::load(None).unwrap();
    assert_eq!(config.model_path(), PathBuf::from("/opt/models/linear.json"));

    clear_env();
}

#[test]
#[serial]
fn test_invalid_port_env_is_config_error() {
    clear_env();
    env::set_var("HOUSING_PORT", "not-a-port");
    let result = HousingConfig::load(Some(Path::new("/nonexistent/housing.toml")));
    assert!(matches!(result, Err(Error::Config(_))));
    clear_env();
}

#[test]
#[serial]
fn test_malformed_file_is_config_error() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[server\nport = ").unwrap();

    let result = HousingConfig::load(Some(path.as_path()));
    assert!(matches!(result, Err(Error::Config(_))));
}
