//! Integration tests for configuration management
//!
//! These tests verify that the Config struct can be loaded from disk,
//! validated, and that partial files fall back to defaults.

use cocomo_engine::config::Config;
use sdk::errors::EngineError;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_toml_parsing() {
    let toml_content = r#"
[core]
log_level = "info"

[estimation]
cost_per_person_month = 12500.0
fp_to_size_ratio = 53.0

[simulation]
default_iterations = 500
max_iterations = 20000
parallel = false
seed = 42

[model]
basic_path = "/opt/models/basic.json"
"#;

    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, toml_content).unwrap();

    let config = Config::load_from_path(&path).unwrap();
    assert_eq!(config.core.log_level, "info");
    assert_eq!(config.estimation.cost_per_person_month, 12500.0);
    assert_eq!(config.estimation.fp_to_size_ratio, 53.0);
    assert_eq!(config.simulation.default_iterations, 500);
    assert_eq!(config.simulation.max_iterations, 20000);
    assert!(!config.simulation.parallel);
    assert_eq!(config.simulation.seed, Some(42));
    assert_eq!(
        config.model.basic_path.as_deref(),
        Some(std::path::Path::new("/opt/models/basic.json"))
    );
    assert!(config.model.advanced_path.is_none());
}

#[test]
fn test_partial_config_uses_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "[simulation]\nseed = 7\n").unwrap();

    let config = Config::load_from_path(&path).unwrap();
    assert_eq!(config.core.log_level, "warn");
    assert_eq!(config.estimation.cost_per_person_month, 10_000.0);
    assert_eq!(config.simulation.default_iterations, 1000);
    assert_eq!(config.simulation.seed, Some(7));
}

#[test]
fn test_invalid_log_level_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "[core]\nlog_level = \"loud\"\n").unwrap();

    let result = Config::load_from_path(&path);
    assert!(matches!(result, Err(EngineError::Config(_))));
}

#[test]
fn test_iteration_cap_below_default_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(
        &path,
        "[simulation]\ndefault_iterations = 1000\nmax_iterations = 10\n",
    )
    .unwrap();

    let result = Config::load_from_path(&path);
    assert!(matches!(result, Err(EngineError::Config(_))));
}

#[test]
fn test_malformed_toml_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "[core\nlog_level = ").unwrap();

    let result = Config::load_from_path(&path);
    assert!(matches!(result, Err(EngineError::Config(_))));
}

#[test]
fn test_missing_file_rejected() {
    let temp = TempDir::new().unwrap();
    let result = Config::load_from_path(&temp.path().join("absent.toml"));
    assert!(matches!(result, Err(EngineError::Config(_))));
}

#[test]
fn test_written_config_reloads() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");

    let mut config = Config::default();
    config.simulation.seed = Some(99);
    config.estimation.cost_per_person_month = 8000.0;
    fs::write(&path, config.to_toml().unwrap()).unwrap();

    let reloaded = Config::load_from_path(&path).unwrap();
    assert_eq!(reloaded, config);
}
