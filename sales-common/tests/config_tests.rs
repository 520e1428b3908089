//! Tests for configuration loading and root folder resolution
//!
//! Tests that touch SALES_ROOT_FOLDER are marked #[serial] so they never
//! race on the process environment.

use sales_common::config::{
    CompiledDefaults, NumericPolicy, RootFolderInitializer, RootFolderResolver, TomlConfig,
    DEFAULT_PORT, ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_compiled_defaults_for_current_platform() {
    let defaults = CompiledDefaults::for_current_platform();

    assert!(!defaults.root_folder.as_os_str().is_empty());
    assert!(defaults.root_folder.ends_with("sales-etl") || defaults.root_folder.ends_with("sales_data"));
    assert_eq!(defaults.log_level, "info");
}

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let root_folder = RootFolderResolver::new().resolve();

    assert_eq!(root_folder, CompiledDefaults::for_current_platform().root_folder);
}

#[test]
#[serial]
fn test_resolver_env_var() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/sales-test-env-folder");

    let root_folder = RootFolderResolver::new().resolve();
    assert_eq!(root_folder, PathBuf::from("/tmp/sales-test-env-folder"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_cli_takes_precedence_over_env_and_config() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/sales-priority-env");
    let config = TomlConfig::from_toml_str("root_folder = \"/tmp/sales-priority-toml\"").unwrap();

    let root_folder = RootFolderResolver::new()
        .with_cli_arg(Some(PathBuf::from("/tmp/sales-priority-cli")))
        .with_config(&config)
        .resolve();
    assert_eq!(root_folder, PathBuf::from("/tmp/sales-priority-cli"));

    // Without a CLI argument the environment wins over TOML
    let root_folder = RootFolderResolver::new().with_config(&config).resolve();
    assert_eq!(root_folder, PathBuf::from("/tmp/sales-priority-env"));

    env::remove_var(ROOT_FOLDER_ENV);

    let root_folder = RootFolderResolver::new().with_config(&config).resolve();
    assert_eq!(root_folder, PathBuf::from("/tmp/sales-priority-toml"));
}

#[test]
fn test_full_toml_config() {
    let config = TomlConfig::from_toml_str(
        r#"
        database_path = "/data/sales.db"
        port = 8080
        numeric_policy = "reject"

        [[sources]]
        region = "A"
        path = "data/region_a.csv"

        [[sources]]
        region = "B"
        path = "data/region_b.csv"

        [logging]
        level = "debug"
        "#,
    )
    .unwrap();

    assert_eq!(config.database_path, Some(PathBuf::from("/data/sales.db")));
    assert_eq!(config.port(), 8080);
    assert_eq!(config.numeric_policy, NumericPolicy::Reject);
    assert_eq!(config.sources.len(), 2);
    assert_eq!(config.sources[0].region, "A");
    assert_eq!(config.sources[1].path, PathBuf::from("data/region_b.csv"));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_empty_toml_uses_defaults() {
    let config = TomlConfig::from_toml_str("").unwrap();

    assert_eq!(config.port(), DEFAULT_PORT);
    assert_eq!(config.numeric_policy, NumericPolicy::ZeroFill);
    assert!(config.sources.is_empty());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_invalid_toml_is_config_error() {
    let result = TomlConfig::from_toml_str("numeric_policy = \"sometimes\"");
    assert!(matches!(result, Err(sales_common::Error::Config(_))));
}

#[test]
fn test_missing_config_file_does_not_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("does-not-exist.toml");

    let config = TomlConfig::load_or_default(Some(&missing)).unwrap();
    assert_eq!(config.port(), DEFAULT_PORT);

    let config = TomlConfig::load_or_default(None).unwrap();
    assert!(config.sources.is_empty());
}

#[test]
fn test_config_file_loaded_from_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sales-etl.toml");
    std::fs::write(&path, "port = 9000\n").unwrap();

    let config = TomlConfig::load_or_default(Some(&path)).unwrap();
    assert_eq!(config.port(), 9000);
}

#[test]
fn test_initializer_database_path() {
    let root = PathBuf::from("/tmp/sales-test-root");
    let initializer = RootFolderInitializer::new(root.clone());

    assert_eq!(initializer.database_path(), root.join("sales.db"));
    assert!(!initializer.database_exists());
}

#[test]
fn test_initializer_idempotent_directory_creation() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("root");
    let initializer = RootFolderInitializer::new(root.clone());

    assert!(initializer.ensure_directory_exists().is_ok());
    assert!(initializer.ensure_directory_exists().is_ok());
    assert!(root.is_dir());
}
