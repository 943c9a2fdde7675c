//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use crate::schema::LogLevel;
use casement_common::ConfigError;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_casement_config.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn load_from_unreadable_path_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_from_path(dir.path());
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[display]
width = 1280
title = "story"

[metrics.grid]
width = 10.0
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.display.width, 1280);
    assert_eq!(config.display.title, "story");
    assert_eq!(config.metrics.grid.width, 10.0);
    // Defaults preserved
    assert_eq!(config.display.height, 600);
    assert_eq!(config.metrics.grid.height, 16.0);
    assert_eq!(config.logging.level, LogLevel::Info);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_config_with_invalid_values_returns_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[layout]\nborder_width = 500\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.layout.border_width, 500);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("casement").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config, crate::CasementConfig::default());
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::CasementConfig;

    let config: CasementConfig = toml::from_str(&default_config_toml()).unwrap();
    assert_eq!(config.display.title, "casement");
    assert!(default_config_toml().contains(&format!(
        "# Schema version {}",
        crate::CONFIG_SCHEMA_VERSION
    )));
}

#[test]
fn default_config_path_is_reasonable() {
    // Some CI environments have no config dir.
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("casement"));
        assert!(path_str.ends_with("config.toml"));
    }
}
