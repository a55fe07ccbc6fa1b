//! Tests for layered Settings loading

use std::path::PathBuf;

use tempfile::TempDir;

use loantree::application::ApplicationError;
use loantree::config::{IdStyle, Settings};
use loantree::domain::Direction;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("loantree.toml");
    std::fs::write(&path, content).expect("write config");
    path
}

#[test]
fn given_partial_config_file_when_loading_then_merges_over_defaults() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write_config(
        &temp,
        r#"
[ids]
style = "sequential"
prefix = "x"

[layout]
direction = "LR"
node_sep = 40
"#,
    );

    // Act
    let settings = Settings::load(Some(&path)).unwrap();

    // Assert
    assert_eq!(settings.ids.style, IdStyle::Sequential);
    assert_eq!(settings.ids.prefix, "x");
    assert_eq!(settings.ids.length, 8);
    assert_eq!(settings.layout.direction, Direction::LeftRight);
    assert_eq!(settings.layout.node_sep, 40.0);
    assert_eq!(settings.layout.node_width, 150.0);
    assert!(settings.export.pretty);
    assert_eq!(settings.export.file_prefix, "loan-tree");
}

#[test]
fn given_schema_with_tilde_when_loading_then_expanded() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "schema = \"~/types.toml\"\n");

    let settings = Settings::load(Some(&path)).unwrap();

    let home = std::env::var("HOME").expect("HOME should be set");
    let schema = settings.schema.unwrap();
    assert!(schema.to_string_lossy().starts_with(&home));
    assert!(schema.ends_with("types.toml"));
}

#[test]
fn given_missing_explicit_file_when_loading_then_config_error() {
    let temp = TempDir::new().unwrap();

    let result = Settings::load(Some(&temp.path().join("absent.toml")));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_malformed_value_when_loading_then_config_error() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "[layout]\ndirection = \"diagonal\"\n");

    let result = Settings::load(Some(&path));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_loaded_settings_when_rendering_toml_then_round_trips() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "[export]\ninclude_positions = true\n");
    let settings = Settings::load(Some(&path)).unwrap();

    let rendered = settings.to_toml().unwrap();
    let reparsed: Settings = toml::from_str(&rendered).unwrap();

    assert_eq!(reparsed, settings);
}
