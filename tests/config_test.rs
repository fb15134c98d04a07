//! Unit tests for config.rs module

use bmi_tracker::config::AppConfig;
use bmi_tracker::BmiError;
use config::{Config, File, FileFormat};
use std::path::PathBuf;

fn layered(toml: &str) -> Config {
    Config::builder()
        .add_source(Config::try_from(&AppConfig::default()).expect("defaults serialize"))
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .expect("config builds")
}

#[test]
fn test_default_config_values() {
    let config = AppConfig::default();

    assert_eq!(config.storage.data_file, "bmi_data.csv");
    assert_eq!(config.data_file(), PathBuf::from("bmi_data.csv"));
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file_path, None);
    assert_eq!(config.logging.format, "text");
    assert_eq!(config.display.decimals, 2);
}

#[test]
fn test_defaults_survive_empty_file() {
    let config = AppConfig::from_config(&layered("")).expect("valid");
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_file_overrides_defaults() {
    let config = AppConfig::from_config(&layered(
        r#"
        [storage]
        data_file = "/var/lib/bmi/records.csv"

        [logging]
        level = "debug"
        file_path = "/var/log/bmi"
        "#,
    ))
    .expect("valid");

    assert_eq!(config.data_file(), PathBuf::from("/var/lib/bmi/records.csv"));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.file_path.as_deref(), Some("/var/log/bmi"));
    assert_eq!(config.logging.format, "text");
    assert_eq!(config.display.decimals, 2);
}

#[test]
fn test_invalid_file_values_are_rejected() {
    let result = AppConfig::from_config(&layered("[logging]\nlevel = \"loud\"\n"));
    assert!(matches!(result, Err(BmiError::InvalidConfig(_))));
}

#[test]
fn test_config_validation_success() {
    assert!(AppConfig::default().validate().is_ok());
}

#[test]
fn test_config_validation_empty_data_file() {
    let mut config = AppConfig::default();
    config.storage.data_file = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_valid_log_levels() {
    for level in ["trace", "debug", "info", "warn", "error"] {
        let mut config = AppConfig::default();
        config.logging.level = level.to_string();
        assert!(config.validate().is_ok(), "Failed for level: {}", level);
    }
}

#[test]
fn test_config_validation_invalid_log_format() {
    let mut config = AppConfig::default();
    config.logging.format = "xml".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_decimals_range() {
    let mut config = AppConfig::default();
    config.display.decimals = 6;
    assert!(config.validate().is_ok());
    config.display.decimals = 7;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_serialization_roundtrip() {
    let config = AppConfig::default();
    let json = serde_json::to_string(&config).expect("serialize");
    let back: AppConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, config);
}
