//! Integration tests for configuration loading and validation

#![allow(clippy::expect_used, clippy::unwrap_used)]

use rmi_header::config::{CodecConfig, HeaderConfig, LoggingConfig, PROTOCOL_VERSION};
use rmi_header::{HeaderError, ProtocolMode};
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::Level;

#[test]
fn test_default_config_validates() {
    let config = CodecConfig::default();
    let errors = config.validate();
    assert!(
        errors.is_empty(),
        "Default config should be valid, but got errors: {:?}",
        errors
    );
}

#[test]
fn test_default_header_matches_protocol() {
    let header = HeaderConfig::default().to_header();
    assert_eq!(header.version(), PROTOCOL_VERSION);
    assert_eq!(header.protocol_mode(), ProtocolMode::Stream);
    assert_eq!(header.encode(), [0x4A, 0x52, 0x4D, 0x49, 0x00, 0x02, 0x4B]);
}

#[test]
fn test_parse_full_toml() {
    let config = CodecConfig::from_toml(
        r#"
        [header]
        version = 1
        protocol_mode = "multiplex"

        [logging]
        app_name = "registry-probe"
        log_level = "debug"
        json_format = true
        "#,
    )
    .expect("valid toml");

    assert_eq!(config.header.version, 1);
    assert_eq!(config.header.protocol_mode, ProtocolMode::Multiplex);
    assert_eq!(config.logging.app_name, "registry-probe");
    assert_eq!(config.logging.log_level, Level::DEBUG);
    assert!(config.logging.json_format);
}

#[test]
fn test_missing_sections_use_defaults() {
    let config = CodecConfig::from_toml("[header]\nprotocol_mode = \"single_op\"\n").unwrap();
    assert_eq!(config.header.version, PROTOCOL_VERSION);
    assert_eq!(config.header.protocol_mode, ProtocolMode::SingleOp);
    assert_eq!(config.logging, LoggingConfig::default());
}

#[test]
fn test_any_version_is_accepted() {
    let config = CodecConfig::from_toml("[header]\nversion = 65535\n").unwrap();
    assert_eq!(config.header.to_header().version(), u16::MAX);
    assert!(config.validate().is_empty());
}

#[test]
fn test_unknown_protocol_mode_rejected() {
    let err = CodecConfig::from_toml("[header]\nprotocol_mode = \"datagram\"\n").unwrap_err();
    assert!(matches!(err, HeaderError::ConfigError(msg) if msg.contains("Failed to parse TOML")));
}

#[test]
fn test_out_of_range_version_rejected() {
    assert!(CodecConfig::from_toml("[header]\nversion = 70000\n").is_err());
}

#[test]
fn test_invalid_log_level_rejected() {
    let err = CodecConfig::from_toml("[logging]\nlog_level = \"loud\"\n").unwrap_err();
    assert!(err.to_string().contains("Invalid log level"));
}

#[test]
fn test_empty_app_name() {
    let mut config = CodecConfig::default();
    config.logging.app_name = String::new();

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("cannot be empty")));
    assert!(config.validate_strict().is_err());
}

#[test]
fn test_long_app_name() {
    let mut config = CodecConfig::default();
    config.logging.app_name = "x".repeat(65);

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("Application name too long")));
}

#[test]
fn test_example_config_roundtrip() {
    let example = CodecConfig::example_config();
    let parsed = CodecConfig::from_toml(&example).expect("example parses");
    assert_eq!(parsed, CodecConfig::default());
}

#[test]
fn test_from_file() {
    let mut config = CodecConfig::default();
    config.header.protocol_mode = ProtocolMode::SingleOp;
    config.header.version = 9;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(config.to_toml().unwrap().as_bytes()).unwrap();

    let loaded = CodecConfig::from_file(file.path()).expect("load config");
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file() {
    let err = CodecConfig::from_file("/nonexistent/rmi-header.toml").unwrap_err();
    assert!(matches!(err, HeaderError::ConfigError(msg) if msg.contains("Failed to open")));
}
