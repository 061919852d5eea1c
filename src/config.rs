//! # Configuration Management
//!
//! Protocol constants and the TOML-backed settings that decide which header
//! the local side emits.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - TOML strings via `from_toml()`
//! - Direct instantiation with defaults
//!
//! The codec reads no environment variables. Any 16-bit version is accepted.

use crate::core::header::{Header, ProtocolMode};
use crate::error::{constants, HeaderError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Protocol family signature ("JRMI")
pub const SIGNATURE: [u8; 4] = [0x4A, 0x52, 0x4D, 0x49];

/// Version emitted by locally built headers
pub const PROTOCOL_VERSION: u16 = 2;

/// Signature + version + protocol mode
pub const HEADER_SIZE: usize = 7;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct CodecConfig {
    /// Header emitted when opening a connection
    #[serde(default)]
    pub header: HeaderConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CodecConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| HeaderError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_OPEN)))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| HeaderError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_READ)))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| HeaderError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_PARSE)))
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Serialize back to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            HeaderError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_SERIALIZE))
        })
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        // header values need no checks: every u16 version and every mode is valid
        self.logging.validate()
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(HeaderError::ConfigError(format!(
                "{}:\n  - {}",
                constants::ERR_CONFIG_VALIDATION,
                errors.join("\n  - ")
            )))
        }
    }
}

/// Values for the header this side sends
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct HeaderConfig {
    /// Protocol version field
    #[serde(default = "default_version")]
    pub version: u16,

    /// Transport sub-mode, one of `stream`, `single_op`, `multiplex`
    #[serde(default)]
    pub protocol_mode: ProtocolMode,
}

fn default_version() -> u16 {
    PROTOCOL_VERSION
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            version: PROTOCOL_VERSION,
            protocol_mode: ProtocolMode::default(),
        }
    }
}

impl HeaderConfig {
    /// Build the header described by this configuration
    pub fn to_header(&self) -> Header {
        Header::new(self.version, self.protocol_mode)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("rmi-header"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = level.as_str().to_ascii_lowercase();
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
