//! # Error Types
//!
//! Error handling for the handshake header codec.
//!
//! Decoding is the only fallible codec operation. Each way a header can be
//! rejected maps to its own variant so the connection layer can tell a peer
//! speaking another protocol apart from a connection that dropped mid-header.
//!
//! ## Error Categories
//! - **Protocol Errors**: wrong signature, unknown protocol mode
//! - **Truncation**: the byte source ended before the header was complete
//! - **I/O Errors**: the byte source itself failed
//! - **Configuration Errors**: unreadable or invalid TOML configuration
//!
//! ## Example Usage
//! ```rust
//! use rmi_header::core::header::Header;
//! use rmi_header::error::HeaderError;
//! use tracing::{error, warn};
//!
//! let wire = [0x4A, 0x52, 0x4D, 0x49, 0x00];
//! match Header::from_bytes(&wire) {
//!     Ok(_) => {}
//!     Err(HeaderError::TruncatedInput { field, .. }) => warn!(%field, "Peer hung up"),
//!     Err(e) => error!(error = %e, "Rejecting connection"),
//! }
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Configuration errors
    pub const ERR_CONFIG_OPEN: &str = "Failed to open config file";
    pub const ERR_CONFIG_READ: &str = "Failed to read config file";
    pub const ERR_CONFIG_PARSE: &str = "Failed to parse TOML";
    pub const ERR_CONFIG_SERIALIZE: &str = "Failed to serialize config";
    pub const ERR_CONFIG_VALIDATION: &str = "Configuration validation failed";

    /// Logging errors
    pub const ERR_LOG_FILTER: &str = "Invalid log filter directive";
}

/// The header field a decode step was reading when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
    /// Bytes 0..4
    Signature,
    /// Bytes 4..6
    Version,
    /// Byte 6
    ProtocolMode,
}

impl HeaderField {
    /// Number of wire bytes this field occupies.
    pub const fn width(self) -> usize {
        match self {
            HeaderField::Signature => 4,
            HeaderField::Version => 2,
            HeaderField::ProtocolMode => 1,
        }
    }

    /// Offset of the field from the start of the header.
    pub const fn offset(self) -> usize {
        match self {
            HeaderField::Signature => 0,
            HeaderField::Version => 4,
            HeaderField::ProtocolMode => 6,
        }
    }

    /// Error for a source that ran dry after `available` bytes of this field.
    pub const fn truncated(self, available: usize) -> HeaderError {
        HeaderError::TruncatedInput {
            field: self,
            needed: self.width(),
            available,
        }
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeaderField::Signature => "signature",
            HeaderField::Version => "version",
            HeaderField::ProtocolMode => "protocol mode",
        };
        f.write_str(name)
    }
}

// HeaderError is the error type for every fallible operation in the crate
#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("Invalid header signature: {0:02X?}")]
    InvalidSignature([u8; 4]),

    #[error("Invalid protocol mode: 0x{0:02X}")]
    InvalidProtocolMode(u8),

    #[error("Truncated input while reading {field}: needed {needed} bytes, got {available}")]
    TruncatedInput {
        field: HeaderField,
        needed: usize,
        available: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl HeaderError {
    /// Short stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            HeaderError::InvalidSignature(_) => "invalid_signature",
            HeaderError::InvalidProtocolMode(_) => "invalid_protocol_mode",
            HeaderError::TruncatedInput { .. } => "truncated_input",
            HeaderError::Io(_) => "io",
            HeaderError::ConfigError(_) => "config",
        }
    }
}

/// Type alias for Results using HeaderError
pub type Result<T> = std::result::Result<T, HeaderError>;
