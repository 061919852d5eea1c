//! # rmi-header
//!
//! Codec for the handshake header a remote method invocation client sends
//! before any call traffic: a 4-byte `JRMI` signature, a big-endian 16-bit
//! version and a one-byte protocol mode.
//!
//! ```rust
//! use rmi_header::{Header, ProtocolMode};
//!
//! let header = Header::new(2, ProtocolMode::Stream);
//! let wire = header.encode();
//! assert_eq!(wire, [0x4A, 0x52, 0x4D, 0x49, 0x00, 0x02, 0x4B]);
//!
//! let decoded = Header::from_bytes(&wire).unwrap();
//! assert_eq!(decoded, header);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod utils;

pub use crate::config::{HEADER_SIZE, PROTOCOL_VERSION, SIGNATURE};
pub use crate::core::codec::HeaderCodec;
pub use crate::core::header::{Header, ProtocolMode};
pub use crate::core::stream::{read_header, write_header};
pub use crate::error::{HeaderError, HeaderField, Result};
