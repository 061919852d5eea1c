//! # Handshake Header
//!
//! The 7-byte preamble a stream client writes before any call traffic.
//!
//! ## Wire Format
//! ```text
//! ┌────────────┬──────────┬───────────────┐
//! │ Signature  │ Version  │ Protocol mode │
//! │ 4 bytes    │ 2 bytes  │ 1 byte        │
//! │ "JRMI"     │ uint16 BE│ 0x4B/4C/4D    │
//! └────────────┴──────────┴───────────────┘
//! ```
//!
//! Decoding validates every field and reads the source strictly in order,
//! never past the seventh byte. Encoding trusts the [`Header`] it is given
//! and cannot fail.

use crate::config::{HEADER_SIZE, PROTOCOL_VERSION, SIGNATURE};
use crate::error::{HeaderError, HeaderField, Result};
use bytes::BufMut;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{ErrorKind, Read};
use tracing::{debug, trace};

/// Transport sub-mode announced by the connecting peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ProtocolMode {
    /// Call traffic flows over the same connection for its whole lifetime
    #[default]
    Stream = 0x4B,
    /// One call per connection, typically tunnelled
    SingleOp = 0x4C,
    /// Several virtual connections share the socket
    Multiplex = 0x4D,
}

impl ProtocolMode {
    /// Get the identifier byte for the wire
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Detect mode from identifier byte
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x4B => Some(ProtocolMode::Stream),
            0x4C => Some(ProtocolMode::SingleOp),
            0x4D => Some(ProtocolMode::Multiplex),
            _ => None,
        }
    }

    /// Get human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            ProtocolMode::Stream => "StreamProtocol",
            ProtocolMode::SingleOp => "SingleOpProtocol",
            ProtocolMode::Multiplex => "MultiplexProtocol",
        }
    }
}

impl fmt::Display for ProtocolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for ProtocolMode {
    type Error = HeaderError;

    fn try_from(byte: u8) -> Result<Self> {
        Self::from_byte(byte).ok_or(HeaderError::InvalidProtocolMode(byte))
    }
}

impl From<ProtocolMode> for u8 {
    fn from(mode: ProtocolMode) -> u8 {
        mode.as_byte()
    }
}

/// Decoded or locally assembled handshake header.
///
/// Fields are read-only once built. A header obtained from [`Header::decode`]
/// always carries the protocol signature and a known [`ProtocolMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
    signature: [u8; 4],
    version: u16,
    protocol_mode: ProtocolMode,
}

impl Default for Header {
    fn default() -> Self {
        Self::new(PROTOCOL_VERSION, ProtocolMode::default())
    }
}

impl Header {
    /// Build a header carrying the protocol signature.
    pub const fn new(version: u16, protocol_mode: ProtocolMode) -> Self {
        Self {
            signature: SIGNATURE,
            version,
            protocol_mode,
        }
    }

    /// Build a header with a caller-chosen signature.
    ///
    /// The signature is emitted verbatim by [`Header::encode`]. Anything other
    /// than [`SIGNATURE`] will be rejected by a conforming peer.
    pub const fn with_signature(
        signature: [u8; 4],
        version: u16,
        protocol_mode: ProtocolMode,
    ) -> Self {
        Self {
            signature,
            version,
            protocol_mode,
        }
    }

    pub const fn signature(&self) -> [u8; 4] {
        self.signature
    }

    pub const fn version(&self) -> u16 {
        self.version
    }

    pub const fn protocol_mode(&self) -> ProtocolMode {
        self.protocol_mode
    }

    /// Read and validate a header from a byte source.
    ///
    /// Consumes exactly [`HEADER_SIZE`] bytes on success. On failure the source
    /// has already given up some of those bytes and is no longer positioned on
    /// a record boundary; the caller should drop the connection.
    ///
    /// # Errors
    /// - [`HeaderError::InvalidSignature`] if the first 4 bytes are not `JRMI`
    /// - [`HeaderError::InvalidProtocolMode`] if byte 6 is not a known mode
    /// - [`HeaderError::TruncatedInput`] if the source ends early
    /// - [`HeaderError::Io`] if the source itself fails
    pub fn decode<R: Read + ?Sized>(source: &mut R) -> Result<Self> {
        let header = decode_fields(source);
        match &header {
            Ok(h) => trace!(version = h.version, mode = %h.protocol_mode, "Decoded header"),
            Err(e) => debug!(kind = e.kind(), error = %e, "Header rejected"),
        }
        header
    }

    /// Decode from the front of a byte slice. Bytes past the header are ignored.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = data;
        Self::decode(&mut cursor)
    }

    /// Serialize to the 7-byte wire form.
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&self.signature);
        buf[4..6].copy_from_slice(&self.version.to_be_bytes());
        buf[6] = self.protocol_mode.as_byte();
        buf
    }

    /// Append the wire form to `buf`.
    pub fn encode_into<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(&self.signature);
        buf.put_u16(self.version);
        buf.put_u8(self.protocol_mode.as_byte());
    }
}

fn decode_fields<R: Read + ?Sized>(source: &mut R) -> Result<Header> {
    let signature = decode_signature(source)?;
    let version = decode_version(source)?;
    let protocol_mode = decode_protocol_mode(source)?;
    Ok(Header {
        signature,
        version,
        protocol_mode,
    })
}

fn decode_signature<R: Read + ?Sized>(source: &mut R) -> Result<[u8; 4]> {
    let mut buf = [0u8; 4];
    read_field(source, &mut buf, HeaderField::Signature)?;
    check_signature(buf)
}

fn decode_version<R: Read + ?Sized>(source: &mut R) -> Result<u16> {
    let mut buf = [0u8; 2];
    read_field(source, &mut buf, HeaderField::Version)?;
    Ok(u16::from_be_bytes(buf))
}

fn decode_protocol_mode<R: Read + ?Sized>(source: &mut R) -> Result<ProtocolMode> {
    let mut buf = [0u8; 1];
    read_field(source, &mut buf, HeaderField::ProtocolMode)?;
    ProtocolMode::try_from(buf[0])
}

/// Exact byte-for-byte comparison against the protocol signature.
pub(crate) fn check_signature(candidate: [u8; 4]) -> Result<[u8; 4]> {
    if candidate == SIGNATURE {
        Ok(candidate)
    } else {
        Err(HeaderError::InvalidSignature(candidate))
    }
}

/// Fill `buf` completely, reporting how far we got if the source runs dry.
fn read_field<R: Read + ?Sized>(source: &mut R, buf: &mut [u8], field: HeaderField) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => return Err(field.truncated(filled)),
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(field.truncated(filled))
            }
            Err(e) => return Err(HeaderError::Io(e)),
        }
    }
    Ok(())
}
