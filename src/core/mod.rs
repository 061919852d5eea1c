//! # Core Header Components
//!
//! Encoding, decoding and framing of the stream handshake header.
//!
//! ## Components
//! - **Header**: field model, validation, sync decode/encode
//! - **Codec**: Tokio codec for framing the header over byte streams
//! - **Stream**: async read/write against tokio I/O
//!
//! ## Wire Format
//! ```text
//! [Signature(4) "JRMI"] [Version(2) BE] [ProtocolMode(1)]
//! ```
//!
//! ## Failure Handling
//! - Each field is validated as soon as it is read
//! - Nothing past the 7th byte is ever consumed
//! - After a decode error the source position is unspecified; drop the connection

pub mod codec;
pub mod header;
pub mod stream;
