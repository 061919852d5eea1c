//! Async header exchange over tokio byte streams.
//!
//! Mirrors [`Header::decode`] for `AsyncRead` sources: same field order, same
//! validation, same truncation reporting. Only the 7 header bytes are read, so
//! the stream is left positioned at the first call message.

use crate::config::HEADER_SIZE;
use crate::core::header::{check_signature, Header, ProtocolMode};
use crate::error::{HeaderError, HeaderField, Result};
use crate::utils::metrics::Timer;
use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, instrument, trace};

/// Read and validate a header from an async byte source.
///
/// # Errors
/// Same taxonomy as [`Header::decode`].
#[instrument(level = "trace", skip(reader))]
pub async fn read_header<R>(reader: &mut R) -> Result<Header>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let _timer = Timer::start("read_header");
    let result = read_fields(reader).await;
    if let Err(e) = &result {
        debug!(kind = e.kind(), error = %e, "Header rejected");
    }
    result
}

async fn read_fields<R>(reader: &mut R) -> Result<Header>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut signature = [0u8; 4];
    read_field(reader, &mut signature, HeaderField::Signature).await?;
    let signature = check_signature(signature)?;

    let mut version = [0u8; 2];
    read_field(reader, &mut version, HeaderField::Version).await?;
    let version = u16::from_be_bytes(version);

    let mut mode = [0u8; 1];
    read_field(reader, &mut mode, HeaderField::ProtocolMode).await?;
    let protocol_mode = ProtocolMode::try_from(mode[0])?;

    trace!(version, mode = %protocol_mode, "Decoded header");
    Ok(Header::with_signature(signature, version, protocol_mode))
}

async fn read_field<R>(reader: &mut R, buf: &mut [u8], field: HeaderField) -> Result<()>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]).await {
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

/// Write the header to an async sink and flush it.
///
/// Encoding itself cannot fail; any error here comes from the sink.
#[instrument(level = "trace", skip(writer))]
pub async fn write_header<W>(writer: &mut W, header: &Header) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let bytes: [u8; HEADER_SIZE] = header.encode();
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}
