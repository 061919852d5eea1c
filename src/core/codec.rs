//! # Header Framing Codec
//!
//! `tokio_util` codec for reading or writing the handshake header through
//! `FramedRead` / `FramedWrite`.
//!
//! The decoder buffers until 7 bytes are available and never consumes past the
//! header, so the connection layer can swap in the call-message codec with
//! `FramedRead::map_decoder` once the header is accepted. A bad signature is
//! rejected as soon as the first 4 bytes arrive.

use crate::config::{HEADER_SIZE, SIGNATURE};
use crate::core::header::Header;
use crate::error::{HeaderError, HeaderField, Result};
use crate::utils::metrics::HeaderMetrics;
use bytes::BytesMut;
use std::sync::Arc;
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

const SIGNATURE_LEN: usize = SIGNATURE.len();

/// Codec for the 7-byte handshake header
#[derive(Debug, Clone, Default)]
pub struct HeaderCodec {
    metrics: Option<Arc<HeaderMetrics>>,
}

impl HeaderCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record decode/encode outcomes into `metrics`.
    pub fn with_metrics(metrics: Arc<HeaderMetrics>) -> Self {
        Self {
            metrics: Some(metrics),
        }
    }

    pub fn metrics(&self) -> Option<&Arc<HeaderMetrics>> {
        self.metrics.as_ref()
    }

    fn record(&self, result: &Result<Header>) {
        if let Some(metrics) = &self.metrics {
            metrics.record_decode(result);
        }
    }
}

impl Decoder for HeaderCodec {
    type Item = Header;
    type Error = HeaderError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Header>> {
        if src.len() >= SIGNATURE_LEN && src[..SIGNATURE_LEN] != SIGNATURE {
            let mut candidate = [0u8; SIGNATURE_LEN];
            candidate.copy_from_slice(&src[..SIGNATURE_LEN]);
            let result = Err(HeaderError::InvalidSignature(candidate));
            self.record(&result);
            debug!(signature = ?candidate, "Rejecting header before it is complete");
            return result.map(Some);
        }

        if src.len() < HEADER_SIZE {
            return Ok(None);
        }

        let frame = src.split_to(HEADER_SIZE);
        let result = Header::from_bytes(&frame);
        self.record(&result);
        result.map(Some)
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Header>> {
        match self.decode(buf)? {
            Some(header) => Ok(Some(header)),
            None if buf.is_empty() => Ok(None),
            None => {
                let err = truncated_at(buf.len());
                let result = Err(err);
                self.record(&result);
                result.map(Some)
            }
        }
    }
}

impl Encoder<Header> for HeaderCodec {
    type Error = HeaderError;

    fn encode(&mut self, header: Header, dst: &mut BytesMut) -> Result<()> {
        dst.reserve(HEADER_SIZE);
        header.encode_into(dst);
        if let Some(metrics) = &self.metrics {
            metrics.record_encode(HEADER_SIZE as u64);
        }
        Ok(())
    }
}

/// Map a short buffer length onto the field that would have run out.
fn truncated_at(available: usize) -> HeaderError {
    let field = [
        HeaderField::Signature,
        HeaderField::Version,
        HeaderField::ProtocolMode,
    ]
    .into_iter()
    .find(|f| available < f.offset() + f.width())
    .unwrap_or(HeaderField::ProtocolMode);

    field.truncated(available - field.offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::header::ProtocolMode;

    #[test]
    fn test_partial_decode_preserves_buffer() {
        let mut codec = HeaderCodec::new();
        let mut buf = BytesMut::from(&[0x4A, 0x52, 0x4D, 0x49, 0x00][..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn test_early_signature_rejection() {
        let mut codec = HeaderCodec::new();
        let mut buf = BytesMut::from(&b"HTTP"[..]);
        let err = codec.decode(&mut buf).unwrap_err();
        assert!(matches!(err, HeaderError::InvalidSignature(sig) if &sig == b"HTTP"));
    }

    #[test]
    fn test_decode_stops_at_header_boundary() {
        let mut codec = HeaderCodec::new();
        let mut buf = BytesMut::new();
        codec
            .encode(Header::new(2, ProtocolMode::Multiplex), &mut buf)
            .unwrap();
        buf.extend_from_slice(&[0x50, 0xAA]);

        let header = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(header.protocol_mode(), ProtocolMode::Multiplex);
        assert_eq!(&buf[..], &[0x50, 0xAA]);
    }

    #[test]
    fn test_truncated_at_maps_fields() {
        let cases = [
            (0, HeaderField::Signature, 0),
            (3, HeaderField::Signature, 3),
            (4, HeaderField::Version, 0),
            (5, HeaderField::Version, 1),
            (6, HeaderField::ProtocolMode, 0),
        ];
        for (len, expected_field, expected_available) in cases {
            match truncated_at(len) {
                HeaderError::TruncatedInput {
                    field,
                    needed,
                    available,
                } => {
                    assert_eq!(field, expected_field, "len {len}");
                    assert_eq!(needed, expected_field.width());
                    assert_eq!(available, expected_available);
                }
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn test_decode_eof_reports_truncation() {
        let mut codec = HeaderCodec::new();
        let mut buf = BytesMut::from(&[0x4A, 0x52, 0x4D, 0x49, 0x00, 0x02][..]);
        let err = codec.decode_eof(&mut buf).unwrap_err();
        assert!(matches!(
            err,
            HeaderError::TruncatedInput {
                field: HeaderField::ProtocolMode,
                ..
            }
        ));
    }

    #[test]
    fn test_decode_eof_empty_is_clean() {
        let mut codec = HeaderCodec::new();
        let mut buf = BytesMut::new();
        assert!(codec.decode_eof(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_metrics_are_recorded() {
        let metrics = Arc::new(HeaderMetrics::new());
        let mut codec = HeaderCodec::with_metrics(metrics.clone());

        let mut buf = BytesMut::new();
        codec.encode(Header::default(), &mut buf).unwrap();
        codec.decode(&mut buf).unwrap();

        let mut bad = BytesMut::from(&[0x4A, 0x52, 0x4D, 0x49, 0x00, 0x02, 0x00][..]);
        assert!(codec.decode(&mut bad).is_err());

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.encodes_total, 1);
        assert_eq!(snapshot.decodes_total, 2);
        assert_eq!(snapshot.decodes_success, 1);
        assert_eq!(snapshot.invalid_protocol_mode, 1);
    }
}
