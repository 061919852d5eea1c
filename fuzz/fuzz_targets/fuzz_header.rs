#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use rmi_header::{Header, HeaderCodec};
use tokio_util::codec::Decoder;

fuzz_target!(|data: &[u8]| {
    // Slice decode: anything accepted must re-encode to the same 7 bytes
    if let Ok(header) = Header::from_bytes(data) {
        assert_eq!(&header.encode()[..], &data[..7]);
    }

    // Framing codec must agree with the slice decoder on complete input
    let mut codec = HeaderCodec::new();
    let mut buf = BytesMut::from(data);
    let framed = codec.decode_eof(&mut buf);
    match (Header::from_bytes(data), framed) {
        (Ok(a), Ok(Some(b))) => assert_eq!(a, b),
        (Err(_), Err(_)) => {}
        (Err(_), Ok(None)) => assert!(data.is_empty()),
        (a, b) => panic!("slice {a:?} vs codec {b:?}"),
    }
});
