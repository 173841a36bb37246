// src/transfer/codec.rs
// =============================================================================
// Transport encoding for file contents.
//
// The contents API moves file bodies as standard base64 inside JSON. Bytes go
// in and come out untouched: no text decoding happens on either side, so
// payloads that are not valid UTF-8 (images, archives, UTF-16 files) survive
// the round trip.
// =============================================================================

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// Encodes raw bytes as standard, unwrapped base64.
pub fn encode(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decodes a base64 payload back into raw bytes.
///
/// The API wraps its base64 output at 60 columns, so ASCII whitespace is
/// skipped before decoding.
pub fn decode(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: Vec<u8> = payload
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    BASE64.decode(compact)
}
