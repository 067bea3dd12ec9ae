//! Mapping to transport-segment codec and back.
//!
//! Converts a JSON mapping to canonical bytes and wraps them in URL-safe
//! base64 without padding, so encoded output never contains the `.`
//! delimiter. `decode(encode(m)) == m` for every supported mapping.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::{
    error::{TokenError, TokenResult},
    types::Claims,
};

/// Serialize a mapping to its canonical byte form.
pub fn to_bytes(mapping: &Claims) -> TokenResult<Vec<u8>> {
    serde_json::to_vec(mapping).map_err(|_| TokenError::MalformedPayload)
}

/// Parse canonical bytes back into a mapping.
pub fn parse(bytes: &[u8]) -> TokenResult<Claims> {
    serde_json::from_slice(bytes).map_err(|_| TokenError::MalformedPayload)
}

/// Wrap raw bytes in the transport text encoding.
#[must_use]
pub fn encode_bytes(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Unwrap a transport segment back to raw bytes.
pub fn decode_bytes(segment: &str) -> TokenResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::MalformedSegment)
}

/// Encode a mapping as a transport segment.
pub fn encode(mapping: &Claims) -> TokenResult<String> {
    Ok(encode_bytes(&to_bytes(mapping)?))
}

/// Decode a transport segment into a mapping.
pub fn decode(segment: &str) -> TokenResult<Claims> {
    parse(&decode_bytes(segment)?)
}
