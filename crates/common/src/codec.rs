//! Byte / text / base64 conversions.
//!
//! Everything here is pure: no allocation beyond the returned value and no
//! shared state. Base64 is always the standard padded alphabet.

use base64::{DecodeError, Engine, engine::general_purpose::STANDARD};

/// Encode bytes as standard padded base64.
#[must_use]
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard padded base64. Leading and trailing ASCII whitespace is ignored.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, DecodeError> {
    STANDARD.decode(text.trim_ascii())
}

/// UTF-8 bytes of a string slice.
#[must_use]
pub fn text_to_bytes(text: &str) -> &[u8] {
    text.as_bytes()
}

/// Interpret owned bytes as UTF-8 text.
pub fn bytes_to_text(bytes: Vec<u8>) -> Result<String, std::string::FromUtf8Error> {
    String::from_utf8(bytes)
}

/// Concatenate buffers into one allocation sized to the total length.
#[must_use]
pub fn concat(parts: &[&[u8]]) -> Vec<u8> {
    let len = parts.iter().map(|p| p.len()).sum();
    let mut out = Vec::with_capacity(len);
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}

/// Split off the first `n` bytes, or `None` if the buffer is shorter.
#[must_use]
pub fn split_prefix(bytes: &[u8], n: usize) -> Option<(&[u8], &[u8])> {
    bytes.split_at_checked(n)
}
