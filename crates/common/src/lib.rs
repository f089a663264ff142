//! Shared byte, text and base64 helpers used across all narrator crates.

pub mod codec;

pub use codec::{bytes_to_text, concat, decode_base64, encode_base64, split_prefix, text_to_bytes};
