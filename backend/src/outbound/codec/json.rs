//! JSON wire format for tracked content.
//!
//! Field names are `key`, `uploads` and `downloads`; entries carry
//! `storeKey`, `accessChannel` and `path`. Entry arrays are written in sorted
//! order and `null` or absent arrays decode as empty sets.

use super::CodecError;
use crate::domain::TrackedContent;

/// Encode `content` as compact JSON text.
///
/// # Errors
///
/// Returns [`CodecError::Json`] when serialisation fails.
pub fn encode(content: &TrackedContent) -> Result<String, CodecError> {
    Ok(serde_json::to_string(content)?)
}

/// Encode `content` as indented JSON text.
///
/// # Errors
///
/// Returns [`CodecError::Json`] when serialisation fails.
pub fn encode_pretty(content: &TrackedContent) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(content)?)
}

/// Decode tracked content from JSON text.
///
/// # Errors
///
/// Returns [`CodecError::Json`] when the text is not a valid record, for
/// example when the key is missing or an entry's store key is malformed.
pub fn decode(text: &str) -> Result<TrackedContent, CodecError> {
    Ok(serde_json::from_str(text)?)
}

/// Decode tracked content from UTF-8 JSON bytes.
///
/// # Errors
///
/// Returns [`CodecError::Json`] when the bytes are not a valid record.
pub fn decode_slice(bytes: &[u8]) -> Result<TrackedContent, CodecError> {
    Ok(serde_json::from_slice(bytes)?)
}
