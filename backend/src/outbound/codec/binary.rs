//! Versioned binary persistence format for tracked content.
//!
//! Layout: one format-version byte followed by a `bincode` (standard
//! configuration) encoding of the same record shape the JSON format uses.
//! Decoding rejects empty input, unknown versions and trailing bytes.

use bincode::config;
use tracing::debug;

use super::CodecError;
use crate::domain::TrackedContent;

/// Format version written by [`encode`].
pub const FORMAT_VERSION: u8 = 1;

/// Encode `content` into the versioned binary form.
///
/// # Errors
///
/// Returns [`CodecError::BinaryEncode`] when the encoder rejects the record.
///
/// # Examples
///
/// ```
/// use tracking_backend::domain::{TrackedContent, TrackingKey};
/// use tracking_backend::outbound::codec::binary;
///
/// let key = TrackingKey::new("build-42").expect("valid key");
/// let bytes = binary::encode(&TrackedContent::new(key)).expect("encode");
/// assert_eq!(bytes.first(), Some(&binary::FORMAT_VERSION));
/// ```
pub fn encode(content: &TrackedContent) -> Result<Vec<u8>, CodecError> {
    let body = bincode::serde::encode_to_vec(content, config::standard())?;
    let mut bytes = Vec::with_capacity(body.len() + 1);
    bytes.push(FORMAT_VERSION);
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

/// Decode tracked content from its versioned binary form.
///
/// # Errors
///
/// Returns [`CodecError::Empty`] for empty input,
/// [`CodecError::UnsupportedVersion`] for an unknown version byte,
/// [`CodecError::BinaryDecode`] for a malformed body and
/// [`CodecError::TrailingBytes`] when bytes follow a complete record.
pub fn decode(bytes: &[u8]) -> Result<TrackedContent, CodecError> {
    let (&version, body) = bytes.split_first().ok_or(CodecError::Empty)?;
    if version != FORMAT_VERSION {
        debug!(found = version, expected = FORMAT_VERSION, "rejecting binary record");
        return Err(CodecError::UnsupportedVersion {
            found: version,
            expected: FORMAT_VERSION,
        });
    }

    let (content, read): (TrackedContent, usize) =
        bincode::serde::decode_from_slice(body, config::standard())?;
    let trailing = body.len().saturating_sub(read);
    if trailing > 0 {
        return Err(CodecError::TrailingBytes(trailing));
    }
    Ok(content)
}
