//! Tracked-content codecs.
//!
//! Two encodings share the same field set: a JSON wire format exchanged with
//! other services and a versioned binary format used for persistence. Both
//! must round-trip a record's key and entry sets exactly.

pub mod binary;
pub mod json;

use thiserror::Error;

use crate::domain::ports::TrackedContentRepositoryError;

/// Errors raised while encoding or decoding tracked content.
#[derive(Debug, Error)]
pub enum CodecError {
    /// JSON text could not be produced or parsed.
    #[error("invalid tracked content JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// No bytes were supplied to the binary decoder.
    #[error("binary tracked content is empty")]
    Empty,
    /// The binary payload was written by an unknown format version.
    #[error("unsupported binary format version {found}, expected {expected}")]
    UnsupportedVersion {
        /// Version byte found in the payload.
        found: u8,
        /// Version byte this build understands.
        expected: u8,
    },
    /// The binary encoder rejected the record.
    #[error("binary encoding failed: {0}")]
    BinaryEncode(#[from] bincode::error::EncodeError),
    /// The binary payload body could not be decoded.
    #[error("binary decoding failed: {0}")]
    BinaryDecode(#[from] bincode::error::DecodeError),
    /// Bytes remained after a complete record was decoded.
    #[error("binary payload has {0} trailing bytes")]
    TrailingBytes(usize),
}

impl CodecError {
    /// Whether the failure happened while producing an encoding.
    pub const fn is_encode(&self) -> bool {
        matches!(self, Self::BinaryEncode(_))
    }
}

impl From<CodecError> for TrackedContentRepositoryError {
    fn from(value: CodecError) -> Self {
        if value.is_encode() {
            Self::encode(value.to_string())
        } else {
            Self::decode(value.to_string())
        }
    }
}
