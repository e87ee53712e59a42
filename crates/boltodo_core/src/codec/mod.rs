//! Byte encodings for stored keys and values.
//!
//! # Responsibility
//! - Map `TodoId` to fixed-width, order-preserving bucket keys.
//! - Map `Todo` records to self-describing bucket values.
//!
//! # Invariants
//! - `decode(encode(x)) == x` for both keys and records.
//! - Key byte order equals numeric id order.
//! - Undecodable bytes surface as `CodecError`, never as a default value.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod key;
pub mod record;

pub use key::{decode_key, encode_key, KEY_WIDTH};
pub use record::{decode_todo, encode_todo, RECORD_SCHEMA_VERSION};

pub type CodecResult<T> = Result<T, CodecError>;

/// Format error raised while encoding or decoding stored bytes.
#[derive(Debug)]
pub enum CodecError {
    /// Key is not exactly `KEY_WIDTH` bytes long.
    KeyWidth { actual: usize },
    /// Value is not a JSON record of the expected shape.
    Json(serde_json::Error),
    /// Value was written by an incompatible record schema.
    UnsupportedVersion { found: u32, supported: u32 },
    /// Record decoded fine but was stored under another id's key.
    KeyMismatch { key_id: u64, record_id: u64 },
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeyWidth { actual } => {
                write!(f, "invalid key width {actual}, expected {KEY_WIDTH} bytes")
            }
            Self::Json(err) => write!(f, "malformed record: {err}"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "record schema version {found} is not supported (expected {supported})"
            ),
            Self::KeyMismatch { key_id, record_id } => {
                write!(f, "record id {record_id} stored under key for id {key_id}")
            }
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::KeyWidth { .. }
            | Self::UnsupportedVersion { .. }
            | Self::KeyMismatch { .. } => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
