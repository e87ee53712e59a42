//! Versioned JSON record values.
//!
//! Stored shape: `{"v":1,"id":<u64>,"text":<string>}`.

use super::{CodecError, CodecResult};
use crate::model::todo::Todo;
use serde::{Deserialize, Serialize};

/// Record schema version written by this binary.
pub const RECORD_SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct WireTodoRef<'a> {
    v: u32,
    id: u64,
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WireTodo {
    v: u32,
    id: u64,
    text: String,
}

/// Encodes one record into its stored byte form.
pub fn encode_todo(todo: &Todo) -> CodecResult<Vec<u8>> {
    let wire = WireTodoRef {
        v: RECORD_SCHEMA_VERSION,
        id: todo.id,
        text: todo.text.as_str(),
    };
    Ok(serde_json::to_vec(&wire)?)
}

/// Decodes stored bytes produced by [`encode_todo`].
///
/// # Errors
/// - `CodecError::Json` for bytes that are not a record object.
/// - `CodecError::UnsupportedVersion` for records of another schema version.
pub fn decode_todo(bytes: &[u8]) -> CodecResult<Todo> {
    let wire: WireTodo = serde_json::from_slice(bytes)?;
    if wire.v != RECORD_SCHEMA_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: wire.v,
            supported: RECORD_SCHEMA_VERSION,
        });
    }
    Ok(Todo::new(wire.id, wire.text))
}
