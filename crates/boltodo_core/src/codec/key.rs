//! Big-endian id keys.

use super::{CodecError, CodecResult};
use crate::model::todo::TodoId;

/// Width in bytes of every encoded key.
pub const KEY_WIDTH: usize = std::mem::size_of::<TodoId>();

/// Encodes `id` as an 8-byte big-endian key.
///
/// Unsigned lexicographic comparison of two keys matches numeric comparison
/// of their ids, so ordered bucket iteration yields ascending ids.
pub fn encode_key(id: TodoId) -> [u8; KEY_WIDTH] {
    id.to_be_bytes()
}

/// Decodes a key produced by [`encode_key`].
///
/// # Errors
/// - Returns `CodecError::KeyWidth` when `key` is not exactly 8 bytes.
pub fn decode_key(key: &[u8]) -> CodecResult<TodoId> {
    let bytes: [u8; KEY_WIDTH] = key
        .try_into()
        .map_err(|_| CodecError::KeyWidth { actual: key.len() })?;
    Ok(TodoId::from_be_bytes(bytes))
}
