use crate::error::{AppError, AppResult};
use serde::Serialize;
use sha2::Digest;

/// Pretty-printed JSON with two-space indentation and struct field order kept.
pub fn to_pretty_json<T: Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::internal(format!("json encode error: {e}")))
}

/// Digest over length-prefixed parts, so `["ab", "c"]` and `["a", "bc"]` differ.
pub fn digest_parts<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut hasher = sha2::Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}
