//! Serialization Boundary
//!
//! JSON encoding of cached values. Every value crossing into a repository is
//! compact JSON bytes; every value coming back is decoded here.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{CacheError, CacheResult};

/// Encodes a value as compact JSON bytes.
pub fn dumps<T: Serialize + ?Sized>(value: &T) -> CacheResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| CacheError::JsonEncode(e.to_string()))
}

/// Decodes JSON bytes into a dynamic JSON value.
pub fn loads(payload: &[u8]) -> CacheResult<Value> {
    loads_as(payload)
}

/// Decodes JSON bytes into `T`.
pub fn loads_as<T: DeserializeOwned>(payload: &[u8]) -> CacheResult<T> {
    serde_json::from_slice(payload).map_err(|e| CacheError::JsonDecode(e.to_string()))
}

/// Decodes an optional payload, keeping absence as `None`.
pub(crate) fn loads_opt<T: DeserializeOwned>(payload: Option<Vec<u8>>) -> CacheResult<Option<T>> {
    payload.map(|raw| loads_as(&raw)).transpose()
}
