//! Request DTOs for the cache gateway API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::key::Version;

/// Upper bound on keys accepted by one batch request.
pub const MAX_BATCH_KEYS: usize = 10_000;

/// Query string carrying an optional version override.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionQuery {
    #[serde(default)]
    pub version: Option<String>,
}

impl VersionQuery {
    pub fn version(&self) -> Option<Version> {
        self.version.as_deref().and_then(|v| v.parse().ok())
    }
}

/// Request body for `PUT /cache/:key`
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// Any JSON value
    pub value: Value,
    /// Expiry in seconds
    pub expire: u64,
    /// Only write if the key does not exist
    #[serde(default)]
    pub nx: bool,
}

/// Request body for `POST /batch/set`
#[derive(Debug, Clone, Deserialize)]
pub struct SetManyRequest {
    pub items: HashMap<String, Value>,
    pub expire: u64,
    #[serde(default)]
    pub version: Option<Version>,
}

impl SetManyRequest {
    pub fn validate(&self) -> Option<String> {
        validate_batch_len(self.items.len())
    }
}

/// Request body for `POST /batch/get` and `POST /batch/delete`
#[derive(Debug, Clone, Deserialize)]
pub struct KeysRequest {
    pub keys: Vec<String>,
    #[serde(default)]
    pub version: Option<Version>,
}

impl KeysRequest {
    pub fn validate(&self) -> Option<String> {
        validate_batch_len(self.keys.len())
    }
}

/// Request body for `POST /pattern/delete`
#[derive(Debug, Clone, Deserialize)]
pub struct PatternRequest {
    pub pattern: String,
    #[serde(default)]
    pub version: Option<Version>,
}

impl PatternRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.pattern.is_empty() {
            return Some("Pattern cannot be empty".to_string());
        }
        None
    }
}

fn validate_batch_len(len: usize) -> Option<String> {
    if len > MAX_BATCH_KEYS {
        return Some(format!(
            "Batch exceeds maximum of {} keys",
            MAX_BATCH_KEYS
        ));
    }
    None
}
