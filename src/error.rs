//! Error types for cache operations
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

// == Cache Error Enum ==
/// Unified error type for the cache façade and its repositories.
///
/// A missing or expired key is never an error; reads report it as `None`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Store unreachable or a command failed at the transport layer
    #[error("Store connectivity error: {0}")]
    Connectivity(String),

    /// Value could not be encoded to JSON
    #[error("JSON encode error: {0}")]
    JsonEncode(String),

    /// Stored bytes are not valid JSON for the requested type
    #[error("JSON decode error: {0}")]
    JsonDecode(String),

    /// Rejected before any store call was made
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation not offered by the configured backend
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl CacheError {
    /// True for encode and decode failures.
    pub fn is_serialization(&self) -> bool {
        matches!(self, CacheError::JsonEncode(_) | CacheError::JsonDecode(_))
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Connectivity(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::Connectivity(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::JsonEncode(_) | CacheError::JsonDecode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            CacheError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CacheError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
        };

        if self.is_serialization() {
            error!(error = %self, "cache payload could not be (de)serialized");
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;
