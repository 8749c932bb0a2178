//! Response DTOs for the cache gateway API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::repository::CacheStats;

/// One looked-up key. `found` separates a stored `null` from absence.
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub found: bool,
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            key: key.into(),
            found: value.is_some(),
            value: value.unwrap_or(Value::Null),
        }
    }
}

/// Response body for `PUT /cache/:key`
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    pub key: String,
    /// False when `nx` was requested and the key already existed
    pub written: bool,
}

/// Response body for `POST /batch/set`
#[derive(Debug, Clone, Serialize)]
pub struct SetManyResponse {
    pub written: bool,
    pub count: usize,
}

/// Response body for `POST /batch/get`
#[derive(Debug, Clone, Serialize)]
pub struct GetManyResponse {
    pub entries: Vec<GetResponse>,
}

/// Response body for every delete endpoint
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub removed: u64,
}

/// Response body for `GET /stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub total_entries: usize,
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Repository backend name
    pub backend: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy(backend: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            backend: backend.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_response_distinguishes_null() {
        let stored_null = serde_json::to_value(GetResponse::new("k", Some(Value::Null))).unwrap();
        let absent = serde_json::to_value(GetResponse::new("k", None)).unwrap();

        assert_eq!(stored_null, json!({"key": "k", "found": true, "value": null}));
        assert_eq!(absent, json!({"key": "k", "found": false, "value": null}));
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            ..Default::default()
        };
        let resp = StatsResponse::from(stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy("memory")).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("memory"));
        assert!(json.contains("timestamp"));
    }
}
