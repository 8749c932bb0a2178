//! Configuration Module
//!
//! Loads the gateway configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::CacheConfig;
use crate::key::Version;

/// Repository backing the gateway's cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Redis,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "redis" => Ok(StoreBackend::Redis),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Which repository to build
    pub backend: StoreBackend,
    /// Redis connection URL, used by the redis backend
    pub redis_url: String,
    /// First segment of every physical key
    pub key_prefix: String,
    /// Default cache version
    pub version: Version,
    /// In-memory capacity (0 = unbounded)
    pub max_entries: usize,
    /// HTTP server port
    pub server_port: u16,
    /// In-memory cleanup interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `STORE_BACKEND` - `memory` or `redis` (default: memory)
    /// - `REDIS_URL` - Redis URL (default: redis://127.0.0.1:6379)
    /// - `CACHE_KEY_PREFIX` - Key prefix (default: empty)
    /// - `CACHE_VERSION` - Default version (default: 1)
    /// - `MAX_ENTRIES` - In-memory capacity (default: 10000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            backend: parsed("STORE_BACKEND").unwrap_or(defaults.backend),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            key_prefix: env::var("CACHE_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            version: parsed("CACHE_VERSION").unwrap_or(defaults.version),
            max_entries: parsed("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            server_port: parsed("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parsed("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
        }
    }

    /// Namespace settings for the gateway's cache.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new(self.key_prefix.clone(), self.version.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: String::new(),
            version: Version::default(),
            max_entries: 10_000,
            server_port: 3000,
            cleanup_interval: 1,
        }
    }
}

fn parsed<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
