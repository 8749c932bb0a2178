//! Repository Module
//!
//! The raw store command set the cache façade delegates to. Keys handed to a
//! repository are always physical keys; values are opaque bytes.

mod entry;
mod lru;
mod memory;
#[cfg(feature = "redis")]
mod redis_repository;
mod stats;

use async_trait::async_trait;

use crate::error::CacheResult;

pub use entry::{current_timestamp_ms, CacheEntry};
pub use lru::LruTracker;
pub use memory::{InMemoryRepository, MemoryStore};
#[cfg(feature = "redis")]
pub use redis_repository::RedisRepository;
pub use stats::CacheStats;

/// Number of keys removed per round by pattern deletion.
pub const SCAN_CHUNK_SIZE: usize = 1000;

// == Repository Trait ==
/// Store commands used by the cache façade.
///
/// Implementations own connection handling; every method may suspend the
/// calling task until the store replies. Absent or expired keys read as
/// `None` and are never an error.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Writes `value` at `key` with a TTL, overwriting any existing value.
    async fn write(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> CacheResult<bool>;

    /// Writes `value` at `key` only if the key does not exist.
    ///
    /// Returns false if the key already existed.
    async fn write_if_absent(&self, key: &str, value: Vec<u8>, ttl_seconds: u64)
        -> CacheResult<bool>;

    /// Writes every pair with the same TTL, as one batch.
    async fn write_batch(&self, items: Vec<(String, Vec<u8>)>, ttl_seconds: u64)
        -> CacheResult<bool>;

    /// Reads the value at `key`.
    async fn read(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Reads every key, returning values in the order of `keys`.
    async fn read_batch(&self, keys: &[String]) -> CacheResult<Vec<Option<Vec<u8>>>>;

    /// Removes `key`, returning the number of keys removed (0 or 1).
    async fn remove(&self, key: &str) -> CacheResult<u64>;

    /// Removes every key, returning how many existed.
    async fn remove_batch(&self, keys: &[String]) -> CacheResult<u64>;

    /// Lists the live keys matching a glob pattern.
    async fn scan_keys(&self, pattern: &str) -> CacheResult<Vec<String>>;

    /// Removes every key matching a glob pattern.
    async fn remove_pattern(&self, pattern: &str) -> CacheResult<u64> {
        let keys = self.scan_keys(pattern).await?;
        let mut removed = 0;
        for chunk in keys.chunks(SCAN_CHUNK_SIZE) {
            removed += self.remove_batch(chunk).await?;
        }
        Ok(removed)
    }

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}
