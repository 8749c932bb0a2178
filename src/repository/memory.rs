//! In-Memory Repository
//!
//! Process-local store combining a HashMap with TTL deadlines, optional LRU
//! capacity and hit/miss statistics. Expired entries are invisible to every
//! command and are purged on access or by the cleanup task.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CacheEntry, CacheStats, LruTracker, Repository};
use crate::error::CacheResult;
use crate::glob;

// == Memory Store ==
/// Synchronous store state, shared behind a lock by [`InMemoryRepository`].
#[derive(Debug)]
pub struct MemoryStore {
    /// Physical key -> entry
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Capacity, 0 = unbounded
    max_entries: usize,
}

impl MemoryStore {
    /// Creates a store holding at most `max_entries` keys (0 = unbounded).
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
        }
    }

    // == Write ==
    /// Stores a value, overwriting any existing one and resetting its TTL.
    ///
    /// At capacity, the least recently used key makes room.
    pub fn write(&mut self, key: String, value: Vec<u8>, ttl_seconds: u64) {
        self.purge_if_expired(&key);

        let is_overwrite = self.entries.contains_key(&key);
        if !is_overwrite && self.max_entries > 0 && self.entries.len() >= self.max_entries {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
            }
        }

        self.lru.touch(&key);
        self.entries.insert(key, CacheEntry::new(value, ttl_seconds));
        self.stats.set_total_entries(self.entries.len());
    }

    /// Stores a value only if no live entry exists at `key`.
    pub fn write_if_absent(&mut self, key: String, value: Vec<u8>, ttl_seconds: u64) -> bool {
        if self.contains(&key) {
            return false;
        }
        self.write(key, value, ttl_seconds);
        true
    }

    // == Read ==
    /// Returns the live value at `key`, recording a hit or a miss.
    pub fn read(&mut self, key: &str) -> Option<Vec<u8>> {
        self.purge_if_expired(key);

        match self.entries.get(key) {
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                self.lru.touch(key);
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Remove ==
    /// Removes a live entry. Returns false if there was none.
    pub fn remove(&mut self, key: &str) -> bool {
        self.purge_if_expired(key);

        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
            true
        } else {
            false
        }
    }

    // == Scan ==
    /// Lists live keys matching a glob pattern, sorted.
    pub fn scan(&self, pattern: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, entry)| !entry.is_expired() && glob::matches(pattern, key))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// True if a live entry exists at `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|entry| !entry.is_expired())
    }

    /// Remaining TTL in seconds of a live entry.
    pub fn ttl(&self, key: &str) -> Option<u64> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(CacheEntry::ttl_remaining)
    }

    /// Returns current statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.record_expirations(expired.len());
        self.stats.set_total_entries(self.entries.len());
        expired.len()
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn purge_if_expired(&mut self, key: &str) {
        if self.entries.get(key).is_some_and(CacheEntry::is_expired) {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.entries.len());
        }
    }
}

// == In-Memory Repository ==
/// [`Repository`] over a shared [`MemoryStore`].
///
/// Cloning shares the same store.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    store: Arc<RwLock<MemoryStore>>,
}

impl InMemoryRepository {
    /// Creates a repository holding at most `max_entries` keys (0 = unbounded).
    pub fn new(max_entries: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore::new(max_entries))),
        }
    }

    /// Shared handle to the underlying store, for the cleanup task.
    pub fn store(&self) -> Arc<RwLock<MemoryStore>> {
        self.store.clone()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// Remaining TTL in seconds of a live physical key.
    pub async fn ttl(&self, key: &str) -> Option<u64> {
        self.store.read().await.ttl(key)
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new(0)
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn write(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> CacheResult<bool> {
        self.store.write().await.write(key.to_string(), value, ttl_seconds);
        Ok(true)
    }

    async fn write_if_absent(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl_seconds: u64,
    ) -> CacheResult<bool> {
        let written = self
            .store
            .write()
            .await
            .write_if_absent(key.to_string(), value, ttl_seconds);
        Ok(written)
    }

    async fn write_batch(
        &self,
        items: Vec<(String, Vec<u8>)>,
        ttl_seconds: u64,
    ) -> CacheResult<bool> {
        // One lock for the whole batch keeps it all-or-nothing for readers
        let mut store = self.store.write().await;
        for (key, value) in items {
            store.write(key, value, ttl_seconds);
        }
        Ok(true)
    }

    async fn read(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        Ok(self.store.write().await.read(key))
    }

    async fn read_batch(&self, keys: &[String]) -> CacheResult<Vec<Option<Vec<u8>>>> {
        let mut store = self.store.write().await;
        Ok(keys.iter().map(|key| store.read(key)).collect())
    }

    async fn remove(&self, key: &str) -> CacheResult<u64> {
        Ok(u64::from(self.store.write().await.remove(key)))
    }

    async fn remove_batch(&self, keys: &[String]) -> CacheResult<u64> {
        let mut store = self.store.write().await;
        Ok(keys.iter().filter(|key| store.remove(key)).count() as u64)
    }

    async fn scan_keys(&self, pattern: &str) -> CacheResult<Vec<String>> {
        Ok(self.store.read().await.scan(pattern))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    fn bytes(s: &str) -> Vec<u8> {
        s.as_bytes().to_vec()
    }

    #[test]
    fn test_store_write_and_read() {
        let mut store = MemoryStore::new(100);

        store.write("key1".to_string(), bytes("value1"), 100);

        assert_eq!(store.read("key1"), Some(bytes("value1")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_read_missing() {
        let mut store = MemoryStore::new(100);
        assert_eq!(store.read("nonexistent"), None);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_overwrite_resets_value() {
        let mut store = MemoryStore::new(100);

        store.write("key1".to_string(), bytes("value1"), 100);
        store.write("key1".to_string(), bytes("value2"), 100);

        assert_eq!(store.read("key1"), Some(bytes("value2")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_write_if_absent() {
        let mut store = MemoryStore::new(100);

        assert!(store.write_if_absent("key".to_string(), bytes("v1"), 100));
        assert!(!store.write_if_absent("key".to_string(), bytes("v2"), 200));

        assert_eq!(store.read("key"), Some(bytes("v1")));
        assert_eq!(store.ttl("key"), Some(100));
    }

    #[test]
    fn test_store_remove() {
        let mut store = MemoryStore::new(100);

        store.write("key1".to_string(), bytes("value1"), 100);

        assert!(store.remove("key1"));
        assert!(!store.remove("key1"));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = MemoryStore::new(100);

        store.write("key1".to_string(), bytes("value1"), 1);
        assert!(store.read("key1").is_some());

        sleep(Duration::from_millis(1100));

        assert_eq!(store.read("key1"), None);
        assert!(!store.remove("key1"));
        assert!(store.write_if_absent("key1".to_string(), bytes("again"), 10));
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = MemoryStore::new(3);

        store.write("key1".to_string(), bytes("1"), 100);
        store.write("key2".to_string(), bytes("2"), 100);
        store.write("key3".to_string(), bytes("3"), 100);

        // Touch key1 so key2 becomes the oldest
        store.read("key1");
        store.write("key4".to_string(), bytes("4"), 100);

        assert_eq!(store.len(), 3);
        assert!(store.contains("key1"));
        assert!(!store.contains("key2"));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_unbounded() {
        let mut store = MemoryStore::new(0);
        for i in 0..500 {
            store.write(format!("key{i}"), bytes("v"), 100);
        }
        assert_eq!(store.len(), 500);
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_store_scan() {
        let mut store = MemoryStore::new(100);

        store.write("hllo".to_string(), bytes("1"), 100);
        store.write("heeeello".to_string(), bytes("2"), 100);
        store.write("world".to_string(), bytes("3"), 100);

        assert_eq!(store.scan("h*llo"), vec!["heeeello".to_string(), "hllo".to_string()]);
        assert!(store.scan("x*").is_empty());
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = MemoryStore::new(100);

        store.write("key1".to_string(), bytes("1"), 1);
        store.write("key2".to_string(), bytes("2"), 10);

        sleep(Duration::from_millis(1100));

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.contains("key2"));
    }

    #[tokio::test]
    async fn test_repository_batches() {
        let repo = InMemoryRepository::new(0);

        repo.write_batch(
            vec![
                ("k1".to_string(), bytes("v1")),
                ("k2".to_string(), bytes("v2")),
            ],
            100,
        )
        .await
        .unwrap();

        let keys = vec!["k1".to_string(), "missing".to_string(), "k2".to_string()];
        let values = repo.read_batch(&keys).await.unwrap();
        assert_eq!(values, vec![Some(bytes("v1")), None, Some(bytes("v2"))]);

        assert_eq!(repo.remove_batch(&keys).await.unwrap(), 2);
        assert_eq!(repo.remove("k1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_repository_remove_pattern() {
        let repo = InMemoryRepository::default();

        repo.write("hllo", bytes("1"), 100).await.unwrap();
        repo.write("heeeello", bytes("2"), 100).await.unwrap();
        repo.write("world", bytes("3"), 100).await.unwrap();

        assert_eq!(repo.remove_pattern("h*llo").await.unwrap(), 2);
        assert_eq!(repo.scan_keys("*").await.unwrap(), vec!["world".to_string()]);
        assert_eq!(repo.remove_pattern("nothing*").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_repository_clones_share_store() {
        let repo = InMemoryRepository::new(10);
        let other = repo.clone();

        repo.write("shared", bytes("1"), 100).await.unwrap();

        assert_eq!(other.read("shared").await.unwrap(), Some(bytes("1")));
        assert_eq!(other.ttl("shared").await, Some(100));
        assert_eq!(repo.stats().await.hits, 1);
    }
}
