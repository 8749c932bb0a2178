//! Redis repository implementation.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, Client};
use tracing::debug;

use super::{Repository, SCAN_CHUNK_SIZE};
use crate::error::{CacheError, CacheResult};

/// Redis-backed repository.
///
/// The connection manager is multiplexed and reconnects on its own; each
/// command runs on a cheap clone of it.
#[derive(Clone)]
pub struct RedisRepository {
    connection: ConnectionManager,
}

impl RedisRepository {
    /// Connect to Redis.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., "redis://localhost:6379")
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use vercache::RedisRepository;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), vercache::CacheError> {
    ///     let repository = RedisRepository::connect("redis://localhost:6379").await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn connect(url: &str) -> CacheResult<Self> {
        let client = Client::open(url).map_err(|e| CacheError::Connectivity(e.to_string()))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Connectivity(e.to_string()))?;

        Ok(Self { connection })
    }

    /// Get the underlying connection manager.
    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    async fn scan_page(&self, cursor: u64, pattern: &str) -> CacheResult<(u64, Vec<String>)> {
        let mut conn = self.connection.clone();
        let page: (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(SCAN_CHUNK_SIZE)
            .query_async(&mut conn)
            .await?;
        Ok(page)
    }
}

#[async_trait]
impl Repository for RedisRepository {
    async fn write(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> CacheResult<bool> {
        let mut conn = self.connection.clone();
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await?;
        Ok(true)
    }

    async fn write_if_absent(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl_seconds: u64,
    ) -> CacheResult<bool> {
        let mut conn = self.connection.clone();
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_seconds)
            .arg("NX")
            .query_async(&mut conn)
            .await?;
        Ok(reply.is_some())
    }

    async fn write_batch(
        &self,
        items: Vec<(String, Vec<u8>)>,
        ttl_seconds: u64,
    ) -> CacheResult<bool> {
        if items.is_empty() {
            return Ok(true);
        }

        let mut pipe = redis::pipe();
        pipe.atomic();
        for (key, value) in items {
            pipe.cmd("SET")
                .arg(key)
                .arg(value)
                .arg("EX")
                .arg(ttl_seconds)
                .ignore();
        }

        let mut conn = self.connection.clone();
        let _: () = pipe.query_async(&mut conn).await?;
        Ok(true)
    }

    async fn read(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let mut conn = self.connection.clone();
        let value: Option<Vec<u8>> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }

    async fn read_batch(&self, keys: &[String]) -> CacheResult<Vec<Option<Vec<u8>>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.connection.clone();
        let values: Vec<Option<Vec<u8>>> =
            redis::cmd("MGET").arg(keys).query_async(&mut conn).await?;
        Ok(values)
    }

    async fn remove(&self, key: &str) -> CacheResult<u64> {
        let mut conn = self.connection.clone();
        let removed: u64 = redis::cmd("DEL").arg(key).query_async(&mut conn).await?;
        Ok(removed)
    }

    async fn remove_batch(&self, keys: &[String]) -> CacheResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.connection.clone();
        let removed: u64 = redis::cmd("DEL").arg(keys).query_async(&mut conn).await?;
        Ok(removed)
    }

    async fn scan_keys(&self, pattern: &str) -> CacheResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut cursor = 0;
        loop {
            let (next, page) = self.scan_page(cursor, pattern).await?;
            keys.extend(page);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        // SCAN may report a key more than once
        keys.sort();
        keys.dedup();
        Ok(keys)
    }

    /// Deletes page by page while the cursor advances.
    async fn remove_pattern(&self, pattern: &str) -> CacheResult<u64> {
        let mut removed = 0;
        let mut cursor = 0;
        loop {
            let (next, page) = self.scan_page(cursor, pattern).await?;
            if !page.is_empty() {
                removed += self.remove_batch(&page).await?;
            }
            if next == 0 {
                break;
            }
            cursor = next;
        }
        debug!(pattern, removed, "redis pattern delete finished");
        Ok(removed)
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
