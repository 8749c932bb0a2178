//! Cache Service
//!
//! Resolves physical keys, encodes values and delegates to the repository.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::CacheConfig;
use crate::error::{CacheError, CacheResult};
use crate::key::{self, Version};
use crate::repository::Repository;
use crate::serializer;

// == Cache ==
/// Versioned, namespaced JSON cache.
///
/// Every physical key is `"{prefix}:{version}:{key}"`; the `version`
/// argument of each operation overrides the configured default. The
/// repository handle is shared, so clones are cheap and several caches may
/// sit on one repository.
#[derive(Clone)]
pub struct Cache {
    repository: Arc<dyn Repository>,
    config: CacheConfig,
}

impl Cache {
    pub fn new(repository: Arc<dyn Repository>, config: CacheConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn repository(&self) -> &Arc<dyn Repository> {
        &self.repository
    }

    /// Physical key for `key` under `version` (or the default version).
    pub fn make_key(&self, key: &str, version: Option<&Version>) -> String {
        key::build_key(&self.config.key_prefix, self.resolve(version), key)
    }

    fn resolve<'a>(&'a self, version: Option<&'a Version>) -> &'a Version {
        version.unwrap_or(&self.config.version)
    }

    fn make_keys<K: AsRef<str>>(&self, keys: &[K], version: Option<&Version>) -> Vec<String> {
        keys.iter()
            .map(|key| self.make_key(key.as_ref(), version))
            .collect()
    }

    // == Set ==
    /// Stores `value` at `key` for `expire` seconds, overwriting.
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        expire: u64,
        version: Option<&Version>,
    ) -> CacheResult<bool> {
        validate_expire(expire)?;
        let physical = self.make_key(key, version);
        let payload = serializer::dumps(value)?;

        debug!(key = %physical, expire, "cache set");
        self.repository.write(&physical, payload, expire).await
    }

    /// Stores `value` only if `key` does not exist yet.
    ///
    /// Returns false if the key already existed.
    pub async fn set_nx<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        expire: u64,
        version: Option<&Version>,
    ) -> CacheResult<bool> {
        validate_expire(expire)?;
        let physical = self.make_key(key, version);
        let payload = serializer::dumps(value)?;

        let written = self
            .repository
            .write_if_absent(&physical, payload, expire)
            .await?;
        debug!(key = %physical, expire, written, "cache set_nx");
        Ok(written)
    }

    /// Stores every `(key, value)` pair with the same expiry, as one batch.
    ///
    /// All values are encoded before anything is written.
    pub async fn set_many<I, K, V>(
        &self,
        data: I,
        expire: u64,
        version: Option<&Version>,
    ) -> CacheResult<bool>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Serialize,
    {
        validate_expire(expire)?;
        let items = data
            .into_iter()
            .map(|(key, value)| {
                let payload = serializer::dumps(&value)?;
                Ok((self.make_key(key.as_ref(), version), payload))
            })
            .collect::<CacheResult<Vec<_>>>()?;

        if items.is_empty() {
            return Ok(true);
        }

        debug!(count = items.len(), expire, "cache set_many");
        self.repository.write_batch(items, expire).await
    }

    // == Get ==
    /// Returns the value at `key`, or `None` if missing or expired.
    pub async fn get(&self, key: &str, version: Option<&Version>) -> CacheResult<Option<Value>> {
        self.get_as(key, version).await
    }

    /// Like [`get`](Self::get), decoding into `T`.
    pub async fn get_as<T: DeserializeOwned>(
        &self,
        key: &str,
        version: Option<&Version>,
    ) -> CacheResult<Option<T>> {
        let physical = self.make_key(key, version);
        let raw = self.repository.read(&physical).await?;

        debug!(key = %physical, hit = raw.is_some(), "cache get");
        serializer::loads_opt(raw)
    }

    /// Returns one entry per input key, in input order.
    pub async fn get_many<K: AsRef<str>>(
        &self,
        keys: &[K],
        version: Option<&Version>,
    ) -> CacheResult<Vec<Option<Value>>> {
        self.get_many_as(keys, version).await
    }

    /// Like [`get_many`](Self::get_many), decoding into `T`.
    pub async fn get_many_as<T: DeserializeOwned, K: AsRef<str>>(
        &self,
        keys: &[K],
        version: Option<&Version>,
    ) -> CacheResult<Vec<Option<T>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let physical = self.make_keys(keys, version);
        let raw = self.repository.read_batch(&physical).await?;
        if raw.len() != physical.len() {
            return Err(CacheError::Connectivity(format!(
                "batch read returned {} values for {} keys",
                raw.len(),
                physical.len()
            )));
        }

        debug!(count = physical.len(), "cache get_many");
        raw.into_iter().map(serializer::loads_opt).collect()
    }

    // == Delete ==
    /// Removes `key`, returning 1 if it existed and 0 otherwise.
    pub async fn delete(&self, key: &str, version: Option<&Version>) -> CacheResult<u64> {
        let physical = self.make_key(key, version);
        let removed = self.repository.remove(&physical).await?;

        debug!(key = %physical, removed, "cache delete");
        Ok(removed)
    }

    /// Removes every key, returning how many existed.
    pub async fn delete_many<K: AsRef<str>>(
        &self,
        keys: &[K],
        version: Option<&Version>,
    ) -> CacheResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }

        let physical = self.make_keys(keys, version);
        let removed = self.repository.remove_batch(&physical).await?;

        debug!(count = physical.len(), removed, "cache delete_many");
        Ok(removed)
    }

    /// Removes every key of this namespace whose logical key matches `pattern`.
    ///
    /// The pattern is a glob over logical keys; the prefix and version are
    /// prepended before the store is scanned.
    pub async fn delete_pattern(
        &self,
        pattern: &str,
        version: Option<&Version>,
    ) -> CacheResult<u64> {
        let physical = key::build_pattern(&self.config.key_prefix, self.resolve(version), pattern);
        let removed = self.repository.remove_pattern(&physical).await?;

        debug!(pattern = %physical, removed, "cache delete_pattern");
        Ok(removed)
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("backend", &self.repository.backend_name())
            .field("config", &self.config)
            .finish()
    }
}

fn validate_expire(expire: u64) -> CacheResult<()> {
    if expire == 0 {
        return Err(CacheError::InvalidArgument(
            "expire must be a positive number of seconds".to_string(),
        ));
    }
    Ok(())
}
