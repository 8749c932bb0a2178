//! vercache - versioned, namespaced JSON caching over a key-value store
//!
//! Values are stored under `"{prefix}:{version}:{key}"` through a pluggable
//! [`Repository`]: Redis in production, an in-memory store for tests and
//! development. The `api` module serves one cache over HTTP.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod glob;
pub mod key;
pub mod models;
pub mod repository;
pub mod serializer;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cache, CacheConfig};
pub use config::{Config, StoreBackend};
pub use error::{CacheError, CacheResult};
pub use key::{build_key, Version};
pub use repository::{InMemoryRepository, Repository};
#[cfg(feature = "redis")]
pub use repository::RedisRepository;
pub use tasks::spawn_cleanup_task;
