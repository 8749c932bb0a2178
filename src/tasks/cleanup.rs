//! TTL Cleanup Task
//!
//! Background task that periodically purges expired in-memory entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::repository::MemoryStore;

/// Spawns a background task that purges expired entries every
/// `cleanup_interval_secs` seconds.
///
/// Expired entries are already invisible to reads; this only reclaims
/// memory for keys nobody touches again. The returned handle is aborted on
/// shutdown.
///
/// # Example
/// ```ignore
/// let repository = InMemoryRepository::new(1000);
/// let cleanup_handle = spawn_cleanup_task(repository.store(), 1);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(
    store: Arc<RwLock<MemoryStore>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let (removed, remaining) = {
                let mut guard = store.write().await;
                let removed = guard.cleanup_expired();
                (removed, guard.len())
            };

            if removed > 0 {
                info!(removed, remaining, "TTL cleanup removed expired entries");
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let repository = InMemoryRepository::new(100);
        let store = repository.store();

        store
            .write()
            .await
            .write("cache:1:expire_soon".to_string(), b"1".to_vec(), 1);

        let handle = spawn_cleanup_task(store.clone(), 1);

        tokio::time::sleep(Duration::from_millis(2500)).await;

        // Purged by the task, not by a read
        assert_eq!(store.read().await.len(), 0);
        assert_eq!(repository.stats().await.expirations, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let repository = InMemoryRepository::new(100);
        let store = repository.store();

        store
            .write()
            .await
            .write("cache:1:long_lived".to_string(), b"1".to_vec(), 3600);

        let handle = spawn_cleanup_task(store.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(store.read().await.contains("cache:1:long_lived"));

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let repository = InMemoryRepository::new(100);

        let handle = spawn_cleanup_task(repository.store(), 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
