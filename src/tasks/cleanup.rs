//! TTL Cleanup Task
//!
//! Expired entries already read as absent; this task reclaims their memory
//! for keys nobody reads again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that drops expired entries every
/// `cleanup_interval_secs` seconds.
///
/// The returned handle is aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let backend = MemoryBackend::new(1000);
/// let cleanup_handle = spawn_cleanup_task(backend.shared(), 1);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(
    cache: Arc<RwLock<CacheStore>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs(),
            "starting TTL cleanup task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let (removed, remaining) = {
                let mut cache_guard = cache.write().await;
                let removed = cache_guard.cleanup_expired();
                (removed, cache_guard.len())
            };

            if removed > 0 {
                info!(removed, remaining, "TTL cleanup removed expired entries");
            } else {
                debug!(remaining, "TTL cleanup found nothing to remove");
            }
        }
    })
}
