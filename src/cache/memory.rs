//! In-process cache backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheBackend, CacheStats, CacheStore};
use crate::error::{CacheError, Result};

/// [`CacheBackend`] over a shared [`CacheStore`].
///
/// Clones share the same store, so one clone can be handed to the cleanup
/// task or the REST API while another backs a record store.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    store: Arc<RwLock<CacheStore>>,
    closed: Arc<AtomicBool>,
}

impl MemoryBackend {
    /// Creates a backend holding at most `max_entries` keys.
    pub fn new(max_entries: usize) -> Self {
        Self::from_shared(Arc::new(RwLock::new(CacheStore::new(max_entries))))
    }

    /// Wraps an already shared store.
    pub fn from_shared(store: Arc<RwLock<CacheStore>>) -> Self {
        Self {
            store,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the shared store, e.g. for [`crate::tasks::spawn_cleanup_task`].
    pub fn shared(&self) -> Arc<RwLock<CacheStore>> {
        self.store.clone()
    }

    /// Returns a snapshot of the store's counters.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(CacheError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.ensure_open()?;
        // Write lock: reads update LRU order and stats
        self.store.write().await.get(key)
    }

    async fn set(&self, key: &str, value: String, ttl: Option<u64>) -> Result<()> {
        self.ensure_open()?;
        self.store.write().await.set(key.to_string(), value, ttl)
    }

    async fn delete(&self, key: &str) -> Result<u64> {
        self.ensure_open()?;
        self.store.write().await.delete(key)
    }

    async fn add_member(&self, set: &str, member: &str) -> Result<bool> {
        self.ensure_open()?;
        self.store.write().await.add_member(set, member)
    }

    async fn is_member(&self, set: &str, member: &str) -> Result<bool> {
        self.ensure_open()?;
        self.store.write().await.is_member(set, member)
    }

    async fn remove_member(&self, set: &str, member: &str) -> Result<bool> {
        self.ensure_open()?;
        self.store.write().await.remove_member(set, member)
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
