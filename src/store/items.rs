//! Item Store
//!
//! Free-standing records kept under caller-chosen keys, with no transport
//! attached.

use crate::cache::{CacheClient, StatusCode};
use crate::config::StoreConfig;
use crate::crypto::Envelope;
use crate::error::Result;
use crate::record::Item;

use super::Vault;

#[derive(Debug, Clone)]
pub struct ItemStore {
    vault: Vault,
}

impl ItemStore {
    pub fn new(cache: CacheClient, envelope: Envelope, default_max_age: i64) -> Result<Self> {
        Ok(Self::from_vault(Vault::new(cache, envelope, default_max_age)?))
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Ok(Self::from_vault(Vault::from_config(config)?))
    }

    pub fn from_vault(vault: Vault) -> Self {
        Self { vault }
    }

    /// Returns the item stored under `id`, or an empty one under the same id.
    ///
    /// `max_age` overrides the store default for a fabricated item; a loaded
    /// item keeps its own.
    pub async fn get(&self, id: &str, max_age: Option<i64>) -> Item {
        match self.vault.resolve::<Item>(Some(id)).await {
            Some(item) => item,
            None => Item::new(id, max_age.unwrap_or(self.vault.default_max_age())),
        }
    }

    /// Loads the item stored under `id`, reporting why it is unavailable.
    pub async fn get_existing(&self, id: &str) -> Result<Item> {
        self.vault.fetch(id).await
    }

    /// Persists `item` under its id. Concurrent saves are last-write-wins.
    pub async fn save(&self, item: &Item) -> Result<StatusCode> {
        self.vault.persist(item).await
    }

    pub async fn delete(&self, item: &Item) -> Result<u64> {
        self.vault.remove(&item.id).await
    }

    pub async fn remember(&self, set: &str, member: &str) -> Result<StatusCode> {
        self.vault.remember(set, member).await
    }

    pub async fn is_remembered(&self, set: &str, member: &str) -> Result<bool> {
        self.vault.is_remembered(set, member).await
    }

    pub async fn forget(&self, set: &str, member: &str) -> Result<bool> {
        self.vault.forget(set, member).await
    }

    pub async fn close(&self) -> Result<()> {
        self.vault.close().await
    }
}
