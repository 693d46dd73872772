//! Cache Store Module
//!
//! In-process cache engine combining HashMap storage with LRU tracking, TTL
//! expiration and set-valued keys.

use std::collections::HashMap;

use crate::cache::{validate_key, CacheEntry, CacheStats, LruTracker, Slot, MAX_VALUE_SIZE};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Main cache storage with TTL support and optional LRU eviction.
///
/// Absence is never an error here: reads of missing or expired keys return
/// `Ok(None)`/`Ok(false)`. Errors are reserved for bad arguments, for
/// addressing a key as the wrong kind of value and for a full store.
///
/// A full store first drops entries whose TTL has passed. Live keys are only
/// evicted when the store was built with [`CacheStore::with_lru_eviction`],
/// and set-valued keys never are: they are not tracked by the LRU at all.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of keys allowed
    max_entries: usize,
    /// Whether live text values may be evicted to make room
    evict_live: bool,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `max_entries` keys.
    ///
    /// Writes past capacity fail with [`CacheError::CacheFull`] once no
    /// expired entry is left to drop.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            evict_live: false,
        }
    }

    /// Creates a store that evicts the least recently used text value when
    /// full.
    pub fn with_lru_eviction(max_entries: usize) -> Self {
        Self {
            evict_live: true,
            ..Self::new(max_entries)
        }
    }

    // == Set ==
    /// Stores a text value, replacing whatever the key held before.
    ///
    /// `ttl` of `None` stores the value without expiry. See [`CacheStore`]
    /// for what happens at capacity.
    pub fn set(&mut self, key: String, value: String, ttl: Option<u64>) -> Result<()> {
        validate_key(&key)?;
        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::InvalidArgs(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        self.make_room_for(&key)?;
        self.entries.insert(key.clone(), CacheEntry::text(value, ttl));
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());

        Ok(())
    }

    // == Get ==
    /// Retrieves a text value by key.
    pub fn get(&mut self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;

        match self.live_entry(key) {
            Some(entry) => match &entry.slot {
                Slot::Text(value) => {
                    let value = value.clone();
                    self.stats.record_hit();
                    self.lru.touch(key);
                    Ok(Some(value))
                }
                Slot::Members(_) => Err(CacheError::WrongType(key.to_string())),
            },
            None => {
                self.stats.record_miss();
                Ok(None)
            }
        }
    }

    // == Delete ==
    /// Removes a key of either kind and returns how many keys were removed.
    pub fn delete(&mut self, key: &str) -> Result<u64> {
        validate_key(key)?;

        let removed = match self.entries.remove(key) {
            Some(entry) if !entry.is_expired() => 1,
            _ => 0,
        };
        self.lru.remove(key);
        self.stats.set_total_entries(self.entries.len());

        Ok(removed)
    }

    // == Set Membership ==
    /// Adds `member` to the set at `set`, creating the set if needed.
    ///
    /// Returns true if the member was not already present.
    pub fn add_member(&mut self, set: &str, member: &str) -> Result<bool> {
        validate_key(set)?;

        if self.live_entry(set).is_none() {
            self.make_room_for(set)?;
            self.entries.insert(set.to_string(), CacheEntry::members());
        }

        let added = match self.entries.get_mut(set).map(|e| &mut e.slot) {
            Some(Slot::Members(members)) => members.insert(member.to_string()),
            Some(Slot::Text(_)) => return Err(CacheError::WrongType(set.to_string())),
            None => return Err(CacheError::Internal(format!("set {} vanished", set))),
        };

        self.stats.set_total_entries(self.entries.len());
        Ok(added)
    }

    /// Checks whether `member` belongs to the set at `set`.
    pub fn is_member(&mut self, set: &str, member: &str) -> Result<bool> {
        validate_key(set)?;

        let found = match self.live_entry(set).map(|e| &e.slot) {
            Some(Slot::Members(members)) => members.contains(member),
            Some(Slot::Text(_)) => return Err(CacheError::WrongType(set.to_string())),
            None => false,
        };

        if found {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        Ok(found)
    }

    /// Removes `member` from the set at `set`. An emptied set is deleted.
    ///
    /// Returns true if the member was present.
    pub fn remove_member(&mut self, set: &str, member: &str) -> Result<bool> {
        validate_key(set)?;

        let (removed, now_empty) = match self.live_entry(set) {
            Some(entry) => match &mut entry.slot {
                Slot::Members(members) => (members.remove(member), members.is_empty()),
                Slot::Text(_) => return Err(CacheError::WrongType(set.to_string())),
            },
            None => (false, false),
        };

        if now_empty {
            self.entries.remove(set);
            self.lru.remove(set);
        }
        self.stats.set_total_entries(self.entries.len());
        Ok(removed)
    }

    // == TTL ==
    /// Returns the remaining TTL in seconds, `None` when the key is absent or
    /// has no expiry.
    pub fn ttl(&mut self, key: &str) -> Option<u64> {
        self.live_entry(key).and_then(|entry| entry.ttl_remaining())
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.record_expirations(expired_keys.len());
        self.stats.set_total_entries(self.entries.len());
        expired_keys.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry at `key` if present and unexpired. An expired entry
    /// is dropped on the spot.
    fn live_entry(&mut self, key: &str) -> Option<&mut CacheEntry> {
        if self.entries.get(key).is_some_and(CacheEntry::is_expired) {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.entries.len());
        }
        self.entries.get_mut(key)
    }

    /// Frees a slot when inserting `key` would exceed capacity: expired
    /// entries go first, then (if enabled) the least recently used text value.
    fn make_room_for(&mut self, key: &str) -> Result<()> {
        if self.entries.contains_key(key) || self.entries.len() < self.max_entries {
            return Ok(());
        }
        if self.cleanup_expired() > 0 {
            return Ok(());
        }
        if !self.evict_live {
            return Err(CacheError::CacheFull(format!(
                "all {} keys are live",
                self.max_entries
            )));
        }

        match self.lru.evict_oldest() {
            Some(evicted) => {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                Ok(())
            }
            None => Err(CacheError::CacheFull(
                "only set-valued keys are left".to_string(),
            )),
        }
    }
}
