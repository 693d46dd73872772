//! Cache Module
//!
//! The key-value cache that records are persisted to. [`CacheBackend`] is the
//! raw contract; [`MemoryBackend`] keeps entries in process and
//! [`HttpBackend`] talks to a remote cache server. [`CacheClient`] wraps either
//! one with JSON encoding and status-coded results.

mod backend;
mod client;
mod entry;
mod lru;
mod memory;
mod remote;
mod stats;
mod store;


// Re-export public types
pub use backend::CacheBackend;
pub use client::{CacheClient, Lookup, StatusCode};
pub use entry::{CacheEntry, Slot};
pub use lru::LruTracker;
pub use memory::MemoryBackend;
pub use remote::HttpBackend;
pub use stats::CacheStats;
pub use store::CacheStore;

use crate::error::{CacheError, Result};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

/// Converts a TTL in whole seconds into an expiry.
///
/// Zero and negative values mean the entry never expires.
pub fn expiry_from_secs(ttl_seconds: i64) -> Option<u64> {
    (ttl_seconds > 0).then_some(ttl_seconds as u64)
}

/// Rejects empty and oversized keys.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidArgs("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidArgs(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}
