//! Cache Backend Contract
//!
//! The raw operations a key-value cache must offer. Implementations deal in
//! text payloads only; encoding lives in [`crate::cache::CacheClient`].

use async_trait::async_trait;

use crate::error::Result;

/// A remote or in-process key-value cache with expiry and set values.
///
/// Implementations must be safe to share between tasks. Absence is reported
/// as `Ok(None)` / `Ok(false)`, never as an error.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Reads the text value at `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` at `key`. `ttl` of `None` means no expiry.
    async fn set(&self, key: &str, value: String, ttl: Option<u64>) -> Result<()>;

    /// Removes `key` and returns the number of keys removed (0 or 1).
    async fn delete(&self, key: &str) -> Result<u64>;

    /// Adds `member` to the set at `set`. Returns true if it was newly added.
    async fn add_member(&self, set: &str, member: &str) -> Result<bool>;

    /// Checks whether `member` belongs to the set at `set`.
    async fn is_member(&self, set: &str, member: &str) -> Result<bool>;

    /// Removes `member` from the set at `set`. Returns true if it was present.
    async fn remove_member(&self, set: &str, member: &str) -> Result<bool>;

    /// Releases the connection. Further calls fail with `CacheError::Closed`.
    async fn close(&self) -> Result<()>;
}
