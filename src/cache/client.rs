//! Cache Client
//!
//! Typed wrapper over a [`CacheBackend`]: values are JSON encoded on the way
//! in and decoded on the way out, and every operation reports one of the
//! [`StatusCode`]s so callers can tell "no data" from "operation failed".

use std::fmt;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::cache::{expiry_from_secs, validate_key, CacheBackend};
use crate::error::{CacheError, Result};

// == Status Code ==
/// Outcome of a cache operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// A record was found
    Found,
    /// No record under the key
    NotFound,
    /// The read itself failed
    FetchError,
    /// The write succeeded
    Updated,
    /// The value could not be encoded before writing
    MarshalError,
    /// The stored payload could not be decoded into the requested type
    UnmarshalError,
    /// The write itself failed
    UpdateError,
    /// The caller passed unusable arguments
    InvalidArgs,
}

impl StatusCode {
    /// Status reported for a failed read.
    pub fn of_read_error(error: &CacheError) -> Self {
        match error {
            CacheError::InvalidArgs(_) => StatusCode::InvalidArgs,
            CacheError::Unmarshal(_) => StatusCode::UnmarshalError,
            CacheError::NotFound(_) => StatusCode::NotFound,
            _ => StatusCode::FetchError,
        }
    }

    /// Status reported for a failed write.
    pub fn of_write_error(error: &CacheError) -> Self {
        match error {
            CacheError::InvalidArgs(_) => StatusCode::InvalidArgs,
            CacheError::Marshal(_) => StatusCode::MarshalError,
            _ => StatusCode::UpdateError,
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// == Lookup ==
/// Result of a typed read.
#[derive(Debug)]
pub enum Lookup<T> {
    /// The key held a value that decoded into `T`
    Found(T),
    /// The key is absent or expired
    NotFound,
    /// The read or the decode failed
    Failed(CacheError),
}

impl<T> Lookup<T> {
    pub fn status(&self) -> StatusCode {
        match self {
            Lookup::Found(_) => StatusCode::Found,
            Lookup::NotFound => StatusCode::NotFound,
            Lookup::Failed(error) => StatusCode::of_read_error(error),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    /// Converts into a `Result`, reporting absence as `CacheError::NotFound`.
    pub fn into_result(self, key: &str) -> Result<T> {
        match self {
            Lookup::Found(value) => Ok(value),
            Lookup::NotFound => Err(CacheError::NotFound(key.to_string())),
            Lookup::Failed(error) => Err(error),
        }
    }
}

// == Cache Client ==
/// JSON-encoding client over any [`CacheBackend`].
#[derive(Clone)]
pub struct CacheClient {
    backend: Arc<dyn CacheBackend>,
}

impl fmt::Debug for CacheClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheClient").finish_non_exhaustive()
    }
}

impl CacheClient {
    pub fn new(backend: impl CacheBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn from_arc(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    // == Set ==
    /// Writes `value` with no expiry.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<StatusCode> {
        self.set_with_expiry(key, value, 0).await
    }

    /// Writes `value`, evicting it `ttl_seconds` after the write.
    ///
    /// A TTL of zero or less stores the value without expiry.
    pub async fn set_with_expiry<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: i64,
    ) -> Result<StatusCode> {
        validate_key(key)?;
        let payload = serde_json::to_string(value).map_err(CacheError::Marshal)?;

        self.backend
            .set(key, payload, expiry_from_secs(ttl_seconds))
            .await?;
        debug!(key, ttl_seconds, "cache write");

        Ok(StatusCode::Updated)
    }

    // == Get ==
    /// Reads and decodes the value at `key`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Lookup<T> {
        if let Err(error) = validate_key(key) {
            return Lookup::Failed(error);
        }

        match self.backend.get(key).await {
            Ok(Some(payload)) => match serde_json::from_str(&payload) {
                Ok(value) => Lookup::Found(value),
                Err(error) => Lookup::Failed(CacheError::Unmarshal(error)),
            },
            Ok(None) => Lookup::NotFound,
            Err(error) => Lookup::Failed(error),
        }
    }

    // == Delete ==
    /// Removes `key`, returning the number of keys removed.
    pub async fn delete(&self, key: &str) -> Result<u64> {
        validate_key(key)?;
        self.backend.delete(key).await
    }

    // == Sets ==
    /// Adds `member` to the named set, creating it if needed.
    pub async fn add_to_set(&self, set: &str, member: &str) -> Result<StatusCode> {
        validate_key(set)?;
        self.backend.add_member(set, member).await?;
        Ok(StatusCode::Updated)
    }

    /// Returns `Found` when `member` is in the named set, `NotFound` otherwise.
    pub async fn is_in_set(&self, set: &str, member: &str) -> Result<StatusCode> {
        validate_key(set)?;
        let found = self.backend.is_member(set, member).await?;
        Ok(if found {
            StatusCode::Found
        } else {
            StatusCode::NotFound
        })
    }

    /// Removes `member` from the named set. Returns whether it was present.
    pub async fn remove_from_set(&self, set: &str, member: &str) -> Result<bool> {
        validate_key(set)?;
        self.backend.remove_member(set, member).await
    }

    pub async fn close(&self) -> Result<()> {
        self.backend.close().await
    }
}
