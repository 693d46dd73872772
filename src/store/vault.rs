//! Vault
//!
//! The pipeline shared by every record store: records are serialized to JSON,
//! encrypted with the store's [`Envelope`] and written through a
//! [`CacheClient`] with the record's max age as TTL. Reads run the same steps
//! backwards.
//!
//! Two read policies are offered:
//! - [`Vault::fetch`] is strict and surfaces every failure.
//! - [`Vault::resolve`] is resilient: any failure (missing id, miss, backend
//!   error, undecryptable or undecodable payload) yields `None` and the caller
//!   fabricates a fresh record. A backend outage therefore demotes existing
//!   records to new ones; this is expected.

use tracing::{debug, warn};

use crate::cache::{CacheClient, HttpBackend, Lookup, StatusCode};
use crate::config::StoreConfig;
use crate::crypto::{Envelope, KEY_LEN};
use crate::error::{CacheError, Result};
use crate::record::Record;

#[derive(Debug, Clone)]
pub struct Vault {
    cache: CacheClient,
    envelope: Envelope,
    default_max_age: i64,
}

impl Vault {
    /// Builds a vault over `cache`.
    ///
    /// Fails with [`CacheError::Config`] when the envelope key is unusable, so
    /// a misconfigured store is caught before the first request.
    pub fn new(cache: CacheClient, envelope: Envelope, default_max_age: i64) -> Result<Self> {
        if !envelope.has_valid_key() {
            return Err(CacheError::Config(format!(
                "secret key must be {KEY_LEN} bytes"
            )));
        }

        Ok(Self {
            cache,
            envelope,
            default_max_age,
        })
    }

    /// Connects to the cache server named in `config`.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let backend = HttpBackend::new(&config.cache_url)?;
        Self::new(
            CacheClient::new(backend),
            Envelope::new(&config.secret_key, config.cipher_mode),
            config.default_max_age,
        )
    }

    pub fn default_max_age(&self) -> i64 {
        self.default_max_age
    }

    pub fn cache(&self) -> &CacheClient {
        &self.cache
    }

    // == Encoding ==
    /// Serializes and encrypts `record`.
    pub fn seal<R: Record>(&self, record: &R) -> Result<String> {
        let json = serde_json::to_string(record).map_err(CacheError::Marshal)?;
        Ok(self.envelope.encrypt(&json)?)
    }

    /// Decrypts and deserializes a sealed record, flagging it as existing.
    pub fn open<R: Record>(&self, sealed: &str) -> Result<R> {
        let json = self.envelope.decrypt(sealed)?;
        let mut record: R = serde_json::from_str(&json).map_err(CacheError::Unmarshal)?;
        record.mark_existing();
        Ok(record)
    }

    // == Reads ==
    /// Loads the record stored under `id`, reporting every failure.
    pub async fn fetch<R: Record>(&self, id: &str) -> Result<R> {
        let sealed: String = self.cache.get(id).await.into_result(id)?;
        self.open(&sealed)
    }

    /// Loads the record stored under `id`, or `None` when it cannot be had.
    pub async fn resolve<R: Record>(&self, id: Option<&str>) -> Option<R> {
        let Some(id) = id else {
            debug!("no record id supplied");
            return None;
        };

        match self.cache.get::<String>(id).await {
            Lookup::Found(sealed) => match self.open(&sealed) {
                Ok(record) => {
                    debug!(id, "record loaded");
                    Some(record)
                }
                Err(error) => {
                    warn!(id, %error, "stored record is unreadable");
                    None
                }
            },
            Lookup::NotFound => {
                debug!(id, "record missing or expired");
                None
            }
            Lookup::Failed(error) => {
                warn!(id, %error, "record lookup failed");
                None
            }
        }
    }

    // == Writes ==
    /// Seals `record` and writes it with its max age as TTL.
    ///
    /// Concurrent saves of the same id are not coordinated: the last write
    /// wins.
    pub async fn persist<R: Record>(&self, record: &R) -> Result<StatusCode> {
        let sealed = self.seal(record)?;
        self.cache
            .set_with_expiry(record.id(), &sealed, record.max_age())
            .await
    }

    /// Removes the record stored under `id`.
    pub async fn remove(&self, id: &str) -> Result<u64> {
        self.cache.delete(id).await
    }

    // == Membership ==
    pub async fn remember(&self, set: &str, member: &str) -> Result<StatusCode> {
        self.cache.add_to_set(set, member).await
    }

    pub async fn is_remembered(&self, set: &str, member: &str) -> Result<bool> {
        Ok(self.cache.is_in_set(set, member).await? == StatusCode::Found)
    }

    pub async fn forget(&self, set: &str, member: &str) -> Result<bool> {
        self.cache.remove_from_set(set, member).await
    }

    pub async fn close(&self) -> Result<()> {
        self.cache.close().await
    }
}
