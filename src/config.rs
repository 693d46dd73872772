//! Configuration Module
//!
//! Loads cache server and record store settings from environment variables.

use std::env;

use crate::crypto::{CipherMode, KEY_LEN};
use crate::error::{CacheError, Result};

/// Cache server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Evict least recently used values instead of rejecting writes when full
    pub evict_lru: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `EVICT_LRU` - Evict live values when full (default: false)
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            max_entries: var("MAX_ENTRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_entries),
            server_port: var("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            cleanup_interval: var("CLEANUP_INTERVAL")
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.cleanup_interval),
            evict_lru: var("EVICT_LRU")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.evict_lru),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            server_port: 3000,
            cleanup_interval: 1,
            evict_lru: false,
        }
    }
}

/// Record store configuration.
///
/// Unlike [`Config`], bad values are errors: a store with the wrong key or
/// cipher mode would silently fail every read.
#[derive(Clone)]
pub struct StoreConfig {
    /// AES-256 key, exactly 32 bytes
    pub secret_key: String,
    pub cipher_mode: CipherMode,
    /// Max age in seconds given to fresh records
    pub default_max_age: i64,
    /// Base URL of the cache server
    pub cache_url: String,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("secret_key", &"<redacted>")
            .field("cipher_mode", &self.cipher_mode)
            .field("default_max_age", &self.default_max_age)
            .field("cache_url", &self.cache_url)
            .finish()
    }
}

impl StoreConfig {
    pub const DEFAULT_MAX_AGE: i64 = 7200;
    pub const DEFAULT_CACHE_URL: &'static str = "http://127.0.0.1:3000";

    /// Loads the store configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `WEBVAULT_SECRET_KEY` - 32-byte encryption key (required)
    /// - `WEBVAULT_CIPHER_MODE` - `cbc` or `cfb` (default: cbc)
    /// - `WEBVAULT_DEFAULT_MAX_AGE` - Record max age in seconds (default: 7200)
    /// - `WEBVAULT_CACHE_URL` - Cache server URL (default: http://127.0.0.1:3000)
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let secret_key = var("WEBVAULT_SECRET_KEY")
            .ok_or_else(|| CacheError::Config("WEBVAULT_SECRET_KEY is not set".to_string()))?;
        if secret_key.len() != KEY_LEN {
            return Err(CacheError::Config(format!(
                "WEBVAULT_SECRET_KEY must be {KEY_LEN} bytes, got {}",
                secret_key.len()
            )));
        }

        let cipher_mode = match var("WEBVAULT_CIPHER_MODE") {
            Some(mode) => mode
                .parse()
                .map_err(|e| CacheError::Config(format!("WEBVAULT_CIPHER_MODE: {e}")))?,
            None => CipherMode::default(),
        };

        let default_max_age = match var("WEBVAULT_DEFAULT_MAX_AGE") {
            Some(age) => age.parse().map_err(|e| {
                CacheError::Config(format!("WEBVAULT_DEFAULT_MAX_AGE {age:?}: {e}"))
            })?,
            None => Self::DEFAULT_MAX_AGE,
        };

        Ok(Self {
            secret_key,
            cipher_mode,
            default_max_age,
            cache_url: var("WEBVAULT_CACHE_URL")
                .unwrap_or_else(|| Self::DEFAULT_CACHE_URL.to_string()),
        })
    }
}
