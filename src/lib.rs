//! webvault - encrypted, TTL-bounded record storage on top of a key-value cache
//!
//! Sessions, API tokens and free-standing items are serialized, encrypted
//! with AES-256 and kept in a cache with a per-record lifetime. The cache is
//! either in-process ([`cache::MemoryBackend`]) or the bundled cache server
//! reached over HTTP ([`cache::HttpBackend`]), which lets records survive
//! restarts of the application processes using them.

pub mod api;
pub mod cache;
pub mod carrier;
pub mod config;
pub mod crypto;
pub mod error;
pub mod id;
pub mod models;
pub mod record;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheBackend, CacheClient, HttpBackend, Lookup, MemoryBackend, StatusCode};
pub use carrier::{
    CookieSink, HeaderSink, IdSource, RequestCookies, RequestHeaders, SessionCookie,
};
pub use config::{Config, StoreConfig};
pub use crypto::{CipherMode, Envelope};
pub use error::{CacheError, Result};
pub use record::{CookieOptions, Item, Record, SameSite, Session, Token, Value, Values};
pub use store::{ItemStore, SessionStore, TokenStore, Vault};
pub use tasks::spawn_cleanup_task;
