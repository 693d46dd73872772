//! Error types for the record store and cache server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::crypto::CryptoError;

// == Cache Error Enum ==
/// Unified error type for cache operations and record persistence.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// The cache could not be reached or refused the operation
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// A plain value was addressed as a set, or the other way round
    #[error("Wrong kind of value at key: {0}")]
    WrongType(String),

    /// Caller misuse (empty key, oversized key, bad set name)
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// Cache is full and eviction failed
    #[error("Cache full: {0}")]
    CacheFull(String),

    /// A value could not be serialized before writing
    #[error("Failed to serialize value: {0}")]
    Marshal(#[source] serde_json::Error),

    /// A stored payload could not be deserialized into the requested shape
    #[error("Failed to deserialize value: {0}")]
    Unmarshal(#[source] serde_json::Error),

    /// Encryption or decryption failed
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Misconfiguration detected while building a store
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The backend was used after `close`
    #[error("Cache connection is closed")]
    Closed,

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// True when the error means "nothing stored under this key".
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::WrongType(_) => StatusCode::CONFLICT,
            CacheError::InvalidArgs(_) => StatusCode::BAD_REQUEST,
            CacheError::CacheFull(_) | CacheError::Unavailable(_) | CacheError::Closed => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
