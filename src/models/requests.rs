//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::{Deserialize, Serialize};

use crate::cache::validate_key;

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: The value to store
/// - `ttl`: Optional TTL in seconds; absent means the value never expires
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: String,
    /// Optional TTL in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key).err().map(|e| e.to_string())
    }
}

/// Request body for adding a set member (POST /sets/:name)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRequest {
    pub member: String,
}
