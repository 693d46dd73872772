//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
    /// Remaining TTL in seconds, absent when the value never expires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: impl Into<String>, ttl: Option<u64>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ttl,
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// The key that was addressed
    pub key: String,
    /// Number of keys actually removed (0 or 1)
    pub removed: u64,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>, removed: u64) -> Self {
        Self {
            key: key.into(),
            removed,
        }
    }
}

/// Response body for the set membership operations (/sets/:name...)
///
/// `result` means "newly added" for POST, "is a member" for GET and
/// "was removed" for DELETE.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberResponse {
    pub set: String,
    pub member: String,
    pub result: bool,
}

impl MemberResponse {
    pub fn new(set: impl Into<String>, member: impl Into<String>, result: bool) -> Self {
        Self {
            set: set.into(),
            member: member.into(),
            result,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of LRU evictions
    pub evictions: u64,
    /// Number of entries dropped after their TTL elapsed
    pub expirations: u64,
    /// Current number of keys in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_response_omits_missing_ttl() {
        let resp = GetResponse::new("test_key", "test_value", None);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("test_value"));
        assert!(!json.contains("ttl"));
    }

    #[test]
    fn test_set_response_serialize() {
        let resp = SetResponse::new("my_key");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("my_key"));
        assert!(json.contains("successfully"));
    }

    #[test]
    fn test_delete_response_roundtrip() {
        let json = serde_json::to_string(&DeleteResponse::new("k", 1)).unwrap();
        let back: DeleteResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back.removed, 1);
    }

    #[test]
    fn test_stats_response_from_stats() {
        let mut stats = CacheStats::new();
        for _ in 0..4 {
            stats.record_hit();
        }
        stats.record_miss();
        stats.record_expirations(2);

        let resp = StatsResponse::from(stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.expirations, 2);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_deserialize() {
        let resp: ErrorResponse = serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
        assert_eq!(resp.error, "boom");
    }
}
