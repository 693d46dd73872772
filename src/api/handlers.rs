//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{CacheStore, MemoryBackend};
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, MemberRequest, MemberResponse, SetRequest,
    SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// Contains the cache store wrapped in Arc<RwLock<>> for thread-safe access.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache store
    pub cache: Arc<RwLock<CacheStore>>,
}

impl AppState {
    /// Creates a new AppState with the given cache store.
    pub fn new(cache: CacheStore) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Serves the store behind an existing in-process backend.
    pub fn from_backend(backend: &MemoryBackend) -> Self {
        Self {
            cache: backend.shared(),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        let store = if config.evict_lru {
            CacheStore::with_lru_eviction(config.max_entries)
        } else {
            CacheStore::new(config.max_entries)
        };
        Self::new(store)
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair; without `ttl` the value never expires.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidArgs(error_msg));
    }

    let mut cache = state.cache.write().await;
    cache.set(req.key.clone(), req.value, req.ttl)?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Responds 404 when the key is absent or expired, 409 when it holds a set.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    // Write lock: reads update LRU order and stats
    let mut cache = state.cache.write().await;
    let value = cache
        .get(&key)?
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;
    let ttl = cache.ttl(&key);

    Ok(Json(GetResponse::new(key, value, ttl)))
}

/// Handler for DELETE /del/:key
///
/// Always succeeds for a valid key; `removed` tells whether anything was there.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let mut cache = state.cache.write().await;
    let removed = cache.delete(&key)?;

    Ok(Json(DeleteResponse::new(key, removed)))
}

/// Handler for POST /sets/:name
pub async fn add_member_handler(
    State(state): State<AppState>,
    Path(set): Path<String>,
    Json(req): Json<MemberRequest>,
) -> Result<Json<MemberResponse>> {
    let mut cache = state.cache.write().await;
    let added = cache.add_member(&set, &req.member)?;

    Ok(Json(MemberResponse::new(set, req.member, added)))
}

/// Handler for GET /sets/:name/:member
pub async fn is_member_handler(
    State(state): State<AppState>,
    Path((set, member)): Path<(String, String)>,
) -> Result<Json<MemberResponse>> {
    let mut cache = state.cache.write().await;
    let found = cache.is_member(&set, &member)?;

    Ok(Json(MemberResponse::new(set, member, found)))
}

/// Handler for DELETE /sets/:name/:member
pub async fn remove_member_handler(
    State(state): State<AppState>,
    Path((set, member)): Path<(String, String)>,
) -> Result<Json<MemberResponse>> {
    let mut cache = state.cache.write().await;
    let removed = cache.remove_member(&set, &member)?;

    Ok(Json(MemberResponse::new(set, member, removed)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(StatsResponse::from(cache.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(CacheStore::new(100))
    }

    fn set_request(key: &str, value: &str, ttl: Option<u64>) -> SetRequest {
        SetRequest {
            key: key.to_string(),
            value: value.to_string(),
            ttl,
        }
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = state();

        let result = set_handler(
            State(state.clone()),
            Json(set_request("test_key", "test_value", Some(60))),
        )
        .await;
        assert!(result.is_ok());

        let response = get_handler(State(state), Path("test_key".to_string()))
            .await
            .unwrap();
        assert_eq!(response.value, "test_value");
        assert!(response.ttl.is_some());
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let result = get_handler(State(state()), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_handler_reports_count() {
        let state = state();
        set_handler(State(state.clone()), Json(set_request("to_delete", "v", None)))
            .await
            .unwrap();

        let first = delete_handler(State(state.clone()), Path("to_delete".to_string()))
            .await
            .unwrap();
        let second = delete_handler(State(state), Path("to_delete".to_string()))
            .await
            .unwrap();

        assert_eq!(first.removed, 1);
        assert_eq!(second.removed, 0);
    }

    #[tokio::test]
    async fn test_member_handlers() {
        let state = state();

        let added = add_member_handler(
            State(state.clone()),
            Path("revoked".to_string()),
            Json(MemberRequest {
                member: "t1".to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(added.result);

        let found = is_member_handler(
            State(state.clone()),
            Path(("revoked".to_string(), "t1".to_string())),
        )
        .await
        .unwrap();
        assert!(found.result);

        let removed = remove_member_handler(
            State(state),
            Path(("revoked".to_string(), "t1".to_string())),
        )
        .await
        .unwrap();
        assert!(removed.result);
    }

    #[tokio::test]
    async fn test_get_on_set_is_wrong_type() {
        let state = state();
        add_member_handler(
            State(state.clone()),
            Path("members".to_string()),
            Json(MemberRequest {
                member: "a".to_string(),
            }),
        )
        .await
        .unwrap();

        let result = get_handler(State(state), Path("members".to_string())).await;
        assert!(matches!(result, Err(CacheError::WrongType(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let response = stats_handler(State(state())).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let result = set_handler(State(state()), Json(set_request("", "value", None))).await;
        assert!(matches!(result, Err(CacheError::InvalidArgs(_))));
    }
}
