//! Remote cache backend.
//!
//! Speaks the REST API served by this crate's cache server binary (see
//! [`crate::api`]), so several application processes can share sessions that
//! outlive any one of them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use tracing::warn;

use crate::cache::CacheBackend;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, ErrorResponse, GetResponse, MemberRequest, MemberResponse, SetRequest,
};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// [`CacheBackend`] that talks HTTP to a remote cache server.
#[derive(Debug)]
pub struct HttpBackend {
    base: Url,
    http: Client,
    closed: AtomicBool,
}

impl HttpBackend {
    /// Connects to the cache server at `base_url` with [`DEFAULT_TIMEOUT`].
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| CacheError::Config(format!("http client: {e}")))?;
        Self::with_client(base_url, http)
    }

    /// Uses a caller-configured reqwest client.
    pub fn with_client(base_url: &str, http: Client) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| CacheError::Config(format!("cache url {base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(CacheError::Config(format!(
                "cache url {base_url} cannot carry a path"
            )));
        }

        Ok(Self {
            base,
            http,
            closed: AtomicBool::new(false),
        })
    }

    /// Builds `base/<segment>/<segment>...`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(CacheError::Closed);
        }
        Ok(())
    }
}

fn transport(error: reqwest::Error) -> CacheError {
    warn!(%error, "cache server request failed");
    CacheError::Unavailable(error.to_string())
}

/// Passes successful responses through and maps error statuses onto the
/// crate's error taxonomy.
async fn check(response: Response, key: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorResponse>()
        .await
        .map(|body| body.error)
        .unwrap_or_else(|_| status.to_string());

    Err(match status {
        StatusCode::NOT_FOUND => CacheError::NotFound(key.to_string()),
        StatusCode::CONFLICT => CacheError::WrongType(key.to_string()),
        StatusCode::BAD_REQUEST => CacheError::InvalidArgs(message),
        _ => CacheError::Unavailable(message),
    })
}

#[async_trait]
impl CacheBackend for HttpBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.ensure_open()?;
        let response = self
            .http
            .get(self.endpoint(&["get", key]))
            .send()
            .await
            .map_err(transport)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: GetResponse = check(response, key)
            .await?
            .json()
            .await
            .map_err(transport)?;
        Ok(Some(body.value))
    }

    async fn set(&self, key: &str, value: String, ttl: Option<u64>) -> Result<()> {
        self.ensure_open()?;
        let request = SetRequest {
            key: key.to_string(),
            value,
            ttl,
        };
        let response = self
            .http
            .put(self.endpoint(&["set"]))
            .json(&request)
            .send()
            .await
            .map_err(transport)?;

        check(response, key).await.map(|_| ())
    }

    async fn delete(&self, key: &str) -> Result<u64> {
        self.ensure_open()?;
        let response = self
            .http
            .delete(self.endpoint(&["del", key]))
            .send()
            .await
            .map_err(transport)?;

        let body: DeleteResponse = check(response, key)
            .await?
            .json()
            .await
            .map_err(transport)?;
        Ok(body.removed)
    }

    async fn add_member(&self, set: &str, member: &str) -> Result<bool> {
        self.ensure_open()?;
        let response = self
            .http
            .post(self.endpoint(&["sets", set]))
            .json(&MemberRequest {
                member: member.to_string(),
            })
            .send()
            .await
            .map_err(transport)?;

        let body: MemberResponse = check(response, set)
            .await?
            .json()
            .await
            .map_err(transport)?;
        Ok(body.result)
    }

    async fn is_member(&self, set: &str, member: &str) -> Result<bool> {
        self.ensure_open()?;
        let response = self
            .http
            .get(self.endpoint(&["sets", set, member]))
            .send()
            .await
            .map_err(transport)?;

        let body: MemberResponse = check(response, set)
            .await?
            .json()
            .await
            .map_err(transport)?;
        Ok(body.result)
    }

    async fn remove_member(&self, set: &str, member: &str) -> Result<bool> {
        self.ensure_open()?;
        let response = self
            .http
            .delete(self.endpoint(&["sets", set, member]))
            .send()
            .await
            .map_err(transport)?;

        let body: MemberResponse = check(response, set)
            .await?
            .json()
            .await
            .map_err(transport)?;
        Ok(body.result)
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
