//! Token Store
//!
//! API tokens whose id travels in a request/response header.

use crate::cache::{CacheClient, StatusCode};
use crate::carrier::{HeaderSink, IdSource};
use crate::config::StoreConfig;
use crate::crypto::Envelope;
use crate::error::{CacheError, Result};
use crate::record::Token;

use super::Vault;

#[derive(Debug, Clone)]
pub struct TokenStore {
    vault: Vault,
}

impl TokenStore {
    pub fn new(cache: CacheClient, envelope: Envelope, default_max_age: i64) -> Result<Self> {
        Ok(Self::from_vault(Vault::new(cache, envelope, default_max_age)?))
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Ok(Self::from_vault(Vault::from_config(config)?))
    }

    pub fn from_vault(vault: Vault) -> Self {
        Self { vault }
    }

    /// Returns the token named by the `name` header, or a fresh one.
    pub async fn get(&self, source: &impl IdSource, name: &str) -> Token {
        self.get_with_max_age(source, name, self.vault.default_max_age())
            .await
    }

    /// Like [`TokenStore::get`], with `max_age` applied to a fresh token.
    pub async fn get_with_max_age(
        &self,
        source: &impl IdSource,
        name: &str,
        max_age: i64,
    ) -> Token {
        let id = source.id_for(name);
        match self.vault.resolve::<Token>(id.as_deref()).await {
            Some(token) => token,
            None => Token::new(name, max_age),
        }
    }

    /// Loads the token stored under `id`.
    pub async fn get_existing(&self, id: &str) -> Result<Token> {
        self.vault.fetch(id).await
    }

    /// Loads the token named by the `name` header.
    ///
    /// A missing header is reported as [`CacheError::NotFound`].
    pub async fn get_existing_from(&self, source: &impl IdSource, name: &str) -> Result<Token> {
        let id = source
            .id_for(name)
            .ok_or_else(|| CacheError::NotFound(format!("header {name}")))?;
        self.vault.fetch(&id).await
    }

    /// Persists `token` and, once the write succeeded, sets its header.
    ///
    /// Concurrent saves of one token are last-write-wins.
    pub async fn save(&self, token: &Token, sink: &mut impl HeaderSink) -> Result<StatusCode> {
        let status = self.vault.persist(token).await?;
        sink.set_header(&token.name, &token.id)?;
        Ok(status)
    }

    pub async fn delete(&self, token: &Token) -> Result<u64> {
        self.vault.remove(&token.id).await
    }

    pub async fn remember(&self, set: &str, member: &str) -> Result<StatusCode> {
        self.vault.remember(set, member).await
    }

    pub async fn is_remembered(&self, set: &str, member: &str) -> Result<bool> {
        self.vault.is_remembered(set, member).await
    }

    pub async fn forget(&self, set: &str, member: &str) -> Result<bool> {
        self.vault.forget(set, member).await
    }

    pub async fn close(&self) -> Result<()> {
        self.vault.close().await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::http::{HeaderMap, HeaderValue};

    use super::*;
    use crate::cache::{CacheBackend, MemoryBackend};
    use crate::carrier::RequestHeaders;
    use crate::crypto::CipherMode;

    const KEY: &[u8; 32] = b"0123456789abcdef0123456789abcdef";
    const HEADER: &str = "X-Auth-Token";

    fn store() -> TokenStore {
        TokenStore::new(
            CacheClient::new(MemoryBackend::new(100)),
            Envelope::new(KEY, CipherMode::Cfb),
            300,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_header_round_trip() {
        let store = store();
        let empty = HeaderMap::new();
        let mut token = store.get(&RequestHeaders(&empty), HEADER).await;
        assert!(token.is_new);
        token.values.store_int("uid", 7);

        let mut response = HeaderMap::new();
        store.save(&token, &mut response).await.unwrap();
        assert_eq!(response.get(HEADER).unwrap(), token.id.as_str());

        // The client echoes the header back
        let mut request = HeaderMap::new();
        request.insert(HEADER, HeaderValue::from_str(&token.id).unwrap());

        let loaded = store.get(&RequestHeaders(&request), HEADER).await;
        assert!(!loaded.is_new);
        assert_eq!(loaded.values.int("uid"), Some(7));

        let strict = store
            .get_existing_from(&RequestHeaders(&request), HEADER)
            .await
            .unwrap();
        assert_eq!(strict.id, token.id);
    }

    #[tokio::test]
    async fn test_missing_header_is_not_found() {
        let store = store();
        let err = store
            .get_existing_from(&HashMap::<String, String>::new(), HEADER)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_revocation_list() {
        let store = store();
        let token = store.get(&HashMap::<String, String>::new(), HEADER).await;

        store.remember("revoked", &token.id).await.unwrap();
        assert!(store.is_remembered("revoked", &token.id).await.unwrap());
        assert!(store.forget("revoked", &token.id).await.unwrap());
        assert!(!store.is_remembered("revoked", &token.id).await.unwrap());
    }

    fn store_over(backend: &MemoryBackend) -> TokenStore {
        TokenStore::new(
            CacheClient::new(backend.clone()),
            Envelope::new(KEY, CipherMode::Cbc),
            600,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_revocations_survive_a_full_cache() {
        let backend = MemoryBackend::new(3);
        let store = store_over(&backend);
        store.remember("revoked", "t1").await.unwrap();

        let mut saved = 0;
        for _ in 0..3 {
            let token = store.get(&HashMap::<String, String>::new(), HEADER).await;
            let mut response = HashMap::<String, String>::new();
            match store.save(&token, &mut response).await {
                Ok(_) => saved += 1,
                Err(err) => {
                    assert_eq!(StatusCode::of_write_error(&err), StatusCode::UpdateError);
                    assert!(response.is_empty());
                }
            }
        }

        assert_eq!(saved, 2);
        assert!(store.is_remembered("revoked", "t1").await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_entry_gives_way_to_live_token() {
        let backend = MemoryBackend::new(2);
        let store = store_over(&backend);

        let live = store.get(&HashMap::<String, String>::new(), HEADER).await;
        store.save(&live, &mut HashMap::<String, String>::new()).await.unwrap();
        backend.set("stale", "\"x\"".to_string(), Some(1)).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

        let next = store.get(&HashMap::<String, String>::new(), HEADER).await;
        store.save(&next, &mut HashMap::<String, String>::new()).await.unwrap();

        assert!(store.get_existing(&live.id).await.is_ok());
        assert!(store.get_existing(&next.id).await.is_ok());
        assert_eq!(backend.stats().await.evictions, 0);
    }
}
