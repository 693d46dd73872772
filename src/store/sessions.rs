//! Session Store
//!
//! Web sessions whose id travels in a cookie.

use crate::cache::{CacheClient, StatusCode};
use crate::carrier::{CookieSink, IdSource, SessionCookie};
use crate::config::StoreConfig;
use crate::crypto::Envelope;
use crate::error::Result;
use crate::record::{CookieOptions, Session};

use super::Vault;

#[derive(Debug, Clone)]
pub struct SessionStore {
    vault: Vault,
    cookie_defaults: CookieOptions,
}

impl SessionStore {
    pub fn new(cache: CacheClient, envelope: Envelope, default_max_age: i64) -> Result<Self> {
        Ok(Self::from_vault(Vault::new(cache, envelope, default_max_age)?))
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Ok(Self::from_vault(Vault::from_config(config)?))
    }

    pub fn from_vault(vault: Vault) -> Self {
        Self {
            vault,
            cookie_defaults: CookieOptions::default(),
        }
    }

    /// Cookie attributes given to freshly created sessions. Their `max_age`
    /// is ignored in favour of the store's default.
    pub fn with_cookie_defaults(mut self, defaults: CookieOptions) -> Self {
        self.cookie_defaults = defaults;
        self
    }

    /// Returns the session named by the `name` cookie, or a fresh one.
    pub async fn get(&self, source: &impl IdSource, name: &str) -> Session {
        self.get_with_max_age(source, name, self.vault.default_max_age())
            .await
    }

    /// Like [`SessionStore::get`], with `max_age` applied to a fresh session.
    pub async fn get_with_max_age(
        &self,
        source: &impl IdSource,
        name: &str,
        max_age: i64,
    ) -> Session {
        let id = source.id_for(name);
        match self.vault.resolve::<Session>(id.as_deref()).await {
            Some(session) => session,
            None => Session::new(name, max_age, &self.cookie_defaults),
        }
    }

    /// Loads the session stored under `id`, reporting why it is unavailable.
    pub async fn get_existing(&self, id: &str) -> Result<Session> {
        self.vault.fetch(id).await
    }

    /// Persists `session` and, once the write succeeded, sets its cookie.
    ///
    /// Nothing reaches `sink` when encryption or the write fails. Concurrent
    /// saves of one session are last-write-wins.
    pub async fn save(&self, session: &Session, sink: &mut impl CookieSink) -> Result<StatusCode> {
        let status = self.vault.persist(session).await?;
        sink.set_cookie(SessionCookie::new(
            session.name.as_str(),
            session.id.as_str(),
            session.options.clone(),
        ))?;
        Ok(status)
    }

    pub async fn delete(&self, session: &Session) -> Result<u64> {
        self.vault.remove(&session.id).await
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
