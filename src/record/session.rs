//! Web session record, carried by a cookie.

use serde::{Deserialize, Serialize};

use super::{Record, Values};
use crate::id::new_id;

/// `SameSite` attribute of the session cookie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    /// Attribute is omitted and the browser default applies
    #[default]
    Default,
    Lax,
    Strict,
    None,
}

impl SameSite {
    /// Attribute value as written in `Set-Cookie`, if any.
    pub fn attribute(&self) -> Option<&'static str> {
        match self {
            SameSite::Default => None,
            SameSite::Lax => Some("Lax"),
            SameSite::Strict => Some("Strict"),
            SameSite::None => Some("None"),
        }
    }
}

/// Cookie attributes travelling with a session.
///
/// `max_age` doubles as the cache TTL:
/// - `> 0`: cookie and cache entry live that many seconds
/// - `0`: browser-session cookie, cache entry never expires
/// - `< 0`: cookie is deleted immediately
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieOptions {
    pub path: String,
    pub domain: String,
    pub max_age: i64,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            domain: String::new(),
            max_age: 0,
            secure: false,
            http_only: false,
            same_site: SameSite::Default,
        }
    }
}

/// A browser session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Cache key and cookie value
    pub id: String,
    /// Cookie name the session travels under
    pub name: String,
    #[serde(rename = "value", default)]
    pub values: Values,
    pub is_new: bool,
    pub options: CookieOptions,
}

impl Session {
    /// Creates an empty session with a fresh id.
    ///
    /// `options` supplies the cookie attributes; its `max_age` is replaced.
    pub fn new(name: impl Into<String>, max_age: i64, options: &CookieOptions) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            values: Values::new(),
            is_new: true,
            options: CookieOptions {
                max_age,
                ..options.clone()
            },
        }
    }
}

impl Record for Session {
    fn id(&self) -> &str {
        &self.id
    }

    fn max_age(&self) -> i64 {
        self.options.max_age
    }

    fn values(&self) -> &Values {
        &self.values
    }

    fn values_mut(&mut self) -> &mut Values {
        &mut self.values
    }

    fn is_new(&self) -> bool {
        self.is_new
    }

    fn mark_existing(&mut self) {
        self.is_new = false;
    }
}
