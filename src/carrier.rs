//! Identifier carriers
//!
//! Record ids travel between client and server in a named cookie (sessions)
//! or a named header (tokens). The stores only see the narrow traits below:
//! an [`IdSource`] to read the incoming id and a [`CookieSink`] /
//! [`HeaderSink`] to hand the id back after a successful save.

use std::collections::HashMap;
use std::fmt;

use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, HeaderName, HeaderValue,
};
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::error::{CacheError, Result};
use crate::record::CookieOptions;

const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Largest span chrono can represent in seconds
const MAX_SECONDS: i64 = i64::MAX / 1_000;

// == Sources ==
/// Read side of a carrier: looks up the record id sent under `name`.
pub trait IdSource {
    /// Returns the id, or `None` when it is missing or empty.
    fn id_for(&self, name: &str) -> Option<String>;
}

/// Cookies of an incoming request.
#[derive(Debug, Clone, Copy)]
pub struct RequestCookies<'a>(pub &'a HeaderMap);

impl IdSource for RequestCookies<'_> {
    fn id_for(&self, name: &str) -> Option<String> {
        self.0
            .get_all(COOKIE)
            .iter()
            .filter_map(|header| header.to_str().ok())
            .flat_map(|line| line.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.trim().trim_matches('"').to_string())
            .filter(|value| !value.is_empty())
    }
}

/// Headers of an incoming request.
#[derive(Debug, Clone, Copy)]
pub struct RequestHeaders<'a>(pub &'a HeaderMap);

impl IdSource for RequestHeaders<'_> {
    fn id_for(&self, name: &str) -> Option<String> {
        self.0
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }
}

impl IdSource for HashMap<String, String> {
    fn id_for(&self, name: &str) -> Option<String> {
        self.get(name).filter(|value| !value.is_empty()).cloned()
    }
}

// == Session Cookie ==
/// A `Set-Cookie` carrying a session id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub options: CookieOptions,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>, options: CookieOptions) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            options,
        }
    }

    /// Renders the header value with `Expires` computed from `now`.
    pub fn render_at(&self, now: DateTime<Utc>) -> String {
        let options = &self.options;
        let mut out = format!("{}={}", self.name, self.value);

        if !options.path.is_empty() {
            out.push_str(&format!("; Path={}", options.path));
        }
        if !options.domain.is_empty() {
            out.push_str(&format!("; Domain={}", options.domain));
        }

        if options.max_age > 0 {
            let expires = now
                .checked_add_signed(Duration::seconds(options.max_age.min(MAX_SECONDS)))
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
            out.push_str(&format!(
                "; Max-Age={}; Expires={}",
                options.max_age,
                expires.format(HTTP_DATE)
            ));
        } else if options.max_age < 0 {
            // Already in the past: the browser drops the cookie
            let expires = Utc.timestamp_opt(1, 0).single().unwrap_or(now);
            out.push_str(&format!("; Max-Age=0; Expires={}", expires.format(HTTP_DATE)));
        }

        if options.http_only {
            out.push_str("; HttpOnly");
        }
        if options.secure {
            out.push_str("; Secure");
        }
        if let Some(same_site) = options.same_site.attribute() {
            out.push_str(&format!("; SameSite={same_site}"));
        }

        out
    }
}

impl fmt::Display for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_at(Utc::now()))
    }
}

// == Sinks ==
/// Write side of the cookie carrier.
pub trait CookieSink {
    fn set_cookie(&mut self, cookie: SessionCookie) -> Result<()>;
}

/// Write side of the header carrier.
pub trait HeaderSink {
    fn set_header(&mut self, name: &str, value: &str) -> Result<()>;
}

impl CookieSink for HeaderMap {
    fn set_cookie(&mut self, cookie: SessionCookie) -> Result<()> {
        let value = HeaderValue::from_str(&cookie.to_string())
            .map_err(|e| CacheError::InvalidArgs(format!("cookie {}: {e}", cookie.name)))?;
        self.append(SET_COOKIE, value);
        Ok(())
    }
}

impl HeaderSink for HeaderMap {
    fn set_header(&mut self, name: &str, value: &str) -> Result<()> {
        let header = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| CacheError::InvalidArgs(format!("header name {name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| CacheError::InvalidArgs(format!("header {name}: {e}")))?;
        self.insert(header, value);
        Ok(())
    }
}

impl CookieSink for Vec<SessionCookie> {
    fn set_cookie(&mut self, cookie: SessionCookie) -> Result<()> {
        self.push(cookie);
        Ok(())
    }
}

impl HeaderSink for HashMap<String, String> {
    fn set_header(&mut self, name: &str, value: &str) -> Result<()> {
        self.insert(name.to_string(), value.to_string());
        Ok(())
    }
}
