//! Record Module
//!
//! The records persisted by the stores: web sessions (cookie carried), API
//! tokens (header carried) and free-standing items keyed by the caller.
//!
//! Every record keeps its payload in a [`Values`] map that is never absent:
//! fresh records start with an empty map and decoded ones default to an
//! empty map when the field is missing.

mod item;
mod session;
mod token;
mod value;

pub use item::Item;
pub use session::{CookieOptions, SameSite, Session};
pub use token::Token;
pub use value::{Value, Values};

use serde::{de::DeserializeOwned, Serialize};

/// Behaviour shared by everything a record store can persist.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// Cache key of the record
    fn id(&self) -> &str;

    /// Lifetime in seconds applied on save; zero or less means no expiry
    fn max_age(&self) -> i64;

    fn values(&self) -> &Values;

    fn values_mut(&mut self) -> &mut Values;

    /// True until the record has been loaded back from the cache
    fn is_new(&self) -> bool;

    /// Flags a record that was just decoded from the cache.
    fn mark_existing(&mut self);
}
