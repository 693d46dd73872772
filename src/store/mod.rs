//! Record Store Module
//!
//! Encrypted, TTL-bounded persistence of sessions, tokens and items.
//!
//! Each store offers a resilient `get` that always hands back a record
//! (falling back to a fresh one) and a strict `get_existing` that reports
//! why a record could not be loaded:
//!
//! ```text
//! get(id)
//!   id absent                      -> new record
//!   lookup fails / key missing     -> new record
//!   found, decrypt or decode fails -> new record
//!   found, decoded                 -> existing record (is_new = false)
//! ```

mod items;
mod sessions;
mod tokens;
mod vault;


pub use items::ItemStore;
pub use sessions::SessionStore;
pub use tokens::TokenStore;
pub use vault::Vault;
