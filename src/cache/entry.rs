//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::collections::HashSet;

use chrono::Utc;

// == Slot ==
/// What a key holds: a plain text value or a set of members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// Opaque text payload (records are stored as JSON-encoded ciphertext)
    Text(String),
    /// Unordered set of unique members
    Members(HashSet<String>),
}

impl Slot {
    /// Approximate payload size in bytes.
    pub fn size(&self) -> usize {
        match self {
            Slot::Text(value) => value.len(),
            Slot::Members(members) => members.iter().map(String::len).sum(),
        }
    }
}

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored slot
    pub slot: Slot,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructors ==
    /// Creates a text entry with an optional TTL in seconds.
    pub fn text(value: String, ttl_seconds: Option<u64>) -> Self {
        Self::with_slot(Slot::Text(value), ttl_seconds)
    }

    /// Creates an empty set entry that never expires.
    pub fn members() -> Self {
        Self::with_slot(Slot::Members(HashSet::new()), None)
    }

    fn with_slot(slot: Slot, ttl_seconds: Option<u64>) -> Self {
        let now = current_timestamp_ms();
        Self {
            slot,
            created_at: now,
            expires_at: ttl_seconds.map(|ttl| now.saturating_add(ttl.saturating_mul(1000))),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches the expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in seconds, or None if no expiration is set.
    pub fn ttl_remaining(&self) -> Option<u64> {
        self.expires_at
            .map(|expires| expires.saturating_sub(current_timestamp_ms()) / 1000)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_text_entry_no_ttl() {
        let entry = CacheEntry::text("payload".to_string(), None);

        assert_eq!(entry.slot, Slot::Text("payload".to_string()));
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
        assert!(entry.ttl_remaining().is_none());
    }

    #[test]
    fn test_text_entry_with_ttl() {
        let entry = CacheEntry::text("payload".to_string(), Some(10));

        let remaining = entry.ttl_remaining().unwrap();
        assert!((9..=10).contains(&remaining));
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_members_entry_never_expires() {
        let entry = CacheEntry::members();
        assert!(matches!(entry.slot, Slot::Members(ref m) if m.is_empty()));
        assert!(entry.expires_at.is_none());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::text("payload".to_string(), Some(1));
        assert!(!entry.is_expired());

        sleep(Duration::from_millis(1100));

        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining(), Some(0));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = current_timestamp_ms();
        let entry = CacheEntry {
            slot: Slot::Text("payload".to_string()),
            created_at: now,
            expires_at: Some(now),
        };

        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let entry = CacheEntry::text("payload".to_string(), Some(u64::MAX));
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_slot_size() {
        assert_eq!(Slot::Text("abcd".to_string()).size(), 4);
        let members: HashSet<String> = ["ab", "cde"].iter().map(|s| s.to_string()).collect();
        assert_eq!(Slot::Members(members).size(), 5);
    }
}
