//! Stored Entry Module
//!
//! A single value held by [`MemoryStore`](super::MemoryStore), with optional expiry.

use std::time::{SystemTime, UNIX_EPOCH};

// == Stored Entry ==
/// A stored text value and its expiry metadata.
#[derive(Debug, Clone)]
pub struct StoredEntry {
    /// The stored text
    pub value: String,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl StoredEntry {
    // == Constructor ==
    /// Creates a new entry that never expires.
    pub fn new(value: String) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    // == Expire ==
    /// Schedules expiry `ttl_seconds` from now, saturating at the far future.
    pub fn expire_in(&mut self, ttl_seconds: u64) {
        let ttl_ms = ttl_seconds.saturating_mul(1000);
        self.expires_at = Some(current_timestamp_ms().saturating_add(ttl_ms));
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    /// Returns remaining TTL in seconds, or None if no expiration is set.
    pub fn ttl_remaining(&self) -> Option<u64> {
        self.expires_at
            .map(|expires| expires.saturating_sub(current_timestamp_ms()) / 1000)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
