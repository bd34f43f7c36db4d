//! TTL Resolution
//!
//! Decides which expiry, if any, follows a write.

/// Returns the expiry in seconds to apply after a write, or None for no expiry.
///
/// A non-zero explicit TTL wins. Otherwise the default applies when it is
/// non-zero. An explicit 0 with a zero default, or no TTL with a zero
/// default, leaves the key without expiry.
pub fn resolve_expiry(explicit: Option<u64>, default_ttl: u64) -> Option<u64> {
    explicit
        .filter(|&seconds| seconds > 0)
        .or(Some(default_ttl).filter(|&seconds| seconds > 0))
}
