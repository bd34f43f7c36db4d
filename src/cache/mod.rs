//! Cache Module
//!
//! The caching facade: TTL rules, key dispatch, value (de)serialization and
//! operation statistics.

mod facade;
mod keys;
mod stats;
mod ttl;
mod value;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use facade::{Fetched, MultiGet, Vole};
pub use keys::Keys;
pub use stats::CacheStats;
pub use ttl::resolve_expiry;
pub use value::{decode, CacheValue};
