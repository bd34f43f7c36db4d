//! Vole - A thin caching facade over Redis
//!
//! Stores JSON documents with per-key TTL, reads one or many keys in a single
//! round trip, and publishes hit/miss/set and connection events.

pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod store;
pub mod tasks;

pub use cache::{CacheStats, CacheValue, Fetched, Keys, MultiGet, Vole};
pub use config::Config;
pub use error::{Result, VoleError};
pub use events::{Event, EventKind};
pub use store::{KvStore, MemoryStore, RedisStore};
pub use tasks::spawn_heartbeat_task;
