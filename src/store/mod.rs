//! Store Module
//!
//! The external key-value store the facade delegates to. Everything behind
//! [`KvStore`] (wire protocol, persistence, eviction, reconnects) belongs to
//! the store, not to the facade.

mod entry;
mod memory;
mod redis_store;

use async_trait::async_trait;
use thiserror::Error;

pub use entry::StoredEntry;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

// == Store Error Enum ==
/// Failures reported by a store implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error raised by the Redis client
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// An operation was issued before `connect` succeeded
    #[error("Store is not connected")]
    NotConnected,

    /// The store refused or dropped the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store calls.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// == Key-Value Store Trait ==
/// The operations the facade needs from a key-value store.
///
/// Every method maps to a single store command; `mget` and `del` are batched
/// into one round trip regardless of the number of keys.
#[async_trait]
pub trait KvStore: Send + Sync + 'static {
    /// Establishes the connection.
    async fn connect(&self) -> StoreResult<()>;

    /// Round-trips a PING over the live connection.
    async fn ping(&self) -> StoreResult<()>;

    /// Sends AUTH with the given password.
    async fn auth(&self, password: &str) -> StoreResult<()>;

    /// Stores text under `key`, clearing any previous expiry.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Sets `key` to expire after `seconds`. Returns false if the key is absent.
    async fn expire(&self, key: &str, seconds: u64) -> StoreResult<bool>;

    /// Reads one key.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Reads several keys in order; absent keys yield `None` in their slot.
    async fn mget(&self, keys: &[String]) -> StoreResult<Vec<Option<String>>>;

    /// Deletes several keys, returning how many existed.
    async fn del(&self, keys: &[String]) -> StoreResult<u64>;
}
