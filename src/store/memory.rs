//! In-Memory Store Module
//!
//! A [`KvStore`] backed by a HashMap, honouring per-key expiry the way Redis
//! does. Used when no Redis server is at hand.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KvStore, StoreError, StoreResult, StoredEntry};

// == Memory Store ==
/// HashMap-backed key-value store with lazy expiry.
#[derive(Debug)]
pub struct MemoryStore {
    /// Key-value storage
    entries: RwLock<HashMap<String, StoredEntry>>,
    /// When false every call fails as if the server were unreachable
    available: AtomicBool,
    /// Password required by AUTH, if any
    password: Option<String>,
    /// Number of commands received
    commands: AtomicU64,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty, reachable store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
            password: None,
            commands: AtomicU64::new(0),
        }
    }

    /// Creates a store whose AUTH only accepts `password`.
    pub fn with_password(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
            ..Self::new()
        }
    }

    /// Makes the store reachable or unreachable.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Returns how many commands reached the store.
    pub fn commands(&self) -> u64 {
        self.commands.load(Ordering::SeqCst)
    }

    /// Remaining TTL of `key` in seconds; None if absent or without expiry.
    pub async fn ttl(&self, key: &str) -> Option<u64> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .and_then(|entry| entry.ttl_remaining())
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.values().filter(|entry| !entry.is_expired()).count()
    }

    /// Returns true if no live entries remain.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn command(&self) -> StoreResult<()> {
        self.commands.fetch_add(1, Ordering::SeqCst);
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    fn live_value(entries: &HashMap<String, StoredEntry>, key: &str) -> Option<String> {
        entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn connect(&self) -> StoreResult<()> {
        self.command()
    }

    async fn ping(&self) -> StoreResult<()> {
        self.command()
    }

    async fn auth(&self, password: &str) -> StoreResult<()> {
        self.command()?;
        match &self.password {
            Some(expected) if expected != password => Err(StoreError::Unavailable(
                "WRONGPASS invalid password".to_string(),
            )),
            _ => Ok(()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.command()?;
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), StoredEntry::new(value.to_string()));
        Ok(())
    }

    async fn expire(&self, key: &str, seconds: u64) -> StoreResult<bool> {
        self.command()?;
        let mut entries = self.entries.write().await;
        match entries.get_mut(key) {
            Some(entry) if !entry.is_expired() => {
                entry.expire_in(seconds);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.command()?;
        let entries = self.entries.read().await;
        Ok(Self::live_value(&entries, key))
    }

    async fn mget(&self, keys: &[String]) -> StoreResult<Vec<Option<String>>> {
        self.command()?;
        let entries = self.entries.read().await;
        Ok(keys
            .iter()
            .map(|key| Self::live_value(&entries, key))
            .collect())
    }

    async fn del(&self, keys: &[String]) -> StoreResult<u64> {
        self.command()?;
        let mut entries = self.entries.write().await;
        let mut removed = 0;
        for key in keys {
            if let Some(entry) = entries.remove(key) {
                if !entry.is_expired() {
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }
}
