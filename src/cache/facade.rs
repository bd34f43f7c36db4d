//! Cache Facade Module
//!
//! [`Vole`] sits in front of a [`KvStore`]: it tracks whether the store is
//! reachable, applies the TTL rules, (de)serializes documents and publishes
//! cache events.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{decode, resolve_expiry, CacheStats, CacheValue, Keys};
use crate::config::{Config, DEFAULT_TTL_SECS};
use crate::error::{
    Result, VoleError, MSG_GET_FAILED, MSG_NO_KEY, MSG_SET_FAILED, MSG_SET_REQUIRES_KEY,
};
use crate::events::{Event, EventBus, EventKind};
use crate::logging::CacheLogger;
use crate::store::{KvStore, RedisStore, StoreError};

// == Multi Get ==
/// Result of a multi-key read.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiGet {
    /// One slot per requested key, in request order
    pub values: Vec<Option<Value>>,
    /// Requested keys whose slot is empty
    pub missing: Vec<String>,
}

/// Result of [`Vole::fetch`], shaped by the kind of key given.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    One(Option<Value>),
    Many(Option<MultiGet>),
}

struct Shared {
    store: Arc<dyn KvStore>,
    online: AtomicBool,
    default_ttl: AtomicU64,
    events: EventBus,
    logger: CacheLogger,
    stats: Mutex<CacheStats>,
}

// == Vole ==
/// Caching facade over a key-value store.
///
/// Cloning is cheap; clones share connection state, default TTL, subscribers
/// and statistics.
#[derive(Clone)]
pub struct Vole {
    shared: Arc<Shared>,
}

impl Vole {
    // == Constructors ==
    /// Wraps `store`. The facade starts offline with the default TTL of one hour.
    pub fn new(store: impl KvStore) -> Self {
        Self::from_shared(Arc::new(store))
    }

    /// Wraps a store the caller keeps a handle to.
    pub fn from_shared(store: Arc<dyn KvStore>) -> Self {
        Self {
            shared: Arc::new(Shared {
                store,
                online: AtomicBool::new(false),
                default_ttl: AtomicU64::new(DEFAULT_TTL_SECS),
                events: EventBus::new(),
                logger: CacheLogger::new(),
                stats: Mutex::new(CacheStats::new()),
            }),
        }
    }

    /// Builds a Redis-backed facade from `config`, connects and authenticates.
    ///
    /// A failed connection leaves the facade offline rather than returning an
    /// error; only an unusable address or log file is reported here.
    pub async fn open(config: &Config) -> Result<Self> {
        let store = RedisStore::open(&config.connection_url())
            .map_err(|e| VoleError::Config(e.to_string()))?;
        let vole = Self::new(store);

        vole.set_ttl(Some(config.default_ttl));
        vole.shared.logger.to_console(config.console_logging);
        if let Some(path) = &config.log_file {
            vole.log_to_file(path)?;
        }

        vole.connect().await;
        if let Some(password) = &config.redis_password {
            vole.auth(password).await;
        }
        Ok(vole)
    }

    // == Events ==
    /// Subscribes `handler` to events of `kind`.
    pub fn on<F>(&self, kind: EventKind, handler: F) -> &Self
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.shared.events.on(kind, handler);
        self
    }

    fn emit(&self, event: Event) {
        self.shared.events.emit(&event);
    }

    // == Connection ==
    /// Connects to the store.
    ///
    /// Emits `connect` once the connection is up and `ready` once the store
    /// answers; failures are reported only through the `error` event.
    pub async fn connect(&self) -> &Self {
        if let Err(e) = self.shared.store.connect().await {
            self.go_offline(&e);
            return self;
        }
        self.emit(Event::Connect);

        match self.shared.store.ping().await {
            Ok(()) => {
                self.shared.online.store(true, Ordering::SeqCst);
                info!("Cache store ready");
                self.emit(Event::Ready);
            }
            Err(e) => self.go_offline(&e),
        }
        self
    }

    /// Pings the store and updates the connection state.
    ///
    /// Going offline emits `error` then `end`; coming back emits `connect`
    /// then `ready`. A store that never connected is connected first.
    pub async fn refresh_connection(&self) -> bool {
        let store = &self.shared.store;
        let reply = match store.ping().await {
            Err(StoreError::NotConnected) => match store.connect().await {
                Ok(()) => store.ping().await,
                Err(e) => Err(e),
            },
            other => other,
        };

        match reply {
            Ok(()) => {
                if !self.shared.online.swap(true, Ordering::SeqCst) {
                    info!("Cache store reachable again");
                    self.emit(Event::Connect);
                    self.emit(Event::Ready);
                }
                true
            }
            Err(e) => {
                if self.is_online() {
                    self.go_offline(&e);
                } else {
                    debug!("Cache store still unreachable: {}", e);
                }
                false
            }
        }
    }

    fn go_offline(&self, error: &StoreError) {
        let was_online = self.shared.online.swap(false, Ordering::SeqCst);
        warn!("Cache store error, going offline: {}", error);
        self.emit(Event::Error {
            detail: error.to_string(),
        });
        if was_online {
            self.emit(Event::End);
        }
    }

    /// Returns true while the store is reachable.
    pub fn is_online(&self) -> bool {
        self.shared.online.load(Ordering::SeqCst)
    }

    /// Authenticates with the store. An empty password does nothing; failures
    /// are logged and otherwise ignored.
    pub async fn auth(&self, password: &str) {
        if password.is_empty() {
            return;
        }
        if let Err(e) = self.shared.store.auth(password).await {
            warn!("Cache store AUTH failed: {}", e);
        }
    }

    // == TTL ==
    /// Sets the default TTL in seconds and returns the resulting default.
    ///
    /// `0` disables expiry for later writes; `None` keeps the current value.
    pub fn set_ttl(&self, ttl: Option<u64>) -> u64 {
        if let Some(seconds) = ttl {
            self.shared.default_ttl.store(seconds, Ordering::SeqCst);
        }
        self.default_ttl()
    }

    pub fn default_ttl(&self) -> u64 {
        self.shared.default_ttl.load(Ordering::SeqCst)
    }

    // == Write Path ==
    /// Stores `value` under `key` with the default TTL.
    pub async fn set(&self, key: &str, value: &CacheValue) -> Result<()> {
        self.write(key, value, None).await
    }

    /// Stores `value` under `key` with an explicit TTL in seconds.
    ///
    /// A TTL of 0 only disables expiry when the default TTL is also 0.
    pub async fn set_with_ttl(&self, key: &str, value: &CacheValue, ttl: u64) -> Result<()> {
        self.write(key, value, Some(ttl)).await
    }

    async fn write(&self, key: &str, value: &CacheValue, ttl: Option<u64>) -> Result<()> {
        if !self.is_online() {
            debug!("Offline, skipping set for key {}", key);
            return Ok(());
        }
        if key.is_empty() {
            return Err(VoleError::validation(MSG_SET_REQUIRES_KEY));
        }

        let serialized = value.to_json()?;
        if let Err(e) = self.shared.store.set(key, &serialized).await {
            debug!("SET {} failed: {}", key, e);
            return Err(VoleError::transport(MSG_SET_FAILED));
        }

        if let Some(seconds) = resolve_expiry(ttl, self.default_ttl()) {
            if let Err(e) = self.shared.store.expire(key, seconds).await {
                warn!("EXPIRE {} {} failed: {}", key, seconds, e);
            }
        }

        self.record(|stats| stats.record_set());
        self.emit(Event::Set {
            key: key.to_string(),
            value: serialized,
        });
        Ok(())
    }

    // == Read Path ==
    /// Reads one key. `Ok(None)` on a miss or while offline.
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        if key.is_empty() {
            return Err(VoleError::validation(MSG_NO_KEY));
        }
        if !self.is_online() {
            return Ok(None);
        }

        let raw = self.shared.store.get(key).await.map_err(|e| {
            debug!("GET {} failed: {}", key, e);
            VoleError::transport(MSG_GET_FAILED)
        })?;

        match raw {
            Some(raw) => {
                let value = decode(&raw)?;
                self.shared.logger.cache_hit(key, &raw);
                self.record(|stats| stats.record_hits(1));
                self.emit(Event::Hit {
                    key: key.to_string(),
                    value: raw,
                });
                Ok(Some(value))
            }
            None => {
                self.miss(key);
                Ok(None)
            }
        }
    }

    /// Reads several keys in one round trip, preserving order.
    ///
    /// Slots that are absent, undecodable or JSON `null` are `None` and their
    /// keys are listed in [`MultiGet::missing`]. `Ok(None)` when offline or
    /// when the store returns no slots at all.
    pub async fn get_many<K: AsRef<str>>(&self, keys: &[K]) -> Result<Option<MultiGet>> {
        let keys: Vec<String> = keys.iter().map(|k| k.as_ref().to_string()).collect();
        self.multi_get(keys).await
    }

    /// Reads one key or several, depending on what `keys` holds.
    pub async fn fetch(&self, keys: impl Into<Keys>) -> Result<Fetched> {
        match keys.into() {
            Keys::One(key) => self.get(&key).await.map(Fetched::One),
            Keys::Many(keys) => self.multi_get(keys).await.map(Fetched::Many),
        }
    }

    async fn multi_get(&self, keys: Vec<String>) -> Result<Option<MultiGet>> {
        if keys.is_empty() || keys.iter().any(String::is_empty) {
            return Err(VoleError::validation(MSG_NO_KEY));
        }
        if !self.is_online() {
            return Ok(None);
        }

        let raws = self.shared.store.mget(&keys).await.map_err(|e| {
            debug!("MGET {:?} failed: {}", keys, e);
            VoleError::transport(MSG_GET_FAILED)
        })?;

        if raws.is_empty() {
            for key in &keys {
                self.miss(key);
            }
            return Ok(None);
        }

        self.shared.logger.cache_hit_multi(&keys, &raws);

        let mut values = Vec::with_capacity(raws.len());
        let mut missing = Vec::new();
        for (key, raw) in keys.iter().zip(&raws) {
            let value = raw
                .as_deref()
                .and_then(|raw| decode(raw).ok())
                .filter(|value| !value.is_null());
            if value.is_none() {
                missing.push(key.clone());
            }
            values.push(value);
        }

        let found = (values.len() - missing.len()) as u64;
        let absent = missing.len() as u64;
        self.record(|stats| {
            stats.record_hits(found);
            stats.record_misses(absent);
        });
        self.emit(Event::HitMany { keys, values: raws });

        Ok(Some(MultiGet { values, missing }))
    }

    fn miss(&self, key: &str) {
        self.shared.logger.cache_miss(key);
        self.record(|stats| stats.record_misses(1));
        self.emit(Event::Miss {
            key: key.to_string(),
        });
    }

    // == Delete Path ==
    /// Deletes one key or several in a single request.
    ///
    /// Returns the number of keys the store removed, or `Ok(None)` while offline.
    pub async fn bust(&self, keys: impl Into<Keys>) -> Result<Option<u64>> {
        let keys = keys.into();
        if keys.is_blank() {
            return Err(VoleError::validation(MSG_NO_KEY));
        }
        if !self.is_online() {
            return Ok(None);
        }

        let keys = keys.into_vec();
        let removed = self.shared.store.del(&keys).await?;
        debug!("Busted {} of {} keys", removed, keys.len());
        self.record(|stats| stats.record_busted(removed));
        Ok(Some(removed))
    }

    // == Logging ==
    pub fn enable_console_logging(&self) {
        self.shared.logger.to_console(true);
    }

    pub fn disable_console_logging(&self) {
        self.shared.logger.to_console(false);
    }

    /// Appends cache hits and misses to `path` as JSON lines.
    pub fn log_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.shared.logger.log_to_file(path)?;
        Ok(())
    }

    // == Stats ==
    /// Returns a snapshot of the operation counters.
    pub fn stats(&self) -> CacheStats {
        self.shared
            .stats
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn record(&self, update: impl FnOnce(&mut CacheStats)) {
        update(&mut self.shared.stats.lock().unwrap_or_else(|e| e.into_inner()));
    }
}

impl std::fmt::Debug for Vole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vole")
            .field("online", &self.is_online())
            .field("default_ttl", &self.default_ttl())
            .field("events", &self.shared.events)
            .finish()
    }
}
