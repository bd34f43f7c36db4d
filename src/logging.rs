//! Logging Module
//!
//! Tracing setup, and the cache hit/miss reporter that writes to the console
//! and optionally to a JSON-lines file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs a global tracing subscriber with an env filter.
///
/// `RUST_LOG` takes precedence over `default_filter`. Returns false if a
/// subscriber was already installed.
pub fn init_tracing(default_filter: &str) -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

// == Log Record ==
/// One line of the hit/miss log file.
#[derive(Debug, Serialize)]
struct LogRecord<'a> {
    hit: bool,
    key: &'a str,
    size: usize,
    timestamp: String,
}

// == Cache Logger ==
/// Reports cache hits and misses. Never fails and never affects the caller.
#[derive(Debug, Default)]
pub struct CacheLogger {
    console: AtomicBool,
    file: Mutex<Option<File>>,
}

impl CacheLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables console reporting.
    pub fn to_console(&self, enabled: bool) {
        self.console.store(enabled, Ordering::Relaxed);
    }

    pub fn console_enabled(&self) -> bool {
        self.console.load(Ordering::Relaxed)
    }

    /// Appends every subsequent hit and miss to `path`.
    pub fn log_to_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        *self.file.lock().unwrap_or_else(|e| e.into_inner()) = Some(file);
        Ok(())
    }

    pub fn cache_hit(&self, key: &str, value: &str) {
        if self.console_enabled() {
            info!(target: "vole::cache", "HIT  cache hit for key {} with {} bytes", key, value.len());
        }
        self.push_to_file(true, key, value.len());
    }

    pub fn cache_hit_multi(&self, keys: &[String], values: &[Option<String>]) {
        let joined = keys.join(", ");
        let size = values.iter().flatten().map(String::len).sum();
        if self.console_enabled() {
            info!(target: "vole::cache", "HIT  cache hit for key {} with {} bytes", joined, size);
        }
        self.push_to_file(true, &joined, size);
    }

    pub fn cache_miss(&self, key: &str) {
        if self.console_enabled() {
            info!(target: "vole::cache", "MISS cache missed for key {}", key);
        }
        self.push_to_file(false, key, 0);
    }

    fn push_to_file(&self, hit: bool, key: &str, size: usize) {
        let mut guard = self.file.lock().unwrap_or_else(|e| e.into_inner());
        let Some(file) = guard.as_mut() else {
            return;
        };

        let record = LogRecord {
            hit,
            key,
            size,
            timestamp: Utc::now().to_rfc3339(),
        };
        let written = serde_json::to_string(&record)
            .map_err(io::Error::from)
            .and_then(|line| writeln!(file, "{}", line));
        if let Err(e) = written {
            warn!("Failed to write cache log record: {}", e);
        }
    }
}
