//! Connection Heartbeat Task
//!
//! Background task that periodically pings the store so the facade notices
//! lost and restored connections.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::Vole;

/// Spawns a background task that refreshes the facade's connection state.
///
/// Each tick PINGs the store through [`Vole::refresh_connection`], which emits
/// `error`/`end` when the store goes away and `connect`/`ready` when it comes
/// back.
///
/// # Arguments
/// * `vole` - Facade handle (clones share state)
/// * `interval_secs` - Seconds between pings; 0 is treated as 1
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let vole = Vole::open(&config).await?;
/// let heartbeat = spawn_heartbeat_task(vole.clone(), config.heartbeat_interval);
/// // Later, during shutdown:
/// heartbeat.abort();
/// ```
pub fn spawn_heartbeat_task(vole: Vole, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache heartbeat with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let online = vole.refresh_connection().await;
            debug!("Cache heartbeat: online={}", online);
        }
    })
}
