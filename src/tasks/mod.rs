//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the facade.
//!
//! # Tasks
//! - Heartbeat: Pings the store and drives the online/offline state

mod heartbeat;

pub use heartbeat::spawn_heartbeat_task;
