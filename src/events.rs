//! Cache Event Module
//!
//! Observer registry for connection lifecycle and cache result events.
//! Handlers run synchronously, in subscription order, on the task that
//! triggered the event.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use serde::Serialize;

// == Event Kind ==
/// The name a subscriber registers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Ready,
    Error,
    Connect,
    End,
    Hit,
    Miss,
    Set,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Ready => "ready",
            EventKind::Error => "error",
            EventKind::Connect => "connect",
            EventKind::End => "end",
            EventKind::Hit => "hit",
            EventKind::Miss => "miss",
            EventKind::Set => "set",
        };
        f.write_str(name)
    }
}

// == Event ==
/// A published event and its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The store accepted commands
    Ready,
    /// A connection problem, with the store's detail
    Error { detail: String },
    /// The connection was established
    Connect,
    /// The connection was lost
    End,
    /// A single-key read found a value (serialized form)
    Hit { key: String, value: String },
    /// A multi-key read returned; absent slots are `None`
    HitMany {
        keys: Vec<String>,
        values: Vec<Option<String>>,
    },
    /// A read found nothing for `key`
    Miss { key: String },
    /// A write stored `value` (serialized form) under `key`
    Set { key: String, value: String },
}

impl Event {
    /// The kind subscribers receive this event under.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Ready => EventKind::Ready,
            Event::Error { .. } => EventKind::Error,
            Event::Connect => EventKind::Connect,
            Event::End => EventKind::End,
            Event::Hit { .. } | Event::HitMany { .. } => EventKind::Hit,
            Event::Miss { .. } => EventKind::Miss,
            Event::Set { .. } => EventKind::Set,
        }
    }
}

/// A subscriber callback.
pub type Handler = Arc<dyn Fn(&Event) + Send + Sync>;

// == Event Bus ==
/// Maps each event kind to its ordered list of subscribers.
#[derive(Default)]
pub struct EventBus {
    handlers: RwLock<HashMap<EventKind, Vec<Handler>>>,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for events of `kind`.
    pub fn on<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        handlers.entry(kind).or_default().push(Arc::new(handler));
    }

    /// Delivers `event` to every subscriber of its kind.
    ///
    /// The registry lock is released before handlers run, so a handler may
    /// subscribe further handlers; those see only later events.
    pub fn emit(&self, event: &Event) {
        let subscribers: Vec<Handler> = {
            let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
            match handlers.get(&event.kind()) {
                Some(list) => list.clone(),
                None => return,
            }
        };

        for handler in subscribers {
            handler(event);
        }
    }

    /// Number of subscribers for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        handlers.get(&kind).map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        let counts: HashMap<&EventKind, usize> =
            handlers.iter().map(|(kind, list)| (kind, list.len())).collect();
        f.debug_struct("EventBus").field("handlers", &counts).finish()
    }
}
