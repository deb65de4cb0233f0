//! Event bus: named channels, synchronous dispatch, fault-isolated handlers.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, error};

use crate::history::EventHistory;

/// A published event as seen by handlers and the history ring.
#[derive(Debug, Clone)]
pub struct EventRecord {
    pub name: String,
    pub payload: Value,
    pub published_at: DateTime<Utc>,
}

/// Identifies one subscription; pass back to [`EventBus::unsubscribe`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler = Box<dyn FnMut(&EventRecord) -> anyhow::Result<()>>;

struct Listener {
    id: HandlerId,
    once: bool,
    handler: Handler,
}

/// Synchronous pub/sub keyed by event name.
///
/// Handlers run in registration order on the publishing thread. A handler
/// returning an error is logged and does not stop the remaining handlers.
/// Handlers hold no reference to the bus, so dispatch is never re-entrant.
pub struct EventBus {
    channels: HashMap<String, Vec<Listener>>,
    history: EventHistory,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            channels: HashMap::new(),
            history: EventHistory::new(capacity),
            next_id: 0,
        }
    }

    /// Subscribe to `name`. The returned id undoes the subscription.
    pub fn subscribe<F>(&mut self, name: impl Into<String>, handler: F) -> HandlerId
    where
        F: FnMut(&EventRecord) -> anyhow::Result<()> + 'static,
    {
        self.attach(name.into(), Box::new(handler), false)
    }

    /// Subscribe to `name` for a single delivery; auto-unsubscribes after it.
    pub fn once<F>(&mut self, name: impl Into<String>, handler: F) -> HandlerId
    where
        F: FnMut(&EventRecord) -> anyhow::Result<()> + 'static,
    {
        self.attach(name.into(), Box::new(handler), true)
    }

    fn attach(&mut self, name: String, handler: Handler, once: bool) -> HandlerId {
        self.next_id += 1;
        let id = HandlerId(self.next_id);
        debug!(event = %name, ?id, "subscribed");
        self.channels
            .entry(name)
            .or_default()
            .push(Listener { id, once, handler });
        id
    }

    /// Remove one subscription. Returns whether anything was removed.
    pub fn unsubscribe(&mut self, id: HandlerId) -> bool {
        let mut removed = false;
        self.channels.retain(|_, listeners| {
            let before = listeners.len();
            listeners.retain(|l| l.id != id);
            removed |= listeners.len() < before;
            !listeners.is_empty()
        });
        removed
    }

    /// Publish `payload` to every subscriber of `name`, in registration
    /// order. Returns the number of handlers invoked.
    pub fn publish(&mut self, name: &str, payload: Value) -> usize {
        let record = EventRecord {
            name: name.to_string(),
            payload,
            published_at: Utc::now(),
        };
        self.history.push(record.clone());

        let Some(listeners) = self.channels.get_mut(name) else {
            return 0;
        };

        let mut spent = Vec::new();
        let mut delivered = 0;
        for listener in listeners.iter_mut() {
            if let Err(err) = (listener.handler)(&record) {
                error!(event = %name, error = %err, "event handler failed");
            }
            delivered += 1;
            if listener.once {
                spent.push(listener.id);
            }
        }

        if !spent.is_empty() {
            listeners.retain(|l| !spent.contains(&l.id));
        }
        let now_empty = listeners.is_empty();
        if now_empty {
            self.channels.remove(name);
        }

        delivered
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.channels.get(name).map(|l| l.len()).unwrap_or(0)
    }

    pub fn event_names(&self) -> Vec<String> {
        self.channels.keys().cloned().collect()
    }

    /// Drop all subscriptions for one event name.
    pub fn clear(&mut self, name: &str) {
        self.channels.remove(name);
    }

    /// Drop every subscription (teardown path).
    pub fn clear_all(&mut self) {
        self.channels.clear();
    }

    /// The most recent `count` published events, oldest first.
    pub fn recent_events(&self, count: usize) -> Vec<EventRecord> {
        self.history.recent(count)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self {
            channels: HashMap::new(),
            history: EventHistory::default(),
            next_id: 0,
        }
    }
}

impl core::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut channels: Vec<_> = self
            .channels
            .iter()
            .map(|(name, l)| (name.as_str(), l.len()))
            .collect();
        channels.sort_unstable();
        f.debug_struct("EventBus")
            .field("channels", &channels)
            .field("history_len", &self.history.len())
            .finish()
    }
}
