//! Bounded event history for introspection/debugging.

use std::collections::VecDeque;

use crate::bus::EventRecord;

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Circular buffer of the most recent events; oldest entries evicted first.
#[derive(Debug)]
pub struct EventHistory {
    entries: VecDeque<EventRecord>,
    capacity: usize,
}

impl EventHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, record: EventRecord) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(record);
    }

    /// The most recent `count` events, oldest first.
    pub fn recent(&self, count: usize) -> Vec<EventRecord> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn record(name: &str) -> EventRecord {
        EventRecord {
            name: name.to_string(),
            payload: json!(null),
            published_at: Utc::now(),
        }
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut history = EventHistory::new(3);
        for name in ["a", "b", "c", "d"] {
            history.push(record(name));
        }

        let names: Vec<_> = history.recent(10).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["b", "c", "d"]);
    }

    #[test]
    fn recent_returns_tail_in_order() {
        let mut history = EventHistory::default();
        for name in ["a", "b", "c"] {
            history.push(record(name));
        }

        let names: Vec<_> = history.recent(2).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["b", "c"]);
    }
}
