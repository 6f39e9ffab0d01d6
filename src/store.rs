use std::collections::VecDeque;
use std::sync::Mutex;

use crate::models::StoredEvent;

/// Bounded in-memory event store, newest first.
///
/// Shared across handlers via `web::Data`; each append is a single
/// prepend-and-evict step under the lock, so overlapping webhook batches
/// never observe a partially applied mutation. Contents are lost on
/// restart by design.
pub struct EventStore {
    events: Mutex<VecDeque<StoredEvent>>,
    capacity: usize,
}

impl EventStore {
    /// Creates an empty store that retains at most `capacity` events
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Prepends an event, evicting the oldest once capacity is exceeded
    pub fn append(&self, event: StoredEvent) {
        let mut events = self.events.lock().expect("event store lock poisoned");
        events.push_front(event);
        while events.len() > self.capacity {
            events.pop_back();
        }
    }

    /// Returns events newest-first, optionally filtered by event type
    pub fn query(&self, event_type: Option<&str>) -> Vec<StoredEvent> {
        let events = self.events.lock().expect("event store lock poisoned");
        match event_type {
            None => events.iter().cloned().collect(),
            Some(filter) => events
                .iter()
                .filter(|e| e.event_type == filter)
                .cloned()
                .collect(),
        }
    }

    /// Number of events currently held
    pub fn len(&self) -> usize {
        self.events.lock().expect("event store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
