// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local cache for events that could not be transmitted

use courier_core::{EntityId, Event, EventError};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Per-recipient FIFO buffer of untransmitted events
///
/// Cloning shares the underlying queues. An event leaves the cache only
/// through [`LocalCache::drain`].
#[derive(Clone)]
pub struct LocalCache {
    queues: Arc<Mutex<HashMap<EntityId, VecDeque<Event>>>>,
    capacity: usize,
}

impl LocalCache {
    /// Create a cache holding at most `capacity` events per recipient
    pub fn new(capacity: usize) -> Self {
        Self {
            queues: Arc::new(Mutex::new(HashMap::new())),
            capacity,
        }
    }

    /// Queue an event for later transmission to `recipient`
    pub fn enqueue(&self, event: Event, recipient: &EntityId) -> Result<(), EventError> {
        let mut queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
        let queue = queues.entry(recipient.clone()).or_default();
        if queue.len() >= self.capacity {
            return Err(EventError::ResourceExhausted(format!(
                "cache for {} holds {} events",
                recipient, self.capacity
            )));
        }

        tracing::debug!(id = %event.id(), %recipient, depth = queue.len() + 1, "event cached");
        queue.push_back(event);
        Ok(())
    }

    /// Remove and return every event queued for `recipient`, oldest first
    pub fn drain(&self, recipient: &EntityId) -> Vec<Event> {
        let mut queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
        queues
            .remove(recipient)
            .map(Vec::from)
            .unwrap_or_default()
    }

    /// Put drained events back at the front of the queue, keeping their order
    ///
    /// Used when a retransmission pass stops early. Capacity is not enforced
    /// for restored events since they were already admitted.
    pub fn restore(&self, recipient: &EntityId, events: impl IntoIterator<Item = Event>) {
        let mut restored: VecDeque<Event> = events.into_iter().collect();
        if restored.is_empty() {
            return;
        }

        let mut queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
        let queue = queues.entry(recipient.clone()).or_default();
        restored.append(queue);
        *queue = restored;
    }

    /// Number of events waiting for `recipient`
    pub fn pending(&self, recipient: &EntityId) -> usize {
        self.queues
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(recipient)
            .map_or(0, VecDeque::len)
    }

    /// Recipients with at least one cached event, sorted
    pub fn recipients(&self) -> Vec<EntityId> {
        let queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
        let mut recipients: Vec<EntityId> = queues
            .iter()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|(recipient, _)| recipient.clone())
            .collect();
        recipients.sort();
        recipients
    }

    /// Total number of cached events
    pub fn len(&self) -> usize {
        self.queues
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .map(VecDeque::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
