// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener registry: routes events to matching listeners

use crate::error::EventError;
use crate::event::Event;
use crate::filter::ListenerFilter;
use crate::id::{IdGen, UuidIdGen};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

/// Callback invoked with each matching event
pub type ListenerCallback = Arc<dyn Fn(&Event) + Send + Sync>;
/// Sender for channel-based listeners
pub type EventSender = mpsc::UnboundedSender<Event>;
/// Receiver for channel-based listeners
pub type EventReceiver = mpsc::UnboundedReceiver<Event>;

/// Handle returned on registration, used to unregister
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub String);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct Registration {
    filter: ListenerFilter,
    callback: ListenerCallback,
}

/// Holds listener registrations and dispatches events to them
///
/// Cloning shares the underlying registrations.
pub struct ListenerRegistry<G: IdGen = UuidIdGen> {
    listeners: Arc<RwLock<HashMap<ListenerId, Registration>>>,
    id_gen: G,
    capacity: usize,
}

impl<G: IdGen> ListenerRegistry<G> {
    pub fn new(id_gen: G, capacity: usize) -> Self {
        Self {
            listeners: Arc::new(RwLock::new(HashMap::new())),
            id_gen,
            capacity,
        }
    }

    /// Register a callback for events matching `filter`
    ///
    /// Registrations with identical filters are independent of each other.
    pub fn register(
        &self,
        filter: ListenerFilter,
        callback: impl Fn(&Event) + Send + Sync + 'static,
    ) -> Result<ListenerId, EventError> {
        let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
        if listeners.len() >= self.capacity {
            return Err(EventError::ResourceExhausted(format!(
                "listener limit of {} reached",
                self.capacity
            )));
        }

        let id = self.id_gen.listener_id();
        tracing::debug!(listener = %id, ?filter, "listener registered");
        listeners.insert(
            id.clone(),
            Registration {
                filter,
                callback: Arc::new(callback),
            },
        );
        Ok(id)
    }

    /// Register a listener that forwards matching events into a channel
    pub fn register_channel(
        &self,
        filter: ListenerFilter,
    ) -> Result<(ListenerId, EventReceiver), EventError> {
        let (tx, rx): (EventSender, EventReceiver) = mpsc::unbounded_channel();
        let id = self.register(filter, move |event| {
            let _ = tx.send(event.clone());
        })?;
        Ok((id, rx))
    }

    /// Remove a registration; unknown ids are ignored
    pub fn unregister(&self, id: &ListenerId) {
        let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
        if listeners.remove(id).is_some() {
            tracing::debug!(listener = %id, "listener unregistered");
        }
    }

    /// Invoke every listener whose filter matches the event
    ///
    /// Matching callbacks are collected first and run after the lock is
    /// released, so callbacks may register or unregister listeners. Returns
    /// the number of listeners invoked.
    pub fn match_and_dispatch(&self, event: &Event) -> usize {
        let matched: Vec<ListenerCallback> = {
            let listeners = self.listeners.read().unwrap_or_else(|e| e.into_inner());
            listeners
                .values()
                .filter(|registration| registration.filter.matches(event))
                .map(|registration| Arc::clone(&registration.callback))
                .collect()
        };

        tracing::trace!(id = %event.id(), matched = matched.len(), "dispatching to listeners");
        for callback in &matched {
            callback(event);
        }
        matched.len()
    }

    /// Get count of registered listeners
    pub fn len(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// List all listener IDs
    pub fn listener_ids(&self) -> Vec<ListenerId> {
        self.listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect()
    }
}

impl<G: IdGen> Clone for ListenerRegistry<G> {
    fn clone(&self) -> Self {
        Self {
            listeners: Arc::clone(&self.listeners),
            id_gen: self.id_gen.clone(),
            capacity: self.capacity,
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
