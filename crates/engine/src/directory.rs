// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service discovery for event-capable runtimes

use courier_core::{IdGen, UuidIdGen};
use std::fmt;
use std::sync::{Arc, RwLock};

/// API name under which event services are listed
pub const EVENTS_API: &str = "http://webinos.org/api/events";

/// Handle identifying one registration in the directory
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ServiceId(pub String);

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered service as returned by discovery
#[derive(Clone, Debug)]
pub struct ServiceHandle<S> {
    pub id: ServiceId,
    pub api: String,
    pub display_name: String,
    pub service: S,
}

/// Resolves API names to registered services
///
/// Lookups return services in registration order. Cloning shares the
/// registrations.
pub struct ServiceDirectory<S, G: IdGen = UuidIdGen> {
    entries: Arc<RwLock<Vec<ServiceHandle<S>>>>,
    id_gen: G,
}

impl<S: Clone, G: IdGen> ServiceDirectory<S, G> {
    pub fn new(id_gen: G) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            id_gen,
        }
    }

    /// List a service under an API name
    pub fn register(&self, api: &str, display_name: &str, service: S) -> ServiceId {
        let id = ServiceId(self.id_gen.next());
        tracing::debug!(service = %id, api, display_name, "service registered");
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(ServiceHandle {
                id: id.clone(),
                api: api.to_string(),
                display_name: display_name.to_string(),
                service,
            });
        id
    }

    /// All services listed under `api`
    pub fn find_services(&self, api: &str) -> Vec<ServiceHandle<S>> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|entry| entry.api == api)
            .cloned()
            .collect()
    }

    /// Remove a registration; returns whether it existed
    pub fn unregister(&self, id: &ServiceId) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|entry| &entry.id != id);
        before != entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S, G: IdGen> Clone for ServiceDirectory<S, G> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            id_gen: self.id_gen.clone(),
        }
    }
}

impl<S: Clone> Default for ServiceDirectory<S> {
    fn default() -> Self {
        Self::new(UuidIdGen)
    }
}

#[cfg(test)]
#[path = "directory_tests.rs"]
mod tests;
