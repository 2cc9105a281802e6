// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier generation for events and listener handles
//!
//! Event ids travel between runtimes and are the key for delivery tracking,
//! receipts and duplicate suppression, so a generator must never repeat an
//! id within one runtime.

use crate::event::{EntityId, EventId};
use crate::registry::ListenerId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Source of unique identifiers
pub trait IdGen: Clone + Send + Sync + 'static {
    fn next(&self) -> String;

    fn event_id(&self) -> EventId {
        EventId(self.next())
    }

    fn listener_id(&self) -> ListenerId {
        ListenerId(self.next())
    }
}

/// Random v4 UUIDs; unique across runtimes without coordination
#[derive(Clone, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// `prefix-1`, `prefix-2`, ... shared across clones
///
/// Deterministic ids for tests and simulations. Scoping the prefix to the
/// originating identity keeps ids from different runtimes apart.
#[derive(Clone)]
pub struct SequentialIdGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Ids prefixed with the originating identity, e.g. `alice-1`
    pub fn for_identity(identity: &EntityId) -> Self {
        Self::new(identity.as_str())
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
