// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded memory of inbound event ids for duplicate suppression

use chrono::{DateTime, Utc};
use courier_core::EventId;
use std::collections::{HashSet, VecDeque};

/// Ids of events already handed to listeners, oldest first
///
/// Forgetting an expired id is safe: a re-delivery of an expired event is
/// rejected before duplicate checks run.
pub(crate) struct SeenEvents {
    ids: HashSet<EventId>,
    order: VecDeque<(EventId, Option<DateTime<Utc>>)>,
    capacity: usize,
}

impl SeenEvents {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            ids: HashSet::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Remember `id`; returns false if it was already known
    pub(crate) fn insert(
        &mut self,
        id: &EventId,
        expiry: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> bool {
        if self.ids.contains(id) {
            return false;
        }

        if self.order.len() >= self.capacity {
            self.prune_expired(now);
        }
        while self.order.len() >= self.capacity {
            let Some((oldest, _)) = self.order.pop_front() else {
                break;
            };
            self.ids.remove(&oldest);
            tracing::trace!(id = %oldest, "seen id evicted");
        }

        self.ids.insert(id.clone());
        self.order.push_back((id.clone(), expiry));
        true
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    fn prune_expired(&mut self, now: DateTime<Utc>) {
        let ids = &mut self.ids;
        self.order.retain(|(id, expiry)| {
            let live = !matches!(expiry, Some(at) if *at <= now);
            if !live {
                ids.remove(id);
            }
            live
        });
    }
}

#[cfg(test)]
#[path = "seen_tests.rs"]
mod tests;
