// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Access policy for originating, sending and receiving events

use crate::config::RuntimeConfig;
use crate::event::{EntityId, Event};
use std::collections::HashSet;

/// Decides which events a runtime may originate, send and accept
pub trait Policy: Send + Sync + 'static {
    /// May the local caller originate events as `identity`?
    fn may_originate(&self, identity: &EntityId) -> bool;

    /// May this event leave the runtime at all?
    fn may_send(&self, event: &Event) -> bool;

    /// May `local` accept this inbound event?
    fn may_receive(&self, local: &EntityId, event: &Event) -> bool;
}

/// Permits everything
#[derive(Clone, Debug, Default)]
pub struct AllowAll;

impl Policy for AllowAll {
    fn may_originate(&self, _identity: &EntityId) -> bool {
        true
    }

    fn may_send(&self, _event: &Event) -> bool {
        true
    }

    fn may_receive(&self, _local: &EntityId, _event: &Event) -> bool {
        true
    }
}

/// Policy built from the `[policy]` section of the runtime config
#[derive(Clone, Debug)]
pub struct StaticPolicy {
    origins: HashSet<EntityId>,
    blocked_types: HashSet<String>,
    blocked_senders: HashSet<EntityId>,
}

impl StaticPolicy {
    pub fn from_config(config: &RuntimeConfig) -> Self {
        let mut origins: HashSet<EntityId> = config.policy.originate_as.iter().cloned().collect();
        origins.insert(config.identity.clone());

        Self {
            origins,
            blocked_types: config.policy.blocked_types.iter().cloned().collect(),
            blocked_senders: config.policy.blocked_senders.iter().cloned().collect(),
        }
    }
}

impl Policy for StaticPolicy {
    fn may_originate(&self, identity: &EntityId) -> bool {
        self.origins.contains(identity)
    }

    fn may_send(&self, event: &Event) -> bool {
        !self.blocked_types.contains(event.event_type())
    }

    fn may_receive(&self, _local: &EntityId, event: &Event) -> bool {
        !self.blocked_senders.contains(event.from())
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
