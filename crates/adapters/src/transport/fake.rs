// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake transport for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{TransmitStatus, Transport, TransportError};
use async_trait::async_trait;
use courier_core::{EntityId, Event, EventId, Receipt};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Recorded transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Transmit {
        event_id: EventId,
        recipient: EntityId,
    },
    Publish {
        event_id: EventId,
    },
    SendReceipt {
        to: EntityId,
        receipt: Receipt,
    },
}

#[derive(Default)]
struct FakeTransportState {
    calls: Vec<TransportCall>,
    /// One-shot statuses consumed before falling back to `sticky`
    queued: HashMap<EntityId, VecDeque<TransmitStatus>>,
    sticky: HashMap<EntityId, TransmitStatus>,
    unavailable: HashMap<EntityId, String>,
    publish_reach: usize,
}

/// Fake transport with scripted results and call recording
///
/// Recipients without a script acknowledge immediately.
#[derive(Clone, Default)]
pub struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<TransportCall> {
        self.state().calls.clone()
    }

    /// Count transmissions to one recipient
    pub fn transmissions_to(&self, recipient: &EntityId) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| matches!(call, TransportCall::Transmit { recipient: r, .. } if r == recipient))
            .count()
    }

    /// Always answer `status` for this recipient
    pub fn set_status(&self, recipient: &EntityId, status: TransmitStatus) {
        let mut state = self.state();
        state.unavailable.remove(recipient);
        state.sticky.insert(recipient.clone(), status);
    }

    /// Answer `status` for the next transmission to this recipient only
    pub fn queue_status(&self, recipient: &EntityId, status: TransmitStatus) {
        self.state()
            .queued
            .entry(recipient.clone())
            .or_default()
            .push_back(status);
    }

    /// Fail transmissions to this recipient with a transport error
    pub fn set_unavailable(&self, recipient: &EntityId, reason: impl Into<String>) {
        self.state()
            .unavailable
            .insert(recipient.clone(), reason.into());
    }

    /// Number of peers `publish` reports as reached
    pub fn set_publish_reach(&self, reach: usize) {
        self.state().publish_reach = reach;
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeTransportState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn transmit(
        &self,
        event: &Event,
        recipient: &EntityId,
    ) -> Result<TransmitStatus, TransportError> {
        let mut state = self.state();
        state.calls.push(TransportCall::Transmit {
            event_id: event.id().clone(),
            recipient: recipient.clone(),
        });

        if let Some(reason) = state.unavailable.get(recipient) {
            return Err(TransportError::Unavailable(reason.clone()));
        }

        let queued = state
            .queued
            .get_mut(recipient)
            .and_then(|queue| queue.pop_front());
        Ok(queued
            .or_else(|| state.sticky.get(recipient).copied())
            .unwrap_or(TransmitStatus::Acknowledged))
    }

    async fn publish(&self, event: &Event) -> Result<usize, TransportError> {
        let mut state = self.state();
        state.calls.push(TransportCall::Publish {
            event_id: event.id().clone(),
        });
        Ok(state.publish_reach)
    }

    async fn send_receipt(&self, to: &EntityId, receipt: Receipt) -> Result<(), TransportError> {
        self.state().calls.push(TransportCall::SendReceipt {
            to: to.clone(),
            receipt,
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
