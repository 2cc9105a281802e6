// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transport adapters: move events and receipts between runtime instances

mod memory;

pub use memory::{MemoryNetwork, MemoryTransport};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeTransport, TransportCall};

use async_trait::async_trait;
use courier_core::{DeliveryError, EntityId, Event, Receipt};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from transport operations
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport unavailable: {0}")]
    Unavailable(String),
    #[error("inbox closed for {0}")]
    Closed(EntityId),
}

/// Immediate result of handing an event to the transport for one recipient
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitStatus {
    /// Delivered and acknowledged in the same step
    Acknowledged,
    /// Handed over; the receipt arrives later through the inbox
    Sent,
    /// No connectivity to the recipient right now
    NoRoute,
    /// Refused without reaching a runtime that could accept it
    Rejected(DeliveryError),
}

/// Traffic arriving at a runtime instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Event(Event),
    Receipt(Receipt),
}

/// Sender half of a runtime inbox
pub type InboxSender = mpsc::UnboundedSender<Inbound>;
/// Receiver half of a runtime inbox
pub type InboxReceiver = mpsc::UnboundedReceiver<Inbound>;

/// Adapter for the overlay network between runtime instances
#[async_trait]
pub trait Transport: Clone + Send + Sync + 'static {
    /// Attempt to transmit an event to one recipient
    async fn transmit(
        &self,
        event: &Event,
        recipient: &EntityId,
    ) -> Result<TransmitStatus, TransportError>;

    /// Broadcast a publish/subscribe event; returns the number of peers reached
    async fn publish(&self, event: &Event) -> Result<usize, TransportError>;

    /// Send a receipt back to the source of an event
    async fn send_receipt(&self, to: &EntityId, receipt: Receipt) -> Result<(), TransportError>;
}
