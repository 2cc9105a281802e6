// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-recipient delivery state machine
//!
//! ```text
//! Pending ──► Cached ──► Delivered | TimedOut | Failed
//!    └──────────────────► Delivered | TimedOut | Failed
//! ```
//!
//! Terminal states absorb every later report, so each (event, recipient)
//! pair reports at most one terminal outcome.

use crate::error::DeliveryError;
use crate::event::{EntityId, EventId};
use serde::{Deserialize, Serialize};

/// Result of a delivery attempt for one recipient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "error", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// Queued locally; not terminal
    Caching,
    /// Recipient acknowledged
    Delivered,
    /// Reference deadline passed without a response
    TimedOut,
    /// Explicit failure
    Failed(DeliveryError),
}

impl DeliveryOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DeliveryOutcome::Caching)
    }

    pub fn name(&self) -> &'static str {
        match self {
            DeliveryOutcome::Caching => "caching",
            DeliveryOutcome::Delivered => "delivered",
            DeliveryOutcome::TimedOut => "timed_out",
            DeliveryOutcome::Failed(_) => "failed",
        }
    }
}

/// Delivery state of one (event, recipient) pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeliveryState {
    #[default]
    Pending,
    Cached,
    Delivered,
    TimedOut,
    Failed(DeliveryError),
}

impl DeliveryState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeliveryState::Delivered | DeliveryState::TimedOut | DeliveryState::Failed(_)
        )
    }

    /// Apply a reported outcome
    ///
    /// Returns the next state and the outcome to notify, if the report caused
    /// a transition. Repeated caching and anything after a terminal state
    /// yield no notification.
    pub fn apply(self, outcome: DeliveryOutcome) -> (DeliveryState, Option<DeliveryOutcome>) {
        if self.is_terminal() {
            return (self, None);
        }

        match (self, outcome) {
            (DeliveryState::Cached, DeliveryOutcome::Caching) => (self, None),
            (_, DeliveryOutcome::Caching) => (DeliveryState::Cached, Some(outcome)),
            (_, DeliveryOutcome::Delivered) => (DeliveryState::Delivered, Some(outcome)),
            (_, DeliveryOutcome::TimedOut) => (DeliveryState::TimedOut, Some(outcome)),
            (_, DeliveryOutcome::Failed(error)) => (DeliveryState::Failed(error), Some(outcome)),
        }
    }
}

/// Receiver's answer for one delivered event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    Accepted,
    Rejected(DeliveryError),
}

/// Acknowledgement sent from a recipient back to the event's source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub event_id: EventId,
    pub recipient: EntityId,
    pub status: ReceiptStatus,
}

impl Receipt {
    pub fn accepted(event_id: EventId, recipient: EntityId) -> Self {
        Self {
            event_id,
            recipient,
            status: ReceiptStatus::Accepted,
        }
    }

    pub fn rejected(event_id: EventId, recipient: EntityId, error: DeliveryError) -> Self {
        Self {
            event_id,
            recipient,
            status: ReceiptStatus::Rejected(error),
        }
    }

    /// The delivery outcome this receipt reports
    pub fn outcome(&self) -> DeliveryOutcome {
        match self.status {
            ReceiptStatus::Accepted => DeliveryOutcome::Delivered,
            ReceiptStatus::Rejected(error) => DeliveryOutcome::Failed(error),
        }
    }
}

#[cfg(test)]
#[path = "delivery_tests.rs"]
mod tests;
