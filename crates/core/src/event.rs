// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event records exchanged between addressable entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an addressable entity (a runtime instance, device or user)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Unique event identifier, generated at creation
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who an event is addressed to
///
/// An empty recipient list is never stored: it collapses to
/// [`Audience::Subscribers`], so "set but empty" cannot be represented.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<EntityId>", into = "Vec<EntityId>")]
pub enum Audience {
    /// Publish/subscribe: delivered by matching listeners, no enumerated recipients
    #[default]
    Subscribers,
    /// Point-to-point: ordered set of recipients, never empty
    Recipients(Vec<EntityId>),
}

impl Audience {
    /// Build an audience from a recipient list, dropping duplicates in order
    pub fn new(recipients: impl IntoIterator<Item = EntityId>) -> Self {
        let mut unique: Vec<EntityId> = Vec::new();
        for recipient in recipients {
            if !unique.contains(&recipient) {
                unique.push(recipient);
            }
        }

        if unique.is_empty() {
            Audience::Subscribers
        } else {
            Audience::Recipients(unique)
        }
    }

    pub fn recipients(&self) -> &[EntityId] {
        match self {
            Audience::Subscribers => &[],
            Audience::Recipients(list) => list,
        }
    }

    pub fn is_subscribers(&self) -> bool {
        matches!(self, Audience::Subscribers)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.recipients().contains(id)
    }
}

impl From<Vec<EntityId>> for Audience {
    fn from(recipients: Vec<EntityId>) -> Self {
        Self::new(recipients)
    }
}

impl From<Audience> for Vec<EntityId> {
    fn from(audience: Audience) -> Self {
        match audience {
            Audience::Subscribers => Vec::new(),
            Audience::Recipients(list) => list,
        }
    }
}

/// Provenance of a forwarded event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forwarding {
    /// Id of the event that was forwarded
    pub original_id: EventId,
    /// Source of the event that was forwarded
    pub original_from: EntityId,
    /// When the event was forwarded, if stamped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<DateTime<Utc>>,
}

/// One message exchanged between addressable entities
///
/// Everything except the audience is fixed at creation; use
/// [`crate::EventFactory`] to build events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    #[serde(rename = "type")]
    event_type: String,
    from: EntityId,
    #[serde(default)]
    to: Audience,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expiry: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    in_response_to: Option<EventId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    forwarding: Option<Forwarding>,
}

impl Event {
    pub(crate) fn new(id: EventId, event_type: String, from: EntityId, to: Audience) -> Self {
        Self {
            id,
            event_type,
            from,
            to,
            timestamp: None,
            expiry: None,
            payload: None,
            in_response_to: None,
            forwarding: None,
        }
    }

    pub(crate) fn with_timestamp(mut self, timestamp: Option<DateTime<Utc>>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub(crate) fn with_expiry(mut self, expiry: Option<DateTime<Utc>>) -> Self {
        self.expiry = expiry;
        self
    }

    pub(crate) fn with_payload(mut self, payload: Option<String>) -> Self {
        self.payload = payload;
        self
    }

    pub(crate) fn in_response(mut self, original: EventId) -> Self {
        self.in_response_to = Some(original);
        self
    }

    pub(crate) fn forwarded(mut self, forwarding: Forwarding) -> Self {
        self.forwarding = Some(forwarding);
        self
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn from(&self) -> &EntityId {
        &self.from
    }

    pub fn to(&self) -> &Audience {
        &self.to
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expiry
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    pub fn in_response_to(&self) -> Option<&EventId> {
        self.in_response_to.as_ref()
    }

    pub fn forwarding(&self) -> Option<&Forwarding> {
        self.forwarding.as_ref()
    }

    /// Replace the recipients before dispatch
    pub fn set_recipients(&mut self, recipients: impl IntoIterator<Item = EntityId>) {
        self.to = Audience::new(recipients);
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|expiry| expiry <= now)
    }

    pub fn is_response_to(&self, id: &EventId) -> bool {
        self.in_response_to.as_ref() == Some(id)
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
