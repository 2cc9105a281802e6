// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event construction bound to an authenticated origin

use crate::clock::Clock;
use crate::error::EventError;
use crate::event::{Audience, EntityId, Event, EventId, Forwarding};
use crate::id::IdGen;
use crate::policy::Policy;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Builds events on behalf of one authenticated identity
///
/// The source of every event is the identity the factory was created for;
/// callers never pass `from` themselves.
#[derive(Clone)]
pub struct EventFactory<C: Clock, G: IdGen> {
    origin: EntityId,
    clock: C,
    id_gen: G,
    policy: Arc<dyn Policy>,
}

impl<C: Clock, G: IdGen> EventFactory<C, G> {
    pub fn new(origin: EntityId, clock: C, id_gen: G, policy: Arc<dyn Policy>) -> Self {
        Self {
            origin,
            clock,
            id_gen,
            policy,
        }
    }

    pub fn origin(&self) -> &EntityId {
        &self.origin
    }

    /// Create a new event
    ///
    /// An empty `to` produces a publish/subscribe event. An `expiry` already in
    /// the past is accepted; such an event fails with `Expired` when dispatched.
    pub fn create(
        &self,
        event_type: &str,
        to: impl IntoIterator<Item = EntityId>,
        payload: Option<String>,
        with_timestamp: bool,
        expiry: Option<DateTime<Utc>>,
    ) -> Result<Event, EventError> {
        self.check_type(event_type)?;
        self.check_origin()?;

        let event = Event::new(
            self.fresh_id(),
            event_type.to_string(),
            self.origin.clone(),
            Audience::new(to),
        )
        .with_timestamp(self.stamp(with_timestamp))
        .with_expiry(expiry)
        .with_payload(payload);

        tracing::trace!(id = %event.id(), event_type, "event created");
        Ok(event)
    }

    /// Re-address an existing event to new recipients as a fresh event
    ///
    /// The copy keeps type, payload, timestamp and expiry; its source is this
    /// factory's origin and `forwarding` records where it came from.
    pub fn derive_forward(
        &self,
        original: &Event,
        forward_to: impl IntoIterator<Item = EntityId>,
        with_timestamp: bool,
    ) -> Result<Event, EventError> {
        self.check_origin()?;

        let to = Audience::new(forward_to);
        if to.is_subscribers() {
            return Err(EventError::InvalidArgument(
                "forward requires at least one recipient".to_string(),
            ));
        }

        let forwarding = Forwarding {
            original_id: original.id().clone(),
            original_from: original.from().clone(),
            at: self.stamp(with_timestamp),
        };

        Ok(Event::new(
            self.fresh_id(),
            original.event_type().to_string(),
            self.origin.clone(),
            to,
        )
        .with_timestamp(original.timestamp())
        .with_expiry(original.expiry())
        .with_payload(original.payload().map(str::to_string))
        .forwarded(forwarding))
    }

    /// Create a reply addressed to the source of `original`
    pub fn derive_response(
        &self,
        original: &Event,
        event_type: &str,
        payload: Option<String>,
        with_timestamp: bool,
    ) -> Result<Event, EventError> {
        self.check_type(event_type)?;
        self.check_origin()?;

        Ok(Event::new(
            self.fresh_id(),
            event_type.to_string(),
            self.origin.clone(),
            Audience::new([original.from().clone()]),
        )
        .with_timestamp(self.stamp(with_timestamp))
        .with_payload(payload)
        .in_response(original.id().clone()))
    }

    fn check_type(&self, event_type: &str) -> Result<(), EventError> {
        if event_type.is_empty() {
            return Err(EventError::InvalidArgument(
                "event type must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn check_origin(&self) -> Result<(), EventError> {
        if !self.policy.may_originate(&self.origin) {
            return Err(EventError::InvalidArgument(format!(
                "not permitted to originate events as {}",
                self.origin
            )));
        }
        Ok(())
    }

    fn fresh_id(&self) -> EventId {
        self.id_gen.event_id()
    }

    fn stamp(&self, with_timestamp: bool) -> Option<DateTime<Utc>> {
        with_timestamp.then(|| self.clock.now())
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
