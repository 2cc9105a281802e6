// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delivery coordinator: sends events and tracks per-recipient outcomes
//!
//! Each point-to-point dispatch transmits to every recipient on its own task.
//! When the caller asked for delivery feedback, the event is tracked until
//! every recipient has reached a terminal state; a single timer task per
//! tracked event enforces the reference timeout and the expiry.

use crate::cache::LocalCache;
use chrono::{DateTime, Utc};
use courier_adapters::{TransmitStatus, Transport};
use courier_core::clock::{self, Clock};
use courier_core::{
    DeliveryCallbacks, DeliveryError, DeliveryOutcome, DeliveryState, EntityId, Event, EventError,
    EventId, Policy, Receipt,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Options for one dispatch
#[derive(Clone, Debug, Default)]
pub struct DispatchOptions {
    pub callbacks: DeliveryCallbacks,
    /// Recipients that have not responded by this instant time out
    pub reference_timeout: Option<DateTime<Utc>>,
    /// Resolve only once every recipient has an outcome
    pub sync: bool,
}

impl DispatchOptions {
    pub fn new(callbacks: DeliveryCallbacks) -> Self {
        Self {
            callbacks,
            ..Self::default()
        }
    }

    pub fn timeout_at(mut self, deadline: DateTime<Utc>) -> Self {
        self.reference_timeout = Some(deadline);
        self
    }

    pub fn sync(mut self) -> Self {
        self.sync = true;
        self
    }
}

/// Result of a single transmission attempt
enum Attempt {
    Resolved(DeliveryOutcome),
    /// Handed over; the receipt decides the outcome
    Awaiting,
    NoRoute,
}

/// Delivery bookkeeping for one tracked event
struct Tracking {
    event: Arc<Event>,
    callbacks: DeliveryCallbacks,
    states: Mutex<HashMap<EntityId, DeliveryState>>,
    /// Count of recipients without a terminal outcome
    unresolved: watch::Sender<usize>,
}

struct Shared<T, C> {
    transport: T,
    clock: C,
    cache: LocalCache,
    policy: Arc<dyn Policy>,
    tracked: Mutex<HashMap<EventId, Arc<Tracking>>>,
}

/// Sends events to their recipients and reports outcomes through callbacks
///
/// Cloning shares the tracking table and cache.
pub struct DeliveryCoordinator<T, C> {
    shared: Arc<Shared<T, C>>,
}

impl<T, C> Clone for DeliveryCoordinator<T, C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Transport, C: Clock> DeliveryCoordinator<T, C> {
    pub fn new(transport: T, clock: C, cache: LocalCache, policy: Arc<dyn Policy>) -> Self {
        Self {
            shared: Arc::new(Shared {
                transport,
                clock,
                cache,
                policy,
                tracked: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn cache(&self) -> &LocalCache {
        &self.shared.cache
    }

    pub fn transport(&self) -> &T {
        &self.shared.transport
    }

    /// Number of events still awaiting a terminal outcome for some recipient
    pub fn tracked_count(&self) -> usize {
        self.tracked().len()
    }

    pub fn is_tracking(&self, id: &EventId) -> bool {
        self.tracked().contains_key(id)
    }

    /// Current delivery state of one (event, recipient) pair, while tracked
    pub fn state_of(&self, id: &EventId, recipient: &EntityId) -> Option<DeliveryState> {
        let tracking = self.tracking(id)?;
        let states = tracking.states.lock().unwrap_or_else(|e| e.into_inner());
        states.get(recipient).copied()
    }

    /// Dispatch an event to its audience
    ///
    /// Fails only when policy forbids sending the event or the same event is
    /// already in flight. Per-recipient failures are reported through
    /// `on_error`. Without `sync` this returns once transmissions are
    /// scheduled.
    pub async fn dispatch(&self, event: Event, options: DispatchOptions) -> Result<(), EventError> {
        if !self.shared.policy.may_send(&event) {
            return Err(EventError::Security(format!(
                "sending {} events is not permitted",
                event.event_type()
            )));
        }

        let span = tracing::info_span!(
            "dispatch",
            id = %event.id(),
            event_type = event.event_type(),
            sync = options.sync
        );

        async move {
            if event.to().is_subscribers() {
                return self.publish(event, options.sync).await;
            }

            let event = Arc::new(event);
            if options.callbacks.notification_wanted() {
                self.dispatch_tracked(event, options).await
            } else {
                self.dispatch_untracked(event, options).await;
                Ok(())
            }
        }
        .instrument(span)
        .await
    }

    /// Apply a reported outcome for one recipient of a tracked event
    ///
    /// Reports for untracked events, unknown recipients or recipients that
    /// already reached a terminal state are ignored.
    pub fn report(&self, id: &EventId, recipient: &EntityId, outcome: DeliveryOutcome) {
        let Some(tracking) = self.tracking(id) else {
            tracing::trace!(%id, %recipient, outcome = outcome.name(), "report for untracked event");
            return;
        };

        let notify = {
            let mut states = tracking.states.lock().unwrap_or_else(|e| e.into_inner());
            let Some(state) = states.get_mut(recipient) else {
                return;
            };
            let (next, notify) = state.apply(outcome);
            *state = next;
            notify
        };

        let Some(outcome) = notify else {
            return;
        };

        tracing::debug!(%id, %recipient, outcome = outcome.name(), "delivery state changed");
        tracking.callbacks.fire(&tracking.event, recipient, outcome);

        if outcome.is_terminal() {
            let mut settled = false;
            tracking.unresolved.send_modify(|remaining| {
                *remaining = remaining.saturating_sub(1);
                settled = *remaining == 0;
            });
            if settled {
                self.release(id);
            }
        }
    }

    /// Apply a receipt returned by a recipient
    pub fn on_receipt(&self, receipt: &Receipt) {
        self.report(&receipt.event_id, &receipt.recipient, receipt.outcome());
    }

    /// A response from a recipient confirms that it received the original event
    pub fn observe_response(&self, response: &Event) {
        if let Some(original) = response.in_response_to() {
            self.report(original, response.from(), DeliveryOutcome::Delivered);
        }
    }

    /// Retry every event cached for `recipient`, oldest first
    ///
    /// Stops at the first event that still has no route and puts it back,
    /// together with everything behind it. Returns the number of events that
    /// left the cache.
    pub async fn retransmit(&self, recipient: &EntityId) -> usize {
        let mut queue = std::collections::VecDeque::from(self.shared.cache.drain(recipient));
        if queue.is_empty() {
            return 0;
        }

        let mut resolved = 0;
        while let Some(event) = queue.pop_front() {
            if event.is_expired(self.shared.clock.now()) {
                tracing::debug!(id = %event.id(), %recipient, "cached event expired");
                self.report(
                    event.id(),
                    recipient,
                    DeliveryOutcome::Failed(DeliveryError::Expired),
                );
                resolved += 1;
                continue;
            }

            match self.attempt(&event, recipient).await {
                Attempt::NoRoute => {
                    queue.push_front(event);
                    break;
                }
                Attempt::Resolved(outcome) => {
                    self.report(event.id(), recipient, outcome);
                    resolved += 1;
                }
                Attempt::Awaiting => resolved += 1,
            }
        }

        if !queue.is_empty() {
            tracing::debug!(%recipient, remaining = queue.len(), "recipient still unreachable");
            self.shared.cache.restore(recipient, queue);
        }
        resolved
    }

    async fn publish(&self, event: Event, sync: bool) -> Result<(), EventError> {
        if event.is_expired(self.shared.clock.now()) {
            tracing::debug!("event expired before publishing, dropped");
            return Ok(());
        }

        let coordinator = self.clone();
        let task = tokio::spawn(
            async move {
                match coordinator.shared.transport.publish(&event).await {
                    Ok(reached) => tracing::debug!(reached, "event published"),
                    Err(e) => tracing::warn!(error = %e, "publish failed"),
                }
            }
            .in_current_span(),
        );

        if sync {
            let _ = task.await;
        }
        Ok(())
    }

    async fn dispatch_tracked(
        &self,
        event: Arc<Event>,
        options: DispatchOptions,
    ) -> Result<(), EventError> {
        let recipients = event.to().recipients().to_vec();
        let (unresolved, _) = watch::channel(recipients.len());
        let tracking = Arc::new(Tracking {
            event: Arc::clone(&event),
            callbacks: options.callbacks.clone(),
            states: Mutex::new(
                recipients
                    .iter()
                    .map(|r| (r.clone(), DeliveryState::Pending))
                    .collect(),
            ),
            unresolved,
        });

        // Registered before transmitting: a receipt may arrive while Pending
        {
            let mut tracked = self.tracked();
            if tracked.contains_key(event.id()) {
                return Err(EventError::InvalidArgument(format!(
                    "event {} is already being delivered",
                    event.id()
                )));
            }
            tracked.insert(event.id().clone(), Arc::clone(&tracking));
        }
        let mut settled = tracking.unresolved.subscribe();

        if event.is_expired(self.shared.clock.now()) {
            tracing::debug!("event expired before sending");
            for recipient in &recipients {
                self.report(
                    event.id(),
                    recipient,
                    DeliveryOutcome::Failed(DeliveryError::Expired),
                );
            }
            return Ok(());
        }

        for recipient in recipients {
            self.spawn_delivery(Arc::clone(&event), recipient, options.callbacks.clone(), true);
        }
        self.spawn_deadline(&event, options.reference_timeout);

        if options.sync {
            let _ = settled.wait_for(|remaining| *remaining == 0).await;
        }
        Ok(())
    }

    async fn dispatch_untracked(&self, event: Arc<Event>, options: DispatchOptions) {
        if event.is_expired(self.shared.clock.now()) {
            tracing::debug!("event expired before sending, dropped");
            return;
        }

        let tasks: Vec<JoinHandle<()>> = event
            .to()
            .recipients()
            .iter()
            .map(|recipient| {
                self.spawn_delivery(
                    Arc::clone(&event),
                    recipient.clone(),
                    options.callbacks.clone(),
                    false,
                )
            })
            .collect();

        if options.sync {
            for task in tasks {
                let _ = task.await;
            }
        }
    }

    /// Transmit to one recipient on its own task
    fn spawn_delivery(
        &self,
        event: Arc<Event>,
        recipient: EntityId,
        callbacks: DeliveryCallbacks,
        tracked: bool,
    ) -> JoinHandle<()> {
        let coordinator = self.clone();
        tokio::spawn(
            async move {
                callbacks.fire_sending(&event, &recipient);
                match coordinator.attempt(&event, &recipient).await {
                    Attempt::NoRoute => coordinator.cache_for(&event, &recipient, &callbacks, tracked),
                    Attempt::Resolved(outcome) if tracked => {
                        coordinator.report(event.id(), &recipient, outcome)
                    }
                    Attempt::Resolved(_) | Attempt::Awaiting => {}
                }
            }
            .in_current_span(),
        )
    }

    /// Force outcomes for recipients still unresolved at the earliest deadline
    fn spawn_deadline(&self, event: &Arc<Event>, reference_timeout: Option<DateTime<Utc>>) {
        let deadline = match (reference_timeout, event.expiry()) {
            (Some(timeout), Some(expiry)) if expiry < timeout => {
                (expiry, DeliveryOutcome::Failed(DeliveryError::Expired))
            }
            (Some(timeout), _) => (timeout, DeliveryOutcome::TimedOut),
            (None, Some(expiry)) => (expiry, DeliveryOutcome::Failed(DeliveryError::Expired)),
            (None, None) => return,
        };

        let Some(tracking) = self.tracking(event.id()) else {
            return;
        };
        let mut settled = tracking.unresolved.subscribe();
        let coordinator = self.clone();
        let (at, outcome) = deadline;
        let wait = clock::until(self.shared.clock.now(), at);

        tokio::spawn(
            async move {
                tokio::select! {
                    _ = tokio::time::sleep(wait) => {}
                    _ = settled.wait_for(|remaining| *remaining == 0) => return,
                }

                let open: Vec<EntityId> = {
                    let states = tracking.states.lock().unwrap_or_else(|e| e.into_inner());
                    let mut open: Vec<EntityId> = states
                        .iter()
                        .filter(|(_, state)| !state.is_terminal())
                        .map(|(recipient, _)| recipient.clone())
                        .collect();
                    open.sort();
                    open
                };
                tracing::debug!(outcome = outcome.name(), open = open.len(), "deadline reached");
                for recipient in open {
                    coordinator.report(tracking.event.id(), &recipient, outcome);
                }
            }
            .in_current_span(),
        );
    }

    async fn attempt(&self, event: &Event, recipient: &EntityId) -> Attempt {
        match self.shared.transport.transmit(event, recipient).await {
            Ok(TransmitStatus::Acknowledged) => Attempt::Resolved(DeliveryOutcome::Delivered),
            Ok(TransmitStatus::Sent) => Attempt::Awaiting,
            Ok(TransmitStatus::NoRoute) => Attempt::NoRoute,
            Ok(TransmitStatus::Rejected(error)) => {
                Attempt::Resolved(DeliveryOutcome::Failed(error))
            }
            Err(e) => {
                tracing::warn!(%recipient, error = %e, "transmission failed");
                Attempt::Resolved(DeliveryOutcome::Failed(DeliveryError::BadDestination))
            }
        }
    }

    fn cache_for(
        &self,
        event: &Event,
        recipient: &EntityId,
        callbacks: &DeliveryCallbacks,
        tracked: bool,
    ) {
        match self.shared.cache.enqueue(event.clone(), recipient) {
            Ok(()) if tracked => self.report(event.id(), recipient, DeliveryOutcome::Caching),
            Ok(()) => callbacks.fire(event, recipient, DeliveryOutcome::Caching),
            Err(e) => {
                tracing::warn!(id = %event.id(), %recipient, error = %e, "cache full, dropping event");
                if tracked {
                    self.report(
                        event.id(),
                        recipient,
                        DeliveryOutcome::Failed(DeliveryError::BadDestination),
                    );
                }
            }
        }
    }

    fn release(&self, id: &EventId) {
        if self.tracked().remove(id).is_some() {
            tracing::debug!(%id, "delivery settled");
        }
    }

    fn tracking(&self, id: &EventId) -> Option<Arc<Tracking>> {
        self.tracked().get(id).cloned()
    }

    fn tracked(&self) -> std::sync::MutexGuard<'_, HashMap<EventId, Arc<Tracking>>> {
        self.shared
            .tracked
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
