// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event service: one runtime instance bound to an authenticated identity

use crate::cache::LocalCache;
use crate::coordinator::{DeliveryCoordinator, DispatchOptions};
use crate::seen::SeenEvents;
use chrono::{DateTime, Utc};
use courier_adapters::{Inbound, InboxReceiver, Transport};
use courier_core::{
    Clock, DeliveryError, EntityId, Event, EventError, EventFactory, EventReceiver, IdGen,
    ListenerFilter, ListenerId, ListenerRegistry, Policy, Receipt, RuntimeConfig, StaticPolicy,
    SystemClock, UuidIdGen,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Public surface of the events API for one local identity
///
/// Cloning shares listeners, tracking, cache and background tasks.
#[derive(Clone)]
pub struct EventService<T: Transport, C: Clock = SystemClock, G: IdGen = UuidIdGen> {
    identity: EntityId,
    factory: EventFactory<C, G>,
    registry: ListenerRegistry<G>,
    coordinator: DeliveryCoordinator<T, C>,
    policy: Arc<dyn Policy>,
    clock: C,
    /// Ids of inbound events already handed to listeners
    seen: Arc<Mutex<SeenEvents>>,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
    retransmit_interval: Option<Duration>,
}

impl<T: Transport> EventService<T> {
    /// Build a service from configuration with the system clock and UUID ids
    pub fn from_config(config: &RuntimeConfig, transport: T) -> Self {
        let policy: Arc<dyn Policy> = Arc::new(StaticPolicy::from_config(config));
        Self::new(config, transport, SystemClock, UuidIdGen, policy)
    }
}

impl<T: Transport, C: Clock, G: IdGen> EventService<T, C, G> {
    pub fn new(
        config: &RuntimeConfig,
        transport: T,
        clock: C,
        id_gen: G,
        policy: Arc<dyn Policy>,
    ) -> Self {
        let identity = config.identity.clone();
        Self {
            factory: EventFactory::new(
                identity.clone(),
                clock.clone(),
                id_gen.clone(),
                Arc::clone(&policy),
            ),
            registry: ListenerRegistry::new(id_gen, config.max_listeners),
            coordinator: DeliveryCoordinator::new(
                transport,
                clock.clone(),
                LocalCache::new(config.cache_capacity),
                Arc::clone(&policy),
            ),
            identity,
            policy,
            clock,
            seen: Arc::new(Mutex::new(SeenEvents::new(config.seen_capacity))),
            tasks: Arc::new(Mutex::new(Vec::new())),
            retransmit_interval: config.retransmit_interval,
        }
    }

    pub fn identity(&self) -> &EntityId {
        &self.identity
    }

    pub fn coordinator(&self) -> &DeliveryCoordinator<T, C> {
        &self.coordinator
    }

    pub fn cache(&self) -> &LocalCache {
        self.coordinator.cache()
    }

    /// Create an event whose source is this service's identity
    pub fn create_event(
        &self,
        event_type: &str,
        to: impl IntoIterator<Item = EntityId>,
        payload: Option<String>,
        with_timestamp: bool,
        expiry: Option<DateTime<Utc>>,
    ) -> Result<Event, EventError> {
        self.factory
            .create(event_type, to, payload, with_timestamp, expiry)
    }

    pub fn add_listener(
        &self,
        filter: ListenerFilter,
        callback: impl Fn(&Event) + Send + Sync + 'static,
    ) -> Result<ListenerId, EventError> {
        self.registry.register(filter, callback)
    }

    /// Register a listener that receives matching events through a channel
    pub fn add_listener_channel(
        &self,
        filter: ListenerFilter,
    ) -> Result<(ListenerId, EventReceiver), EventError> {
        self.registry.register_channel(filter)
    }

    pub fn remove_listener(&self, id: &ListenerId) {
        self.registry.unregister(id);
    }

    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of inbound event ids currently remembered for duplicate suppression
    pub fn seen_count(&self) -> usize {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub async fn dispatch(&self, event: Event, options: DispatchOptions) -> Result<(), EventError> {
        self.coordinator.dispatch(event, options).await
    }

    /// Send a copy of `event` to new recipients as a fresh event
    ///
    /// Returns the forwarded event so callers can correlate outcomes.
    pub async fn forward(
        &self,
        event: &Event,
        forward_to: impl IntoIterator<Item = EntityId>,
        with_timestamp: bool,
        options: DispatchOptions,
    ) -> Result<Event, EventError> {
        let forwarded = self
            .factory
            .derive_forward(event, forward_to, with_timestamp)?;
        tracing::debug!(original = %event.id(), id = %forwarded.id(), "forwarding event");
        self.coordinator
            .dispatch(forwarded.clone(), options)
            .await?;
        Ok(forwarded)
    }

    /// Reply to the source of `event`
    pub async fn respond(
        &self,
        event: &Event,
        event_type: &str,
        payload: Option<String>,
        options: DispatchOptions,
    ) -> Result<Event, EventError> {
        let response = self
            .factory
            .derive_response(event, event_type, payload, true)?;
        self.coordinator
            .dispatch(response.clone(), options)
            .await?;
        Ok(response)
    }

    /// Retry cached events for one recipient
    pub async fn retransmit(&self, recipient: &EntityId) -> usize {
        self.coordinator.retransmit(recipient).await
    }

    /// Retry cached events for every recipient that has any
    pub async fn retransmit_all(&self) -> usize {
        let mut resolved = 0;
        for recipient in self.cache().recipients() {
            resolved += self.coordinator.retransmit(&recipient).await;
        }
        resolved
    }

    /// Start consuming the inbox, plus periodic retransmission if configured
    pub fn start(&self, inbox: InboxReceiver) {
        let span = tracing::info_span!("service", identity = %self.identity);
        let pump = tokio::spawn(self.clone().pump(inbox).instrument(span.clone()));
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        tasks.push(pump);

        if let Some(period) = self.retransmit_interval {
            let service = self.clone();
            tasks.push(tokio::spawn(
                async move {
                    let mut interval = tokio::time::interval(period);
                    // The first tick completes immediately
                    interval.tick().await;
                    loop {
                        interval.tick().await;
                        let resolved = service.retransmit_all().await;
                        if resolved > 0 {
                            tracing::debug!(resolved, "periodic retransmission");
                        }
                    }
                }
                .instrument(span),
            ));
        }
    }

    /// Stop background tasks; pending tracking and cached events are kept
    pub fn shutdown(&self) {
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        for task in tasks.drain(..) {
            task.abort();
        }
        tracing::info!(identity = %self.identity, "service stopped");
    }

    async fn pump(self, mut inbox: InboxReceiver) {
        while let Some(inbound) = inbox.recv().await {
            match inbound {
                Inbound::Event(event) => self.accept(event).await,
                Inbound::Receipt(receipt) => self.coordinator.on_receipt(&receipt),
            }
        }
        tracing::debug!("inbox closed");
    }

    /// Receive one inbound event
    ///
    /// Rejected events are answered with a negative receipt. Accepted events
    /// reach listeners once per id; re-deliveries are acknowledged again.
    pub async fn accept(&self, event: Event) {
        let point_to_point = !event.to().is_subscribers();

        if let Err(error) = self.check_inbound(&event) {
            tracing::info!(id = %event.id(), from = %event.from(), %error, "event rejected");
            if point_to_point {
                let receipt = Receipt::rejected(event.id().clone(), self.identity.clone(), error);
                self.send_receipt(event.from(), receipt).await;
            }
            return;
        }

        let fresh = self
            .seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(event.id(), event.expiry(), self.clock.now());

        if fresh {
            let matched = self.registry.match_and_dispatch(&event);
            tracing::debug!(id = %event.id(), from = %event.from(), matched, "event received");
            self.coordinator.observe_response(&event);
        } else {
            tracing::debug!(id = %event.id(), "duplicate event acknowledged");
        }

        if point_to_point {
            let receipt = Receipt::accepted(event.id().clone(), self.identity.clone());
            self.send_receipt(event.from(), receipt).await;
        }
    }

    fn check_inbound(&self, event: &Event) -> Result<(), DeliveryError> {
        if event.event_type().is_empty() {
            return Err(DeliveryError::Invalid);
        }
        if event.is_expired(self.clock.now()) {
            return Err(DeliveryError::Expired);
        }
        if !self.policy.may_receive(&self.identity, event) {
            return Err(DeliveryError::SecurityDenied);
        }
        Ok(())
    }

    async fn send_receipt(&self, to: &EntityId, receipt: Receipt) {
        if let Err(e) = self.coordinator.transport().send_receipt(to, receipt).await {
            tracing::debug!(%to, error = %e, "receipt dropped");
        }
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
