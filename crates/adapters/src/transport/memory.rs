// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process overlay network
//!
//! Every attached identity gets an inbox. Peers can be switched offline to
//! simulate lost connectivity: transmissions to or from an offline peer report
//! `NoRoute`, and transmissions to an identity that was never attached are
//! rejected with `BadDestination`.

use super::{Inbound, InboxReceiver, InboxSender, TransmitStatus, Transport, TransportError};
use async_trait::async_trait;
use courier_core::{DeliveryError, EntityId, Event, Receipt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

struct Peer {
    inbox: InboxSender,
    online: bool,
}

/// Shared in-memory network connecting runtime instances
#[derive(Clone, Default)]
pub struct MemoryNetwork {
    peers: Arc<Mutex<HashMap<EntityId, Peer>>>,
}

impl MemoryNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an identity, returning its transport and inbox
    ///
    /// Attaching an identity again replaces its inbox.
    pub fn attach(&self, identity: EntityId) -> (MemoryTransport, InboxReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        self.peers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(identity.clone(), Peer { inbox: tx, online: true });

        let transport = MemoryTransport {
            local: identity,
            network: self.clone(),
        };
        (transport, rx)
    }

    pub fn detach(&self, identity: &EntityId) {
        self.peers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(identity);
    }

    /// Switch connectivity for an attached identity
    pub fn set_online(&self, identity: &EntityId, online: bool) {
        let mut peers = self.peers.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(peer) = peers.get_mut(identity) {
            peer.online = online;
            tracing::debug!(%identity, online, "connectivity changed");
        }
    }

    pub fn is_online(&self, identity: &EntityId) -> bool {
        self.peers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(identity)
            .is_some_and(|peer| peer.online)
    }

    /// List attached identities
    pub fn peers(&self) -> Vec<EntityId> {
        let mut peers: Vec<EntityId> = self
            .peers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        peers.sort();
        peers
    }
}

/// Transport for one identity attached to a [`MemoryNetwork`]
#[derive(Clone)]
pub struct MemoryTransport {
    local: EntityId,
    network: MemoryNetwork,
}

impl MemoryTransport {
    pub fn local(&self) -> &EntityId {
        &self.local
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn transmit(
        &self,
        event: &Event,
        recipient: &EntityId,
    ) -> Result<TransmitStatus, TransportError> {
        let peers = self.network.peers.lock().unwrap_or_else(|e| e.into_inner());

        if !peers.get(&self.local).is_some_and(|peer| peer.online) {
            return Ok(TransmitStatus::NoRoute);
        }

        let Some(peer) = peers.get(recipient) else {
            return Ok(TransmitStatus::Rejected(DeliveryError::BadDestination));
        };
        if !peer.online {
            return Ok(TransmitStatus::NoRoute);
        }

        peer.inbox
            .send(Inbound::Event(event.clone()))
            .map_err(|_| TransportError::Closed(recipient.clone()))?;
        Ok(TransmitStatus::Sent)
    }

    async fn publish(&self, event: &Event) -> Result<usize, TransportError> {
        let peers = self.network.peers.lock().unwrap_or_else(|e| e.into_inner());

        if !peers.get(&self.local).is_some_and(|peer| peer.online) {
            return Ok(0);
        }

        let mut reached = 0;
        for (identity, peer) in peers.iter() {
            if identity == &self.local || !peer.online {
                continue;
            }
            if peer.inbox.send(Inbound::Event(event.clone())).is_ok() {
                reached += 1;
            }
        }
        Ok(reached)
    }

    async fn send_receipt(&self, to: &EntityId, receipt: Receipt) -> Result<(), TransportError> {
        let peers = self.network.peers.lock().unwrap_or_else(|e| e.into_inner());

        if !peers.get(&self.local).is_some_and(|peer| peer.online) {
            return Err(TransportError::Unavailable(format!("{} is offline", self.local)));
        }

        let peer = peers
            .get(to)
            .filter(|peer| peer.online)
            .ok_or_else(|| TransportError::Unavailable(format!("no route to {}", to)))?;

        peer.inbox
            .send(Inbound::Receipt(receipt))
            .map_err(|_| TransportError::Closed(to.clone()))
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
