// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `courier send` - dispatch an event across an in-memory network

use crate::output::{outcome_line, print_line, received_line};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use courier_adapters::{MemoryNetwork, MemoryTransport, TracedTransport};
use courier_core::{
    DeliveryCallbacks, DeliveryOutcome, EntityId, ListenerFilter, RuntimeConfig,
};
use courier_engine::{DispatchOptions, EventService};
use std::time::Duration;

/// Grace period for listeners on the receiving side to finish printing
const LINGER: Duration = Duration::from_millis(20);

#[derive(Args)]
pub struct SendArgs {
    /// Sending identity (defaults to the configured identity)
    #[arg(long)]
    pub from: Option<String>,

    /// Recipient identity; repeat for several, omit to publish
    #[arg(long)]
    pub to: Vec<String>,

    /// Event type
    #[arg(long = "type")]
    pub event_type: String,

    /// Opaque payload
    #[arg(long)]
    pub payload: Option<String>,

    /// Recipients that start disconnected
    #[arg(long)]
    pub offline: Vec<String>,

    /// Reconnect offline recipients and retransmit after this delay
    #[arg(long, value_parser = humantime::parse_duration)]
    pub reconnect_after: Option<Duration>,

    /// Reference timeout for delivery feedback
    #[arg(long, value_parser = humantime::parse_duration, default_value = "1s")]
    pub timeout: Duration,

    /// Expire the event this long after creation
    #[arg(long, value_parser = humantime::parse_duration)]
    pub expires_in: Option<Duration>,

    /// Fire and forget: report only caching
    #[arg(long)]
    pub no_track: bool,
}

type Service = EventService<TracedTransport<MemoryTransport>>;

/// Attach a runtime to the network and start its inbox
fn join(network: &MemoryNetwork, config: &RuntimeConfig) -> Service {
    let (transport, inbox) = network.attach(config.identity.clone());
    let service = EventService::from_config(config, TracedTransport::new(transport));
    service.start(inbox);
    service
}

pub async fn send(args: SendArgs, mut config: RuntimeConfig) -> Result<()> {
    if let Some(from) = args.from {
        config.identity = EntityId::new(from);
    }
    let recipients: Vec<EntityId> = args.to.iter().map(EntityId::new).collect();

    let network = MemoryNetwork::new();
    let sender = join(&network, &config);

    let mut peers = Vec::new();
    for recipient in &recipients {
        if recipient == &config.identity {
            continue;
        }
        let peer = join(&network, &RuntimeConfig::for_identity(recipient.as_str()));
        let by = recipient.clone();
        peer.add_listener(ListenerFilter::any(), move |event| {
            print_line(&received_line(&by, event))
        })?;
        peers.push(peer);
    }

    let offline: Vec<EntityId> = args.offline.iter().map(EntityId::new).collect();
    for identity in &offline {
        network.set_online(identity, false);
    }

    let now = Utc::now();
    let expiry = args
        .expires_in
        .map(|delay| deadline(now, delay, "--expires-in"))
        .transpose()?;
    let event = sender.create_event(&args.event_type, recipients, args.payload, true, expiry)?;
    tracing::info!(id = %event.id(), "sending event");

    let options = DispatchOptions {
        callbacks: callbacks(args.no_track),
        reference_timeout: Some(deadline(now, args.timeout, "--timeout")?),
        sync: true,
    };

    let dispatcher = sender.clone();
    let dispatch = tokio::spawn(async move { dispatcher.dispatch(event, options).await });

    if let Some(delay) = args.reconnect_after {
        tokio::time::sleep(delay).await;
        for identity in &offline {
            network.set_online(identity, true);
        }
        let resolved = sender.retransmit_all().await;
        tracing::info!(resolved, "retransmitted after reconnect");
    }

    dispatch.await??;
    tokio::time::sleep(LINGER).await;

    sender.shutdown();
    for peer in &peers {
        peer.shutdown();
    }
    Ok(())
}

/// `now + delay`, refusing delays that leave the representable time range
fn deadline(now: DateTime<Utc>, delay: Duration, flag: &str) -> Result<DateTime<Utc>> {
    chrono::Duration::from_std(delay)
        .ok()
        .and_then(|delay| now.checked_add_signed(delay))
        .ok_or_else(|| anyhow!("{flag} is too far in the future"))
}

fn callbacks(no_track: bool) -> DeliveryCallbacks {
    let callbacks = DeliveryCallbacks::new()
        .on_caching(|event| print_line(&outcome_line(event, None, DeliveryOutcome::Caching)));
    if no_track {
        return callbacks;
    }

    callbacks
        .on_delivery(|event, recipient| {
            print_line(&outcome_line(event, Some(recipient), DeliveryOutcome::Delivered))
        })
        .on_timeout(|event, recipient| {
            print_line(&outcome_line(event, Some(recipient), DeliveryOutcome::TimedOut))
        })
        .on_error(|event, recipient, error| {
            print_line(&outcome_line(
                event,
                Some(recipient),
                DeliveryOutcome::Failed(error),
            ))
        })
}
