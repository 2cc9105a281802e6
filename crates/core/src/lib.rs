// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! courier-core: event model for the Courier delivery runtime
//!
//! This crate provides:
//! - Event records, the factory that builds them, and their addressing
//! - The listener registry with wildcard filters
//! - The per-recipient delivery state machine and callback slots
//! - Access policy and runtime configuration

pub mod clock;
pub mod config;
pub mod id;
pub mod policy;

// Event model (order matters for dependencies)
pub mod error;
pub mod event;
pub mod factory;
pub mod filter;
pub mod registry;
pub mod delivery;
pub mod callbacks;

// Re-exports
pub use callbacks::DeliveryCallbacks;
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{PolicyConfig, RuntimeConfig};
pub use delivery::{DeliveryOutcome, DeliveryState, Receipt, ReceiptStatus};
pub use error::{DeliveryError, EventError};
pub use event::{Audience, EntityId, Event, EventId, Forwarding};
pub use factory::EventFactory;
pub use filter::{Filter, ListenerFilter};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use policy::{AllowAll, Policy, StaticPolicy};
pub use registry::{EventReceiver, ListenerId, ListenerRegistry};
