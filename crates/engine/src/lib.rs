// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Courier delivery engine

mod cache;
mod coordinator;
mod directory;
mod seen;
mod service;

pub use cache::LocalCache;
pub use coordinator::{DeliveryCoordinator, DispatchOptions};
pub use directory::{ServiceDirectory, ServiceHandle, ServiceId, EVENTS_API};
pub use service::EventService;
