// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types shared by the event runtime

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned synchronously from creation, registration and dispatch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("security error: {0}")]
    Security(String),
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),
    #[error("config error: {0}")]
    Config(String),
}

/// Per-recipient delivery failure, reported through `on_error` and never thrown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryError {
    /// The recipient rejected the event as malformed
    #[error("invalid event")]
    Invalid,
    /// Unknown or unreachable recipient
    #[error("bad destination")]
    BadDestination,
    /// The event expired before it could be delivered
    #[error("event expired")]
    Expired,
    /// Policy blocked receipt
    #[error("security denied")]
    SecurityDenied,
}
