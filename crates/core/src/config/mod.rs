// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file is a valid
//! configuration for an instance named `local`.

use crate::error::EventError;
use crate::event::EntityId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default upper bound on listener registrations per runtime
pub const DEFAULT_MAX_LISTENERS: usize = 1024;
/// Default number of events cached per unreachable recipient
pub const DEFAULT_CACHE_CAPACITY: usize = 256;
/// Default number of inbound event ids remembered for duplicate suppression
pub const DEFAULT_SEEN_CAPACITY: usize = 4096;

/// Configuration for one event runtime instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Authenticated identity of this instance; becomes `from` of created events
    pub identity: EntityId,
    /// Maximum number of listener registrations
    pub max_listeners: usize,
    /// Maximum number of cached events per recipient
    pub cache_capacity: usize,
    /// Maximum number of inbound event ids remembered for duplicate suppression
    pub seen_capacity: usize,
    /// Retransmit cached events on this interval (unset: only on request)
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub retransmit_interval: Option<Duration>,
    pub policy: PolicyConfig,
}

/// Access rules applied by `StaticPolicy`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Identities besides `identity` this instance may originate events as
    pub originate_as: Vec<EntityId>,
    /// Event types this instance refuses to send
    pub blocked_types: Vec<String>,
    /// Sources whose events this instance refuses to accept
    pub blocked_senders: Vec<EntityId>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            identity: EntityId::new("local"),
            max_listeners: DEFAULT_MAX_LISTENERS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            seen_capacity: DEFAULT_SEEN_CAPACITY,
            retransmit_interval: None,
            policy: PolicyConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Default configuration for the given identity
    pub fn for_identity(identity: impl Into<String>) -> Self {
        Self {
            identity: EntityId::new(identity),
            ..Self::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, EventError> {
        let config: Self = toml::from_str(content).map_err(|e| EventError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, EventError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| EventError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, EventError> {
        toml::to_string(self).map_err(|e| EventError::Config(e.to_string()))
    }

    fn validate(&self) -> Result<(), EventError> {
        if self.identity.as_str().is_empty() {
            return Err(EventError::Config("identity must not be empty".to_string()));
        }
        if self.seen_capacity == 0 {
            return Err(EventError::Config(
                "seen_capacity must be greater than zero".to_string(),
            ));
        }
        if self.retransmit_interval == Some(Duration::ZERO) {
            return Err(EventError::Config(
                "retransmit_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
