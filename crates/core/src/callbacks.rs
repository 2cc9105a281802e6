// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Caller-supplied delivery callbacks

use crate::delivery::DeliveryOutcome;
use crate::error::DeliveryError;
use crate::event::{EntityId, Event};
use std::fmt;
use std::sync::Arc;

pub type EventHandler = Arc<dyn Fn(&Event) + Send + Sync>;
pub type RecipientHandler = Arc<dyn Fn(&Event, &EntityId) + Send + Sync>;
pub type ErrorHandler = Arc<dyn Fn(&Event, &EntityId, DeliveryError) + Send + Sync>;

/// Independently optional handler slots for one dispatch
#[derive(Clone, Default)]
pub struct DeliveryCallbacks {
    on_sending: Option<RecipientHandler>,
    on_caching: Option<EventHandler>,
    on_delivery: Option<RecipientHandler>,
    on_timeout: Option<RecipientHandler>,
    on_error: Option<ErrorHandler>,
}

impl DeliveryCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_sending(mut self, f: impl Fn(&Event, &EntityId) + Send + Sync + 'static) -> Self {
        self.on_sending = Some(Arc::new(f));
        self
    }

    pub fn on_caching(mut self, f: impl Fn(&Event) + Send + Sync + 'static) -> Self {
        self.on_caching = Some(Arc::new(f));
        self
    }

    pub fn on_delivery(mut self, f: impl Fn(&Event, &EntityId) + Send + Sync + 'static) -> Self {
        self.on_delivery = Some(Arc::new(f));
        self
    }

    pub fn on_timeout(mut self, f: impl Fn(&Event, &EntityId) + Send + Sync + 'static) -> Self {
        self.on_timeout = Some(Arc::new(f));
        self
    }

    pub fn on_error(
        mut self,
        f: impl Fn(&Event, &EntityId, DeliveryError) + Send + Sync + 'static,
    ) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }

    /// True when the caller asked for delivery or error feedback
    pub fn notification_wanted(&self) -> bool {
        self.on_delivery.is_some() || self.on_error.is_some()
    }

    pub fn fire_sending(&self, event: &Event, recipient: &EntityId) {
        if let Some(f) = &self.on_sending {
            f(event, recipient);
        }
    }

    /// Run the handler for an outcome, if one was supplied
    pub fn fire(&self, event: &Event, recipient: &EntityId, outcome: DeliveryOutcome) {
        match outcome {
            DeliveryOutcome::Caching => {
                if let Some(f) = &self.on_caching {
                    f(event);
                }
            }
            DeliveryOutcome::Delivered => {
                if let Some(f) = &self.on_delivery {
                    f(event, recipient);
                }
            }
            DeliveryOutcome::TimedOut => {
                if let Some(f) = &self.on_timeout {
                    f(event, recipient);
                }
            }
            DeliveryOutcome::Failed(error) => {
                if let Some(f) = &self.on_error {
                    f(event, recipient, error);
                }
            }
        }
    }
}

impl fmt::Debug for DeliveryCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryCallbacks")
            .field("on_sending", &self.on_sending.is_some())
            .field("on_caching", &self.on_caching.is_some())
            .field("on_delivery", &self.on_delivery.is_some())
            .field("on_timeout", &self.on_timeout.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
