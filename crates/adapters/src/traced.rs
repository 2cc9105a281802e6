// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::transport::{TransmitStatus, Transport, TransportError};
use async_trait::async_trait;
use courier_core::{EntityId, Event, Receipt};
use tracing::Instrument;

/// Wrapper that adds tracing to any Transport
#[derive(Clone)]
pub struct TracedTransport<T> {
    inner: T,
}

impl<T> TracedTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Transport> Transport for TracedTransport<T> {
    async fn transmit(
        &self,
        event: &Event,
        recipient: &EntityId,
    ) -> Result<TransmitStatus, TransportError> {
        let span = tracing::info_span!(
            "transport.transmit",
            id = %event.id(),
            event_type = event.event_type(),
            %recipient
        );

        async {
            let start = std::time::Instant::now();
            let result = self.inner.transmit(event, recipient).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(TransmitStatus::NoRoute) => tracing::info!(elapsed_ms, "no route"),
                Ok(TransmitStatus::Rejected(error)) => {
                    tracing::warn!(elapsed_ms, %error, "rejected")
                }
                Ok(status) => tracing::debug!(elapsed_ms, ?status, "transmitted"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "transmit failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn publish(&self, event: &Event) -> Result<usize, TransportError> {
        let span = tracing::info_span!(
            "transport.publish",
            id = %event.id(),
            event_type = event.event_type()
        );

        async {
            let result = self.inner.publish(event).await;
            match &result {
                Ok(reached) => tracing::debug!(reached, "published"),
                Err(e) => tracing::error!(error = %e, "publish failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn send_receipt(&self, to: &EntityId, receipt: Receipt) -> Result<(), TransportError> {
        let span = tracing::info_span!("transport.receipt", %to, id = %receipt.event_id);

        async {
            tracing::debug!(status = ?receipt.status, "sending receipt");
            let result = self.inner.send_receipt(to, receipt).await;
            // Receipts to an unreachable source are expected to be lost
            if let Err(e) = &result {
                tracing::warn!(error = %e, "receipt not sent");
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
