// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use courier_core::{AllowAll, DeliveryError, EventFactory, FakeClock, SequentialIdGen};

fn chat() -> Event {
    EventFactory::new(
        EntityId::new("alice"),
        FakeClock::new(),
        SequentialIdGen::new("evt"),
        Arc::new(AllowAll),
    )
    .create("chat", [EntityId::new("bob")], None, false, None)
    .unwrap()
}

#[tokio::test]
async fn unscripted_recipients_acknowledge() {
    let transport = FakeTransport::new();
    let bob = EntityId::new("bob");

    let status = transport.transmit(&chat(), &bob).await.unwrap();
    assert_eq!(status, TransmitStatus::Acknowledged);
    assert_eq!(transport.transmissions_to(&bob), 1);
}

#[tokio::test]
async fn queued_statuses_run_before_sticky_one() {
    let transport = FakeTransport::new();
    let bob = EntityId::new("bob");
    transport.set_status(&bob, TransmitStatus::Sent);
    transport.queue_status(&bob, TransmitStatus::NoRoute);
    transport.queue_status(&bob, TransmitStatus::Rejected(DeliveryError::Invalid));

    let event = chat();
    assert_eq!(transport.transmit(&event, &bob).await.unwrap(), TransmitStatus::NoRoute);
    assert_eq!(
        transport.transmit(&event, &bob).await.unwrap(),
        TransmitStatus::Rejected(DeliveryError::Invalid)
    );
    assert_eq!(transport.transmit(&event, &bob).await.unwrap(), TransmitStatus::Sent);
}

#[tokio::test]
async fn unavailable_recipient_errors_and_records_call() {
    let transport = FakeTransport::new();
    let bob = EntityId::new("bob");
    transport.set_unavailable(&bob, "link down");

    let err = transport.transmit(&chat(), &bob).await.unwrap_err();
    assert!(err.to_string().contains("link down"));
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn publish_and_receipts_are_recorded() {
    let transport = FakeTransport::new();
    transport.set_publish_reach(3);
    let event = chat();

    assert_eq!(transport.publish(&event).await.unwrap(), 3);
    let receipt = Receipt::accepted(event.id().clone(), EntityId::new("bob"));
    transport
        .send_receipt(&EntityId::new("alice"), receipt.clone())
        .await
        .unwrap();

    assert_eq!(
        transport.calls(),
        vec![
            TransportCall::Publish {
                event_id: event.id().clone()
            },
            TransportCall::SendReceipt {
                to: EntityId::new("alice"),
                receipt
            },
        ]
    );
}
