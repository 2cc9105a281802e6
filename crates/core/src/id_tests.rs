// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashSet;

#[test]
fn uuid_event_ids_do_not_repeat() {
    let id_gen = UuidIdGen;
    let ids: HashSet<EventId> = (0..1000).map(|_| id_gen.event_id()).collect();
    assert_eq!(ids.len(), 1000);
    assert!(ids.iter().all(|id| uuid::Uuid::parse_str(id.as_str()).is_ok()));
}

#[test]
fn identity_scoped_ids_count_up_from_one() {
    let id_gen = SequentialIdGen::for_identity(&EntityId::new("alice"));
    assert_eq!(id_gen.event_id(), EventId("alice-1".to_string()));
    assert_eq!(id_gen.event_id(), EventId("alice-2".to_string()));
    assert_eq!(id_gen.listener_id(), ListenerId("alice-3".to_string()));
}

#[test]
fn clones_share_one_sequence() {
    let events = SequentialIdGen::new("evt");
    let listeners = events.clone();
    assert_eq!(events.next(), "evt-1");
    assert_eq!(listeners.next(), "evt-2");
    assert_eq!(events.next(), "evt-3");
}
