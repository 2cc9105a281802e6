//! `courier send` specs for recipients that start disconnected

use crate::prelude::*;

#[test]
fn offline_recipient_is_cached_then_times_out() {
    let run = Project::empty()
        .courier()
        .args(&[
            "send",
            "--from",
            "alice",
            "--to",
            "bob",
            "--type",
            "chat",
            "--offline",
            "bob",
            "--timeout",
            "100ms",
        ])
        .passes();

    similar_asserts::assert_eq!(run.outcomes(), vec!["caching", "timed_out:bob"]);
    assert!(run.receivers().is_empty());
}

#[test]
fn reconnected_recipient_gets_cached_event_once() {
    let run = Project::empty()
        .courier()
        .args(&[
            "send",
            "--from",
            "alice",
            "--to",
            "bob",
            "--type",
            "chat",
            "--payload",
            "hi",
            "--offline",
            "bob",
            "--reconnect-after",
            "50ms",
            "--timeout",
            "5s",
        ])
        .passes();

    similar_asserts::assert_eq!(run.outcomes(), vec!["caching", "delivered:bob"]);
    similar_asserts::assert_eq!(run.receivers(), vec!["bob"]);
}

#[test]
fn untracked_send_reports_only_caching() {
    let run = Project::empty()
        .courier()
        .args(&[
            "send",
            "--from",
            "alice",
            "--to",
            "bob",
            "--type",
            "chat",
            "--offline",
            "bob",
            "--reconnect-after",
            "50ms",
            "--no-track",
        ])
        .passes();

    similar_asserts::assert_eq!(run.outcomes(), vec!["caching"]);
    similar_asserts::assert_eq!(run.receivers(), vec!["bob"]);
}

#[test]
fn only_offline_recipients_are_cached() {
    let run = Project::empty()
        .courier()
        .args(&[
            "send",
            "--from",
            "alice",
            "--to",
            "bob",
            "--to",
            "carol",
            "--type",
            "chat",
            "--offline",
            "carol",
            "--timeout",
            "100ms",
        ])
        .passes();

    let mut outcomes = run.outcomes();
    outcomes.sort();
    similar_asserts::assert_eq!(
        outcomes,
        vec!["caching", "delivered:bob", "timed_out:carol"]
    );
    similar_asserts::assert_eq!(run.receivers(), vec!["bob"]);
}
