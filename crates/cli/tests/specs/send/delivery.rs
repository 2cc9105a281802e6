//! `courier send` specs for reachable recipients

use crate::prelude::*;

#[test]
fn online_recipient_receives_and_sender_sees_delivery() {
    let run = Project::empty()
        .courier()
        .args(&[
            "send", "--from", "alice", "--to", "bob", "--type", "chat", "--payload", "hi",
        ])
        .passes();

    similar_asserts::assert_eq!(run.receivers(), vec!["bob"]);
    similar_asserts::assert_eq!(run.outcomes(), vec!["delivered:bob"]);

    let received = run
        .json_lines()
        .into_iter()
        .find(|line| line.get("received").is_some())
        .unwrap();
    assert_eq!(received["event"]["type"], "chat");
    assert_eq!(received["event"]["from"], "alice");
    assert_eq!(received["event"]["to"][0], "bob");
    assert_eq!(received["event"]["payload"], "hi");
    assert!(received["event"]["timestamp"].is_string());
}

#[test]
fn every_recipient_gets_its_own_outcome() {
    let run = Project::empty()
        .courier()
        .args(&[
            "send", "--from", "alice", "--to", "bob", "--to", "carol", "--type", "chat",
        ])
        .passes();

    let mut outcomes = run.outcomes();
    outcomes.sort();
    similar_asserts::assert_eq!(outcomes, vec!["delivered:bob", "delivered:carol"]);
    let mut receivers = run.receivers();
    receivers.sort();
    similar_asserts::assert_eq!(receivers, vec!["bob", "carol"]);
}

#[test]
fn already_expired_event_fails_without_reaching_anyone() {
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
            "--expires-in",
            "0s",
        ])
        .passes();

    assert!(run.receivers().is_empty());
    let lines = run.json_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["outcome"], "failed");
    assert_eq!(lines[0]["error"], "expired");
    assert_eq!(lines[0]["recipient"], "bob");
}

#[test]
fn publish_without_recipients_prints_nothing() {
    Project::empty()
        .courier()
        .args(&["send", "--from", "alice", "--type", "presence"])
        .passes()
        .stdout_eq("");
}
