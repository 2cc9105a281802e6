//! Error reporting specs

use crate::prelude::*;

#[test]
fn send_requires_event_type() {
    Project::empty()
        .courier()
        .args(&["send", "--from", "alice", "--to", "bob"])
        .fails()
        .stderr_has("--type");
}

#[test]
fn empty_event_type_is_invalid_argument() {
    Project::empty()
        .courier()
        .args(&["send", "--from", "alice", "--to", "bob", "--type", ""])
        .fails()
        .stderr_has("event type must not be empty");
}

#[test]
fn missing_config_file_is_reported() {
    Project::empty()
        .courier()
        .args(&["--config", "nope.toml", "config"])
        .fails()
        .stderr_has("config error")
        .stderr_has("nope.toml");
}

#[test]
fn blocked_event_type_is_security_error() {
    let temp = Project::empty();
    temp.file(
        "courier.toml",
        r#"
identity = "alice"

[policy]
blocked_types = ["chat"]
"#,
    );

    temp.courier()
        .args(&[
            "--config",
            "courier.toml",
            "send",
            "--to",
            "bob",
            "--type",
            "chat",
        ])
        .fails()
        .stderr_has("security error");
}

#[test]
fn timeout_beyond_representable_time_is_refused() {
    Project::empty()
        .courier()
        .args(&[
            "send",
            "--to",
            "bob",
            "--type",
            "chat",
            "--timeout",
            "100000000years",
        ])
        .fails()
        .stderr_has("--timeout is too far in the future");
}
