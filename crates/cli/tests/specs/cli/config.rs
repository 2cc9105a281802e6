//! `courier config` specs

use crate::prelude::*;

#[test]
fn defaults_are_printed_without_a_file() {
    Project::empty()
        .courier()
        .args(&["config"])
        .passes()
        .stdout_has("identity = \"local\"")
        .stdout_has("max_listeners = 1024")
        .stdout_has("cache_capacity = 256");
}

#[test]
fn file_values_override_defaults() {
    let temp = Project::empty();
    temp.file(
        "courier.toml",
        r#"
identity = "alice"
cache_capacity = 8
retransmit_interval = "5s"

[policy]
blocked_senders = ["mallory"]
"#,
    );

    temp.courier()
        .args(&["--config", "courier.toml", "config"])
        .passes()
        .stdout_has("identity = \"alice\"")
        .stdout_has("cache_capacity = 8")
        .stdout_has("retransmit_interval = \"5s\"")
        .stdout_has("blocked_senders = [\"mallory\"]");
}

#[test]
fn invalid_values_are_rejected() {
    let temp = Project::empty();
    temp.file("courier.toml", "retransmit_interval = \"0s\"\n");

    temp.courier()
        .args(&["--config", "courier.toml", "config"])
        .fails()
        .stderr_has("retransmit_interval must be greater than zero");
}
