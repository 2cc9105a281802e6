//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    Project::empty()
        .courier()
        .args(&["--help"])
        .passes()
        .stdout_has("send")
        .stdout_has("config");
}

#[test]
fn send_help_lists_delivery_flags() {
    Project::empty()
        .courier()
        .args(&["send", "--help"])
        .passes()
        .stdout_has("--offline")
        .stdout_has("--reconnect-after")
        .stdout_has("--no-track");
}
