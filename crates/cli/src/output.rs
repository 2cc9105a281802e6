// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-lines output for simulated deliveries

use courier_core::{DeliveryOutcome, EntityId, Event};
use serde_json::{json, Value};

/// Print one JSON object per line
pub fn print_line(value: &Value) {
    if let Ok(line) = serde_json::to_string(value) {
        println!("{}", line);
    }
}

/// `{"outcome":"failed","error":"expired","id":...,"recipient":...}`
pub fn outcome_line(event: &Event, recipient: Option<&EntityId>, outcome: DeliveryOutcome) -> Value {
    let mut line = serde_json::to_value(outcome).unwrap_or_else(|_| json!({}));
    line["id"] = json!(event.id());
    if let Some(recipient) = recipient {
        line["recipient"] = json!(recipient);
    }
    line
}

/// `{"received":"bob","event":{...}}`
pub fn received_line(by: &EntityId, event: &Event) -> Value {
    json!({
        "received": by,
        "event": event,
    })
}
