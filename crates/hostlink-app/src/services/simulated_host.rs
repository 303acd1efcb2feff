// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process stand-in for the iOS/Android shell.

use std::sync::Arc;

use hostlink_bridge::{HostEndpoint, MessageHub};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Host answering `getUserProfile`. The fields in the reply depend on which
/// fields the request asked for, so each protocol version gets its own shape.
pub fn endpoint(inbound: MessageHub) -> HostEndpoint {
    HostEndpoint::new(Arc::new(inbound))
        .intercept(|request| {
            debug!(method = %request.method, version = %request.version, "host received request");
            request
        })
        .method("getUserProfile", |params| async move { Ok(profile(&params)) })
}

fn profile(params: &Value) -> Value {
    let full = json!({
        "name": "Ada Lovelace",
        "age": 36,
        "city": "London",
        "email": "ada@example.org",
    });
    let Some(fields) = params.get("fields").and_then(Value::as_array) else {
        return json!({"name": full["name"]});
    };
    let mut out = serde_json::Map::new();
    for field in fields.iter().filter_map(Value::as_str) {
        if let Some(value) = full.get(field) {
            out.insert(field.to_owned(), value.clone());
        }
    }
    Value::Object(out)
}

/// Answer every message arriving on `rx` until the sender side closes.
pub fn serve(host: HostEndpoint, mut rx: mpsc::UnboundedReceiver<String>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(raw) = rx.recv().await {
            if let Err(err) = host.handle(&raw).await {
                warn!(error = %err, "simulated host could not respond");
            }
        }
        debug!("simulated host stopped");
    })
}
