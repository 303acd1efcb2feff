// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One loopback round: a request, an event, teardown.

use std::sync::Arc;

use hostlink_bridge::{Bridge, BridgeConfig, ChannelTransport, MessageHub, Platform, Transports};
use hostlink_core::{
    BridgeSettings, Candidate, ErrorHandlers, EventData, Result, SemverVersion, Versioned,
};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::simulated_host;

/// What one demo run observed.
#[derive(Debug, Serialize)]
pub struct DemoReport {
    pub platform: String,
    pub consumer_version: SemverVersion,
    pub profile: Versioned<Value>,
    pub event: Option<EventData>,
}

/// Candidates for `getUserProfile`, one per protocol generation.
fn profile_candidates() -> Vec<Candidate<Value>> {
    vec![
        Candidate::fallback(json!({"fields": ["name"]})),
        Candidate::new(SemverVersion::new(1, 0, 0), json!({"fields": ["name", "age"]})),
        Candidate::new(
            SemverVersion::new(2, 0, 0),
            json!({"fields": ["name", "age", "city", "email"]}),
        ),
    ]
}

pub async fn run(settings: BridgeSettings) -> Result<DemoReport> {
    let inbound = MessageHub::new();
    let (transport, outbound) = ChannelTransport::new();
    let host = simulated_host::endpoint(inbound.clone());
    let server = simulated_host::serve(host.clone(), outbound);

    let config = BridgeConfig::new(settings)
        .with_transports(Transports::uniform(Arc::new(transport)))
        .with_error_handlers(ErrorHandlers::logging().with_builtin_kinds());
    let bridge = Bridge::new(config, Arc::new(inbound))?;
    let platform: Platform = bridge.platform();

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    bridge.on("onUserStatusChange", move |data| {
        let _ = events_tx.send(data.clone());
    });

    let profile = bridge.call("getUserProfile", &profile_candidates()).await?;
    info!(version = %profile.version, "profile received");

    host.emit("onUserStatusChange", SemverVersion::new(2, 0, 0), json!({"online": true}))?;
    let event = match tokio::time::timeout(bridge.timeout(), events_rx.recv()).await {
        Ok(event) => event,
        Err(_) => {
            warn!("no status event within the request timeout");
            None
        }
    };

    let report = DemoReport {
        platform: platform.to_string(),
        consumer_version: bridge.version(),
        profile,
        event,
    };
    bridge.teardown();
    drop(bridge);
    // The bridge owned the transport; with it gone the host loop ends.
    if let Err(err) = server.await {
        warn!(error = %err, "simulated host task failed");
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn consumer_1_8_0_gets_the_1_0_0_shape() {
        let report = run(BridgeSettings::new(SemverVersion::new(1, 8, 0)))
            .await
            .expect("demo");
        assert_eq!(report.profile.version, SemverVersion::new(1, 0, 0));
        assert_eq!(report.profile.result, json!({"name": "Ada Lovelace", "age": 36}));
        assert_eq!(report.platform, "react-native");
        let event = report.event.expect("status event");
        assert_eq!(event.data, json!({"online": true}));
    }

    #[tokio::test]
    async fn settings_file_drives_version_and_platform() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bridge.json");
        std::fs::write(
            &path,
            r#"{
                "version": "2.3.0",
                "default_timeout_ms": 2000,
                "user_agent": "Mozilla/5.0 (Linux; Android 11; SM-G975F) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/93.0.4577.82 Mobile Safari/537.36"
            }"#,
        )
        .expect("write settings");

        let settings = BridgeSettings::load(&path).expect("load");
        let report = run(settings).await.expect("demo");
        assert_eq!(report.platform, "android");
        assert_eq!(report.consumer_version, SemverVersion::new(2, 3, 0));
        assert_eq!(report.profile.version, SemverVersion::new(2, 0, 0));
        assert_eq!(report.profile.result["email"], json!("ada@example.org"));
    }

    #[tokio::test]
    async fn default_consumer_gets_the_fallback() {
        let report = run(BridgeSettings::default()).await.expect("demo");
        assert!(report.profile.version.is_default());
        assert_eq!(report.profile.result, json!({"name": "Ada Lovelace"}));
    }
}
