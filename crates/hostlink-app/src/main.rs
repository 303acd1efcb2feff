// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Hostlink: loopback harness.
//
// Usage: hostlink [settings.json]
//
// Loads bridge settings (or uses defaults), wires a bridge to an in-process
// simulated host, performs one versioned request and one event, and prints
// what came back as JSON.

mod services;

use std::process::ExitCode;

use hostlink_core::BridgeSettings;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Hostlink starting");

    let settings = match std::env::args().nth(1) {
        Some(path) => match BridgeSettings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::error!(error = %e, %path, "could not load bridge settings");
                return ExitCode::FAILURE;
            }
        },
        None => BridgeSettings::default(),
    };

    let report = match services::demo::run(settings).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, kind = e.kind(), "loopback run failed");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "could not render report");
            ExitCode::FAILURE
        }
    }
}
