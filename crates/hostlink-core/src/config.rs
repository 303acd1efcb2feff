// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge settings.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{BridgeError, Result};
use crate::version::SemverVersion;

/// Timeout applied when `default_timeout_ms` is not set.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Serializable part of a bridge configuration.
///
/// Transports and error handlers are runtime values and live in the bridge
/// crate's `BridgeConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    /// The consumer's current protocol version.
    pub version: SemverVersion,
    /// Per-request timeout in milliseconds (default 5000).
    #[serde(alias = "defaultTimeout", skip_serializing_if = "Option::is_none")]
    pub default_timeout_ms: Option<u64>,
    /// User-agent string used to pick the platform transport.
    #[serde(alias = "userAgent", skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            version: SemverVersion::Default,
            default_timeout_ms: None,
            user_agent: None,
        }
    }
}

impl BridgeSettings {
    pub fn new(version: SemverVersion) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.default_timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Effective per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS))
    }

    /// Reject settings no bridge can run with.
    pub fn validate(&self) -> Result<()> {
        if self.default_timeout_ms == Some(0) {
            return Err(BridgeError::Config(
                "default_timeout_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Load settings from a JSON file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let settings: Self = serde_json::from_str(&data)?;
        settings.validate()?;
        debug!(version = %settings.version, "bridge settings loaded");
        Ok(settings)
    }

    /// Write settings as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}
