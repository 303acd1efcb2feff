// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Hostlink.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::version::{SemverVersion, VersionParseError};

/// Wire kind of the generic bridge failure.
pub const KIND_DEFAULT: &str = "default";
/// Wire kind of an elapsed request timer.
pub const KIND_TIMEOUT: &str = "timeout";
/// Wire kind of a transport-level failure.
pub const KIND_NETWORK: &str = "network";

/// Top-level error type for all Hostlink operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    // -- Kinds that cross the transport --
    #[error("{message}")]
    Default { message: String },

    #[error("{message}")]
    Timeout { message: String },

    #[error("{message}")]
    Network { message: String },

    #[error("{message}")]
    Custom { kind: String, message: String },

    // -- Local failures, raised before anything is sent --
    #[error("no suitable version of `{method}` for consumer version {version}")]
    NoSuitableVersion {
        method: String,
        version: SemverVersion,
    },

    #[error("No handler found for method: {method}")]
    NoHandler { method: String },

    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    InvalidVersion(#[from] VersionParseError),

    #[error("invalid bridge configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BridgeError>;

impl BridgeError {
    /// Generic failure with a message.
    pub fn default_error(message: impl Into<String>) -> Self {
        Self::Default {
            message: message.into(),
        }
    }

    /// A request's timer elapsed. The message names the method and the
    /// version the request was resolved to.
    pub fn timeout(method: &str, version: &SemverVersion, after: Duration) -> Self {
        Self::Timeout {
            message: format!(
                "request `{method}` (version {version}) timed out after {}ms",
                after.as_millis()
            ),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn custom(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Custom {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Stable kind used on the wire and for handler lookup.
    pub fn kind(&self) -> &str {
        match self {
            Self::Timeout { .. } => KIND_TIMEOUT,
            Self::Network { .. } => KIND_NETWORK,
            Self::Custom { kind, .. } => kind.as_str(),
            Self::Default { .. }
            | Self::NoSuitableVersion { .. }
            | Self::NoHandler { .. }
            | Self::Malformed(_)
            | Self::InvalidVersion(_)
            | Self::Config(_)
            | Self::Io(_) => KIND_DEFAULT,
        }
    }

    /// Human-readable message without the kind.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Serializable `{type, message}` form.
    pub fn to_record(&self) -> ErrorRecord {
        ErrorRecord::new(self.kind(), self.message())
    }
}

/// Error as it crosses the transport boundary.
///
/// Serialized as `{"type": ..., "message": ...}`; `kind` is accepted as an
/// alias for `type` on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    #[serde(rename = "type", alias = "kind")]
    pub kind: String,
    pub message: String,
}

impl ErrorRecord {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}
