// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Hostlink: Core types shared by the bridge, the host endpoint and the app:
// semantic versions and their ordering, best-version selection, wire
// envelopes, the error taxonomy and bridge settings.

pub mod config;
pub mod envelope;
pub mod error;
pub mod error_handlers;
pub mod selector;
pub mod version;

pub use config::BridgeSettings;
pub use envelope::{
    Envelope, EventData, EventEnvelope, RequestEnvelope, ResponseEnvelope, Versioned,
};
pub use error::{BridgeError, ErrorRecord, Result};
pub use error_handlers::{ErrorHandler, ErrorHandlers};
pub use selector::{Candidate, VersionTable, select_candidate, select_version};
pub use version::{SemverVersion, VersionParseError, compare_versions};
