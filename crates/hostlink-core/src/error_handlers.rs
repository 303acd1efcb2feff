// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Error-handler registry.
//
// Errors arrive from the host as `{type, message}` records.  Each record is
// rebuilt into a base `BridgeError::Default` and handed to the handler
// registered for its kind, which returns the typed error the caller sees.
// Unregistered kinds go to the mandatory default handler, which also receives
// local failures such as unparseable inbound messages.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, error};

use crate::error::{BridgeError, ErrorRecord, KIND_DEFAULT, KIND_NETWORK, KIND_TIMEOUT};

/// Maps a base error to a typed one.
pub type ErrorHandler = Arc<dyn Fn(BridgeError) -> BridgeError + Send + Sync>;

/// Kind-to-handler table with a required default entry.
///
/// The default handler is a constructor argument, so a registry without one
/// cannot be built.
#[derive(Clone)]
pub struct ErrorHandlers {
    default: ErrorHandler,
    by_kind: HashMap<String, ErrorHandler>,
}

impl ErrorHandlers {
    pub fn new(default: impl Fn(BridgeError) -> BridgeError + Send + Sync + 'static) -> Self {
        Self {
            default: Arc::new(default),
            by_kind: HashMap::new(),
        }
    }

    /// Registry whose default handler logs the error and passes it through.
    pub fn logging() -> Self {
        Self::new(|err| {
            error!(kind = err.kind(), error = %err, "bridge error");
            err
        })
    }

    /// Register a handler for `kind`. Registering `"default"` replaces the
    /// default handler.
    pub fn on(
        mut self,
        kind: impl Into<String>,
        handler: impl Fn(BridgeError) -> BridgeError + Send + Sync + 'static,
    ) -> Self {
        let kind = kind.into();
        if kind == KIND_DEFAULT {
            self.default = Arc::new(handler);
        } else {
            self.by_kind.insert(kind, Arc::new(handler));
        }
        self
    }

    /// Register `kind` as an application error: records of that kind become
    /// `BridgeError::Custom` carrying the remote message.
    pub fn on_custom(self, kind: impl Into<String>) -> Self {
        let kind = kind.into();
        let tag = kind.clone();
        self.on(kind, move |base| BridgeError::custom(tag.clone(), base.message()))
    }

    /// Register the built-in `timeout` and `network` kinds so remote reports
    /// of those failures keep their type.
    pub fn with_builtin_kinds(self) -> Self {
        self.on(KIND_TIMEOUT, |base| BridgeError::Timeout {
            message: base.message(),
        })
        .on(KIND_NETWORK, |base| BridgeError::network(base.message()))
    }

    /// Whether a dedicated handler exists for `kind`.
    pub fn handles(&self, kind: &str) -> bool {
        kind == KIND_DEFAULT || self.by_kind.contains_key(kind)
    }

    /// Rebuild a typed error from a wire record.
    pub fn reconstruct(&self, record: &ErrorRecord) -> BridgeError {
        let base = BridgeError::default_error(record.message.clone());
        match self.by_kind.get(&record.kind) {
            Some(handler) => handler(base),
            None => {
                debug!(kind = %record.kind, "no handler for error kind, using default");
                (self.default)(base)
            }
        }
    }

    /// Route a locally raised error through the default handler.
    pub fn report(&self, err: BridgeError) -> BridgeError {
        (self.default)(err)
    }
}

impl Default for ErrorHandlers {
    fn default() -> Self {
        Self::logging()
    }
}

impl fmt::Debug for ErrorHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.by_kind.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("ErrorHandlers").field("kinds", &kinds).finish_non_exhaustive()
    }
}
