// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-process bridge.
//
// Request handlers live in this process, so a request is a direct call to the
// handler version closest to (not above) the bridge's version. Inbound
// messages `{"type": <name>, "payload": ...}` are passed through the matching
// response handler version before response listeners see them.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, Weak};

use hostlink_core::envelope::EventData;
use hostlink_core::error::{BridgeError, Result};
use hostlink_core::error_handlers::ErrorHandlers;
use hostlink_core::selector::VersionTable;
use hostlink_core::version::SemverVersion;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::BoxFuture;
use crate::dispatch::{EventListeners, ListenerId};
use crate::lock;
use crate::source::{MessageSource, SubscriptionId};

pub type RequestHandler = Arc<dyn Fn(Value) -> BoxFuture<'static, Result<Value>> + Send + Sync>;
pub type ResponseHandler = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Version-keyed request and response handler tables.
#[derive(Clone, Default)]
pub struct LocalHandlers {
    requests: HashMap<String, VersionTable<RequestHandler>>,
    responses: HashMap<String, VersionTable<ResponseHandler>>,
}

impl LocalHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` as version `version` of request `method`.
    pub fn request<F, Fut>(
        mut self,
        method: impl Into<String>,
        version: SemverVersion,
        handler: F,
    ) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        let boxed: RequestHandler = Arc::new(move |params| -> BoxFuture<'static, Result<Value>> {
            Box::pin(handler(params))
        });
        self.requests.entry(method.into()).or_default().insert(version, boxed);
        self
    }

    /// Register `handler` as version `version` of the response transform
    /// for `name`.
    pub fn response<F>(
        mut self,
        name: impl Into<String>,
        version: SemverVersion,
        handler: F,
    ) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.responses
            .entry(name.into())
            .or_default()
            .insert(version, Arc::new(handler));
        self
    }
}

impl fmt::Debug for LocalHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalHandlers")
            .field("requests", &self.requests.keys().collect::<Vec<_>>())
            .field("responses", &self.responses.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Deserialize)]
struct InboundMessage {
    #[serde(rename = "type")]
    name: String,
    #[serde(default)]
    payload: Value,
}

struct LocalShared {
    version: SemverVersion,
    responses: HashMap<String, VersionTable<ResponseHandler>>,
    listeners: EventListeners,
    error_handlers: ErrorHandlers,
}

impl LocalShared {
    fn handle_inbound(&self, raw: &str) {
        let message: InboundMessage = match serde_json::from_str(raw) {
            Ok(message) => message,
            Err(err) => {
                warn!(error = %err, "dropping malformed inbound message");
                let _ = self.error_handlers.report(err.into());
                return;
            }
        };
        let resolved = self
            .responses
            .get(&message.name)
            .and_then(|table| table.resolve(&self.version));
        let Some((version, transform)) = resolved else {
            let _ = self.error_handlers.report(BridgeError::NoHandler {
                method: message.name,
            });
            return;
        };
        let data = EventData {
            version,
            data: transform(message.payload),
        };
        if self.listeners.emit(&message.name, &data) == 0 {
            debug!(name = %message.name, "no response listeners");
        }
    }
}

/// Bridge whose request handlers run in-process.
pub struct LocalBridge {
    requests: HashMap<String, VersionTable<RequestHandler>>,
    shared: Arc<LocalShared>,
    source: Arc<dyn MessageSource>,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl LocalBridge {
    pub fn new(
        version: SemverVersion,
        handlers: LocalHandlers,
        error_handlers: ErrorHandlers,
        source: Arc<dyn MessageSource>,
    ) -> Self {
        let shared = Arc::new(LocalShared {
            version,
            responses: handlers.responses,
            listeners: EventListeners::new(),
            error_handlers,
        });
        let weak: Weak<LocalShared> = Arc::downgrade(&shared);
        let subscription = source.subscribe(Arc::new(move |raw: &str| {
            if let Some(shared) = weak.upgrade() {
                shared.handle_inbound(raw);
            }
        }));
        info!(%version, methods = handlers.requests.len(), "local bridge initialised");
        Self {
            requests: handlers.requests,
            shared,
            source,
            subscription: Mutex::new(Some(subscription)),
        }
    }

    pub fn version(&self) -> SemverVersion {
        self.shared.version
    }

    /// Start the handler for `method` that best matches the bridge version.
    ///
    /// Fails immediately with `NoHandler` when the resolved slot is empty.
    #[instrument(skip_all, fields(method = %method))]
    pub fn request(
        &self,
        method: &str,
        params: Value,
    ) -> Result<BoxFuture<'static, Result<Value>>> {
        let resolved = self
            .requests
            .get(method)
            .and_then(|table| table.resolve(&self.shared.version));
        let Some((version, handler)) = resolved else {
            warn!(version = %self.shared.version, "no handler");
            return Err(BridgeError::NoHandler {
                method: method.to_owned(),
            });
        };
        debug!(%version, "dispatching to local handler");
        Ok(handler(params))
    }

    /// `request` and await the handler.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        self.request(method, params)?.await
    }

    /// Listen for transformed inbound messages named `name`.
    pub fn add_response_listener(
        &self,
        name: impl Into<String>,
        listener: impl Fn(&EventData) + Send + Sync + 'static,
    ) -> ListenerId {
        self.shared.listeners.on(name, Arc::new(listener))
    }

    /// Remove one listener. Returns whether it was registered.
    pub fn remove_response_listener(&self, id: ListenerId) -> bool {
        self.shared.listeners.remove(id)
    }

    /// Leave the message source. Idempotent.
    pub fn teardown(&self) {
        if let Some(subscription) = lock(&self.subscription).take() {
            self.source.unsubscribe(subscription);
            self.shared.listeners.clear();
            debug!("local bridge torn down");
        }
    }
}

impl Drop for LocalBridge {
    fn drop(&mut self) {
        self.teardown();
    }
}
