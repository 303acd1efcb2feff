// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Networked bridge: outbound requests with timeouts, inbound correlation.
//
// Lifecycle of one call:
//
//   request()  select version, register pending record, post envelope
//   response   record taken by id, caller completed with payload or error
//   timeout    record taken by the waiting call, caller completed with Timeout
//
// Whoever takes the record out of the pending map owns the outcome, so a
// response and a timeout for the same id can never both complete the call.
// Responses for ids that are no longer pending are dropped. The deadline is
// stored in the record itself: a response that arrives after it, or a
// `pending()` snapshot taken after it, times the record out even when no
// caller is awaiting.

use std::collections::HashMap;
use std::future::IntoFuture;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use hostlink_core::config::{BridgeSettings, DEFAULT_TIMEOUT_MS};
use hostlink_core::envelope::{
    Envelope, EventData, EventEnvelope, RequestEnvelope, ResponseEnvelope, Versioned,
};
use hostlink_core::error::{BridgeError, Result};
use hostlink_core::error_handlers::ErrorHandlers;
use hostlink_core::selector::{Candidate, select_candidate};
use hostlink_core::version::SemverVersion;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::BoxFuture;
use crate::dispatch::{EventListeners, ListenerId};
use crate::lock;
use crate::source::{MessageSource, SubscriptionId};
use crate::transport::{Platform, TransportAdapter, Transports};

/// Outcome of a call once it has been sent: a versioned payload or an error.
pub type CallResult = std::result::Result<Versioned<Value>, BridgeError>;

const TORN_DOWN: &str = "bridge torn down";

/// Everything a `Bridge` is built from. Immutable once the bridge exists.
#[derive(Debug, Clone, Default)]
pub struct BridgeConfig {
    pub settings: BridgeSettings,
    pub transports: Transports,
    pub error_handlers: ErrorHandlers,
}

impl BridgeConfig {
    pub fn new(settings: BridgeSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn with_transports(mut self, transports: Transports) -> Self {
        self.transports = transports;
        self
    }

    pub fn with_error_handlers(mut self, error_handlers: ErrorHandlers) -> Self {
        self.error_handlers = error_handlers;
        self
    }
}

struct PendingEntry {
    sender: oneshot::Sender<CallResult>,
    method: String,
    version: SemverVersion,
    sent_at: DateTime<Utc>,
    timeout: Duration,
    deadline: Instant,
}

impl PendingEntry {
    fn is_overdue(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    fn time_out(self, id: &str) {
        warn!(%id, method = %self.method, version = %self.version, "request timed out");
        let err = BridgeError::timeout(&self.method, &self.version, self.timeout);
        let _ = self.sender.send(Err(err));
    }
}

/// Snapshot of one in-flight request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingSummary {
    pub id: String,
    pub method: String,
    pub version: SemverVersion,
    pub sent_at: DateTime<Utc>,
}

/// State reachable from the inbound subscription.
struct Shared {
    pending: Mutex<HashMap<String, PendingEntry>>,
    listeners: EventListeners,
    error_handlers: ErrorHandlers,
}

impl Shared {
    fn take(&self, id: &str) -> Option<PendingEntry> {
        lock(&self.pending).remove(id)
    }

    /// Remove every record past its deadline and complete it with a timeout.
    fn expire_overdue(&self) -> usize {
        let now = Instant::now();
        let overdue: Vec<(String, PendingEntry)> = {
            let mut pending = lock(&self.pending);
            let ids: Vec<String> = pending
                .iter()
                .filter(|(_, entry)| entry.is_overdue(now))
                .map(|(id, _)| id.clone())
                .collect();
            ids.into_iter()
                .filter_map(|id| pending.remove(&id).map(|entry| (id, entry)))
                .collect()
        };
        let count = overdue.len();
        for (id, entry) in overdue {
            entry.time_out(&id);
        }
        count
    }

    fn handle_inbound(&self, raw: &str) {
        let envelope = match Envelope::parse(raw) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(error = %err, "dropping malformed inbound message");
                let _ = self.error_handlers.report(err);
                return;
            }
        };
        match envelope {
            Envelope::Response(response) => self.resolve(response),
            Envelope::Event(event) => self.deliver(event),
            Envelope::Request(request) => {
                debug!(method = %request.method, "ignoring inbound request envelope");
            }
        }
    }

    fn resolve(&self, response: ResponseEnvelope) {
        let Some(entry) = self.take(&response.id) else {
            debug!(
                id = %response.id,
                method = %response.method,
                "response for unknown request dropped"
            );
            return;
        };
        if entry.is_overdue(Instant::now()) {
            debug!(id = %response.id, method = %entry.method, "late response ignored");
            entry.time_out(&response.id);
            return;
        }
        let result = match (response.error, response.payload) {
            (Some(record), _) => {
                debug!(id = %response.id, kind = %record.kind, "request failed remotely");
                Err(self.error_handlers.reconstruct(&record))
            }
            (None, payload) => Ok(Versioned {
                version: response.version,
                result: payload.unwrap_or(Value::Null),
            }),
        };
        if entry.sender.send(result).is_err() {
            debug!(
                id = %response.id,
                method = %entry.method,
                "caller went away before its response"
            );
        }
    }

    fn deliver(&self, event: EventEnvelope) {
        let data = EventData {
            version: event.version,
            data: event.payload,
        };
        if self.listeners.emit(&event.method, &data) == 0 {
            debug!(method = %event.method, version = %event.version, "no listeners for event");
        }
    }

    fn fail_all(&self, reason: &str) -> usize {
        let drained: Vec<PendingEntry> = lock(&self.pending)
            .drain()
            .map(|(_, entry)| entry)
            .collect();
        let count = drained.len();
        for entry in drained {
            let _ = entry.sender.send(Err(BridgeError::default_error(reason)));
        }
        count
    }
}

/// Versioned request/response bridge to a native host.
pub struct Bridge {
    settings: BridgeSettings,
    platform: Platform,
    transport: Arc<dyn TransportAdapter>,
    source: Arc<dyn MessageSource>,
    subscription: Mutex<Option<SubscriptionId>>,
    shared: Arc<Shared>,
}

impl Bridge {
    /// Build a bridge and subscribe it to `source`.
    ///
    /// The transport is picked from the settings' user agent; without one the
    /// React Native slot is used.
    pub fn new(config: BridgeConfig, source: Arc<dyn MessageSource>) -> Result<Self> {
        config.settings.validate()?;
        let platform = Platform::detect(config.settings.user_agent.as_deref());
        let transport = config.transports.get(platform);

        let shared = Arc::new(Shared {
            pending: Mutex::new(HashMap::new()),
            listeners: EventListeners::new(),
            error_handlers: config.error_handlers,
        });
        let weak: Weak<Shared> = Arc::downgrade(&shared);
        let subscription = source.subscribe(Arc::new(move |raw: &str| {
            if let Some(shared) = weak.upgrade() {
                shared.handle_inbound(raw);
            }
        }));

        info!(
            %platform,
            version = %config.settings.version,
            timeout_ms = config.settings.default_timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
            "bridge initialised"
        );

        Ok(Self {
            settings: config.settings,
            platform,
            transport,
            source,
            subscription: Mutex::new(Some(subscription)),
            shared,
        })
    }

    /// The consumer's configured version.
    pub fn version(&self) -> SemverVersion {
        self.settings.version
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn timeout(&self) -> Duration {
        self.settings.timeout()
    }

    /// Send `method` using the candidate closest to (not above) the
    /// configured version.
    ///
    /// `Err` here means nothing was sent: no candidate qualifies or its params
    /// could not be serialized. Everything after sending (timeout, remote
    /// error, transport failure) arrives through the returned `PendingCall`.
    #[instrument(skip_all, fields(method = %method))]
    pub fn request<P: Serialize>(
        &self,
        method: &str,
        candidates: &[Candidate<P>],
    ) -> Result<PendingCall> {
        let current = self.settings.version;
        let Some(chosen) = select_candidate(candidates, &current) else {
            warn!(%current, offered = candidates.len(), "no suitable version");
            return Err(BridgeError::NoSuitableVersion {
                method: method.to_owned(),
                version: current,
            });
        };
        let version = chosen.version;
        let params = serde_json::to_value(&chosen.params)?;

        let id = Uuid::new_v4().to_string();
        let payload =
            Envelope::from(RequestEnvelope::new(id.clone(), method, version, params)).to_json()?;

        self.shared.expire_overdue();
        let timeout = self.settings.timeout();
        let deadline = Instant::now() + timeout;
        let (sender, receiver) = oneshot::channel();
        lock(&self.shared.pending).insert(
            id.clone(),
            PendingEntry {
                sender,
                method: method.to_owned(),
                version,
                sent_at: Utc::now(),
                timeout,
                deadline,
            },
        );
        let call = PendingCall {
            id,
            method: method.to_owned(),
            version,
            timeout,
            deadline,
            receiver,
            shared: Arc::downgrade(&self.shared),
        };

        debug!(id = %call.id, %version, platform = %self.platform, "posting request");
        if let Err(err) = self.transport.post_message(&payload) {
            warn!(id = %call.id, error = %err, "transport rejected request");
            if let Some(entry) = self.shared.take(&call.id) {
                let _ = entry.sender.send(Err(err));
            }
        }
        Ok(call)
    }

    /// `request` and wait, with both failure layers folded into one result.
    pub async fn call<P: Serialize>(
        &self,
        method: &str,
        candidates: &[Candidate<P>],
    ) -> CallResult {
        self.request(method, candidates)?.await
    }

    /// Listen for events named `name`.
    pub fn on(
        &self,
        name: impl Into<String>,
        listener: impl Fn(&EventData) + Send + Sync + 'static,
    ) -> ListenerId {
        self.shared.listeners.on(name, Arc::new(listener))
    }

    /// Remove every listener for `name`.
    pub fn off(&self, name: &str) -> usize {
        self.shared.listeners.off(name)
    }

    /// In-flight requests, oldest first. Records past their deadline are
    /// timed out first and never reported.
    pub fn pending(&self) -> Vec<PendingSummary> {
        self.shared.expire_overdue();
        let mut summaries: Vec<PendingSummary> = lock(&self.shared.pending)
            .iter()
            .map(|(id, entry)| PendingSummary {
                id: id.clone(),
                method: entry.method.clone(),
                version: entry.version,
                sent_at: entry.sent_at,
            })
            .collect();
        summaries.sort_by(|a, b| a.sent_at.cmp(&b.sent_at).then_with(|| a.id.cmp(&b.id)));
        summaries
    }

    /// Leave the message source and fail every pending call. Idempotent.
    pub fn teardown(&self) {
        let Some(subscription) = lock(&self.subscription).take() else {
            return;
        };
        self.source.unsubscribe(subscription);
        let failed = self.shared.fail_all(TORN_DOWN);
        self.shared.listeners.clear();
        info!(failed, "bridge torn down");
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// A sent request awaiting its response.
///
/// Await it (or call [`PendingCall::wait`]) for the result. Dropping it
/// unawaited abandons the call and frees its pending record.
#[must_use = "a request's outcome is only observed by awaiting it"]
pub struct PendingCall {
    id: String,
    method: String,
    version: SemverVersion,
    timeout: Duration,
    deadline: Instant,
    receiver: oneshot::Receiver<CallResult>,
    shared: Weak<Shared>,
}

impl PendingCall {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Version the request was sent as.
    pub fn version(&self) -> SemverVersion {
        self.version
    }

    pub async fn wait(mut self) -> CallResult {
        match tokio::time::timeout_at(self.deadline, &mut self.receiver).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(BridgeError::default_error(TORN_DOWN)),
            Err(_) => self.expire(),
        }
    }

    fn expire(&mut self) -> CallResult {
        let ours = self
            .shared
            .upgrade()
            .and_then(|shared| shared.take(&self.id))
            .is_some();
        if !ours {
            // The record was taken just before the timer fired.
            if let Ok(result) = self.receiver.try_recv() {
                return result;
            }
        }
        warn!(
            id = %self.id,
            method = %self.method,
            version = %self.version,
            "request timed out"
        );
        Err(BridgeError::timeout(&self.method, &self.version, self.timeout))
    }
}

impl IntoFuture for PendingCall {
    type Output = CallResult;
    type IntoFuture = BoxFuture<'static, CallResult>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.wait())
    }
}

impl Drop for PendingCall {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.take(&self.id);
        }
    }
}
