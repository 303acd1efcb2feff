// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native side of the protocol.
//
// A `HostEndpoint` answers request envelopes and pushes events, the way the
// iOS/Android shell would. It backs the loopback harness and the integration
// tests, and is usable as a reference for writing a real host.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use hostlink_core::envelope::{Envelope, EventEnvelope, RequestEnvelope, ResponseEnvelope};
use hostlink_core::error::{ErrorRecord, KIND_DEFAULT, Result};
use hostlink_core::version::SemverVersion;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::BoxFuture;
use crate::transport::TransportAdapter;

/// Async host method. An `Err` is sent back as the response's error object.
pub type HostMethod =
    Arc<dyn Fn(Value) -> BoxFuture<'static, std::result::Result<Value, ErrorRecord>> + Send + Sync>;

/// Rewrites a request before it is dispatched.
pub type Interceptor = Arc<dyn Fn(RequestEnvelope) -> RequestEnvelope + Send + Sync>;

#[derive(Clone)]
pub struct HostEndpoint {
    methods: HashMap<String, HostMethod>,
    interceptors: Vec<Interceptor>,
    outbound: Arc<dyn TransportAdapter>,
}

impl HostEndpoint {
    /// Endpoint that posts responses and events through `outbound`.
    pub fn new(outbound: Arc<dyn TransportAdapter>) -> Self {
        Self {
            methods: HashMap::new(),
            interceptors: Vec::new(),
            outbound,
        }
    }

    pub fn method<F, Fut>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Value, ErrorRecord>> + Send + 'static,
    {
        let boxed: HostMethod = Arc::new(
            move |params| -> BoxFuture<'static, std::result::Result<Value, ErrorRecord>> {
                Box::pin(handler(params))
            },
        );
        self.methods.insert(name.into(), boxed);
        self
    }

    /// Append an interceptor. Interceptors run in registration order.
    pub fn intercept(
        mut self,
        interceptor: impl Fn(RequestEnvelope) -> RequestEnvelope + Send + Sync + 'static,
    ) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Answer one raw inbound message.
    ///
    /// Anything that is not a well-formed request is logged and dropped. The
    /// only error is a failure to post the response.
    #[instrument(skip_all)]
    pub async fn handle(&self, raw: &str) -> Result<()> {
        let request = match Envelope::parse(raw) {
            Ok(Envelope::Request(request)) => request,
            Ok(_) => {
                debug!("host ignoring non-request envelope");
                return Ok(());
            }
            Err(err) => {
                warn!(error = %err, "host dropping malformed message");
                return Ok(());
            }
        };
        let request = self
            .interceptors
            .iter()
            .fold(request, |request, interceptor| interceptor(request));

        let response = match self.methods.get(&request.method) {
            Some(method) => match method(request.params.clone()).await {
                Ok(payload) => ResponseEnvelope::success(&request, payload),
                Err(error) => ResponseEnvelope::failure(&request, error),
            },
            None => {
                warn!(method = %request.method, "host has no such method");
                ResponseEnvelope::failure(
                    &request,
                    ErrorRecord::new(
                        KIND_DEFAULT,
                        format!("No method found for {}", request.method),
                    ),
                )
            }
        };
        debug!(
            id = %response.id,
            method = %response.method,
            ok = response.error.is_none(),
            "host responding"
        );
        self.post(response.into())
    }

    /// Push an event to the web side.
    pub fn emit(
        &self,
        method: impl Into<String>,
        version: SemverVersion,
        payload: Value,
    ) -> Result<()> {
        self.post(EventEnvelope::new(method, version, payload).into())
    }

    fn post(&self, envelope: Envelope) -> Result<()> {
        let json = envelope.to_json()?;
        self.outbound.post_message(&json)
    }
}

impl fmt::Debug for HostEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        methods.sort_unstable();
        f.debug_struct("HostEndpoint")
            .field("methods", &methods)
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}
