// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wire envelopes exchanged with the native host as JSON text.
//
//   request  {id, type:"request",  method, version, params}
//   response {id, type:"response", method, version, payload?, error?:{type, message}}
//   event    {    type:"event",    method, version, payload}

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ErrorRecord, Result};
use crate::version::SemverVersion;

/// Outbound call to a host method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub id: String,
    pub method: String,
    pub version: SemverVersion,
    #[serde(default)]
    pub params: Value,
}

impl RequestEnvelope {
    pub fn new(
        id: impl Into<String>,
        method: impl Into<String>,
        version: SemverVersion,
        params: Value,
    ) -> Self {
        Self {
            id: id.into(),
            method: method.into(),
            version,
            params,
        }
    }
}

/// Answer to a request, correlated by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub id: String,
    pub method: String,
    pub version: SemverVersion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorRecord>,
}

impl ResponseEnvelope {
    /// Successful answer to `request`.
    pub fn success(request: &RequestEnvelope, payload: Value) -> Self {
        Self {
            id: request.id.clone(),
            method: request.method.clone(),
            version: request.version,
            payload: Some(payload),
            error: None,
        }
    }

    /// Failed answer to `request`.
    pub fn failure(request: &RequestEnvelope, error: ErrorRecord) -> Self {
        Self {
            id: request.id.clone(),
            method: request.method.clone(),
            version: request.version,
            payload: None,
            error: Some(error),
        }
    }
}

/// Push notification from the host. Not correlated to any request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub method: String,
    pub version: SemverVersion,
    #[serde(default)]
    pub payload: Value,
}

impl EventEnvelope {
    pub fn new(method: impl Into<String>, version: SemverVersion, payload: Value) -> Self {
        Self {
            method: method.into(),
            version,
            payload,
        }
    }
}

/// Any envelope, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Envelope {
    Request(RequestEnvelope),
    Response(ResponseEnvelope),
    Event(EventEnvelope),
}

impl Envelope {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<RequestEnvelope> for Envelope {
    fn from(envelope: RequestEnvelope) -> Self {
        Self::Request(envelope)
    }
}

impl From<ResponseEnvelope> for Envelope {
    fn from(envelope: ResponseEnvelope) -> Self {
        Self::Response(envelope)
    }
}

impl From<EventEnvelope> for Envelope {
    fn from(envelope: EventEnvelope) -> Self {
        Self::Event(envelope)
    }
}

/// Successful call result tagged with the version the payload conforms to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Versioned<T> {
    pub version: SemverVersion,
    pub result: T,
}

/// What event listeners receive: `{version, data}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventData<T = Value> {
    pub version: SemverVersion,
    pub data: T,
}
