// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Hostlink: Versioned bridge between a web front-end and its native host.
//
// The bridge never touches platform globals. Outbound messages go through a
// `TransportAdapter` chosen from the user agent's OS; inbound messages arrive
// through an injected `MessageSource` that each bridge subscribes to on
// construction and leaves on teardown.
//
//   engine     networked bridge: ids, pending calls, timeouts, correlation
//   local      single-process bridge: version-keyed handler tables
//   host       the native side of the protocol, for loopback and tests
//   dispatch, source, transport: plumbing shared by the above

pub mod dispatch;
pub mod engine;
pub mod host;
pub mod local;
pub mod source;
pub mod transport;

use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub use dispatch::{EventListener, EventListeners, ListenerId};
pub use engine::{Bridge, BridgeConfig, CallResult, PendingCall, PendingSummary};
pub use host::{HostEndpoint, HostMethod, Interceptor};
pub use local::{LocalBridge, LocalHandlers, RequestHandler, ResponseHandler};
pub use source::{MessageHandler, MessageHub, MessageSource, SubscriptionId};
pub use transport::{
    ChannelTransport, FnTransport, LoggingTransport, Platform, TransportAdapter, Transports,
};

/// Boxed, sendable future returned by async handlers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Lock a mutex, recovering the data if a previous holder panicked.
///
/// Every critical section in this crate leaves its map consistent, so the
/// data behind a poisoned lock is still valid.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
