// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Outbound transports and platform selection.
//
// A transport is a one-way "post this string" primitive owned by the host
// platform. The bridge picks one per platform at construction time, using the
// OS classification of the configured user agent.

use std::fmt;
use std::sync::Arc;

use hostlink_core::error::{BridgeError, Result};
use hostlink_env::{OsName, detect_os};
use tokio::sync::mpsc;
use tracing::info;

/// Fire-and-forget message sink.
///
/// An `Err` means the message could not be handed over at all; success says
/// nothing about delivery.
pub trait TransportAdapter: Send + Sync {
    fn post_message(&self, message: &str) -> Result<()>;
}

/// Host platforms with a dedicated transport slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Ios,
    Android,
    ReactNative,
}

impl Platform {
    /// iOS and Android have their own adapters; everything else goes
    /// through React Native.
    pub fn for_os(os: OsName) -> Self {
        match os {
            OsName::Ios => Self::Ios,
            OsName::Android => Self::Android,
            _ => Self::ReactNative,
        }
    }

    /// Platform for an optional user agent. No agent means React Native.
    pub fn detect(user_agent: Option<&str>) -> Self {
        user_agent
            .map(|ua| Self::for_os(detect_os(ua).name))
            .unwrap_or(Self::ReactNative)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
            Self::ReactNative => "react-native",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placeholder used for any platform without a configured adapter.
#[derive(Debug, Clone, Copy)]
pub struct LoggingTransport {
    platform: Platform,
}

impl LoggingTransport {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl TransportAdapter for LoggingTransport {
    fn post_message(&self, message: &str) -> Result<()> {
        info!(
            platform = %self.platform,
            payload = %message,
            "no transport configured, message logged"
        );
        Ok(())
    }
}

/// Transport backed by an unbounded tokio channel. The receiving half plays
/// the host.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl TransportAdapter for ChannelTransport {
    fn post_message(&self, message: &str) -> Result<()> {
        self.tx
            .send(message.to_owned())
            .map_err(|_| BridgeError::network("transport channel closed"))
    }
}

/// Transport wrapping a closure.
pub struct FnTransport<F> {
    post: F,
}

impl<F> FnTransport<F>
where
    F: Fn(&str) -> Result<()> + Send + Sync,
{
    pub fn new(post: F) -> Self {
        Self { post }
    }
}

impl<F> TransportAdapter for FnTransport<F>
where
    F: Fn(&str) -> Result<()> + Send + Sync,
{
    fn post_message(&self, message: &str) -> Result<()> {
        (self.post)(message)
    }
}

/// One adapter per platform. Unset slots log instead of delivering.
#[derive(Clone)]
pub struct Transports {
    pub ios: Arc<dyn TransportAdapter>,
    pub android: Arc<dyn TransportAdapter>,
    pub react_native: Arc<dyn TransportAdapter>,
}

impl Default for Transports {
    fn default() -> Self {
        Self {
            ios: Arc::new(LoggingTransport::new(Platform::Ios)),
            android: Arc::new(LoggingTransport::new(Platform::Android)),
            react_native: Arc::new(LoggingTransport::new(Platform::ReactNative)),
        }
    }
}

impl Transports {
    /// The same adapter in every slot.
    pub fn uniform(adapter: Arc<dyn TransportAdapter>) -> Self {
        Self {
            ios: adapter.clone(),
            android: adapter.clone(),
            react_native: adapter,
        }
    }

    /// Replace the adapter for one platform.
    pub fn with(mut self, platform: Platform, adapter: Arc<dyn TransportAdapter>) -> Self {
        match platform {
            Platform::Ios => self.ios = adapter,
            Platform::Android => self.android = adapter,
            Platform::ReactNative => self.react_native = adapter,
        }
        self
    }

    pub fn get(&self, platform: Platform) -> Arc<dyn TransportAdapter> {
        match platform {
            Platform::Ios => self.ios.clone(),
            Platform::Android => self.android.clone(),
            Platform::ReactNative => self.react_native.clone(),
        }
    }
}

impl fmt::Debug for Transports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transports").finish_non_exhaustive()
    }
}
