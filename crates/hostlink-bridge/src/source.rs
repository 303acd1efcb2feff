// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Inbound message channel.
//
// On a device the host pushes strings into the web layer through a single
// process-wide hook. Here that hook is an explicit `MessageSource` so every
// bridge owns its subscription and two bridges never share hidden state.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use hostlink_core::error::Result;
use tracing::trace;

use crate::lock;
use crate::transport::TransportAdapter;

/// Callback receiving one raw inbound message.
pub type MessageHandler = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Where inbound messages come from.
pub trait MessageSource: Send + Sync {
    fn subscribe(&self, handler: MessageHandler) -> SubscriptionId;

    /// Removing an unknown id is a no-op.
    fn unsubscribe(&self, id: SubscriptionId);
}

#[derive(Default)]
struct HubInner {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(SubscriptionId, MessageHandler)>>,
}

/// In-process message source. Cloning shares the subscriber list.
///
/// The hub is also a transport: posting to it dispatches to its subscribers,
/// which lets a simulated host answer a bridge in the same process.
#[derive(Clone, Default)]
pub struct MessageHub {
    inner: Arc<HubInner>,
}

impl MessageHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `raw` to every current subscriber. Returns how many saw it.
    pub fn dispatch(&self, raw: &str) -> usize {
        // Snapshot so handlers may subscribe or unsubscribe while running.
        let handlers: Vec<MessageHandler> = lock(&self.inner.subscribers)
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        trace!(subscribers = handlers.len(), "dispatching inbound message");
        for handler in &handlers {
            handler(raw);
        }
        handlers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner.subscribers).len()
    }
}

impl MessageSource for MessageHub {
    fn subscribe(&self, handler: MessageHandler) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.inner.subscribers).push((id, handler));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        lock(&self.inner.subscribers).retain(|(sub, _)| *sub != id);
    }
}

impl TransportAdapter for MessageHub {
    fn post_message(&self, message: &str) -> Result<()> {
        self.dispatch(message);
        Ok(())
    }
}

impl fmt::Debug for MessageHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageHub")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, MessageHandler) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let handler: MessageHandler = Arc::new(move |raw: &str| {
            sink.lock().expect("lock").push(raw.to_owned());
        });
        (seen, handler)
    }

    #[test]
    fn dispatch_reaches_every_subscriber() {
        let hub = MessageHub::new();
        let (a, handler_a) = recorder();
        let (b, handler_b) = recorder();
        hub.subscribe(handler_a);
        hub.subscribe(handler_b);

        assert_eq!(hub.dispatch("hello"), 2);
        assert_eq!(*a.lock().expect("lock"), vec!["hello"]);
        assert_eq!(*b.lock().expect("lock"), vec!["hello"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let hub = MessageHub::new();
        let (seen, handler) = recorder();
        let id = hub.subscribe(handler);
        hub.unsubscribe(id);
        hub.unsubscribe(id);

        assert_eq!(hub.dispatch("ignored"), 0);
        assert!(seen.lock().expect("lock").is_empty());
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn handler_may_unsubscribe_itself() {
        let hub = MessageHub::new();
        let slot = Arc::new(Mutex::new(None::<SubscriptionId>));
        let (hub2, slot2) = (hub.clone(), slot.clone());
        let id = hub.subscribe(Arc::new(move |_raw: &str| {
            if let Some(id) = slot2.lock().expect("lock").take() {
                hub2.unsubscribe(id);
            }
        }));
        *slot.lock().expect("lock") = Some(id);

        hub.dispatch("first");
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn posting_to_hub_dispatches() {
        let hub = MessageHub::new();
        let (seen, handler) = recorder();
        hub.subscribe(handler);
        hub.post_message("via transport").expect("post");
        assert_eq!(*seen.lock().expect("lock"), vec!["via transport"]);
    }
}
