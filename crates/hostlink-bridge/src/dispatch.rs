// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Listener registry for push-style messages (events and local responses).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use hostlink_core::envelope::EventData;
use tracing::trace;

use crate::lock;

pub type EventListener = Arc<dyn Fn(&EventData) + Send + Sync>;

/// Handle for removing one specific listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Name-to-listeners map. Every listener registered under a name is invoked
/// on each delivery for that name.
#[derive(Default)]
pub struct EventListeners {
    next_id: AtomicU64,
    by_name: Mutex<HashMap<String, Vec<(ListenerId, EventListener)>>>,
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, name: impl Into<String>, listener: EventListener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.by_name)
            .entry(name.into())
            .or_default()
            .push((id, listener));
        id
    }

    /// Drop every listener for `name`. Returns how many were removed.
    pub fn off(&self, name: &str) -> usize {
        lock(&self.by_name).remove(name).map_or(0, |set| set.len())
    }

    /// Drop a single listener by identity.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut by_name = lock(&self.by_name);
        let mut removed = false;
        by_name.retain(|_, set| {
            let before = set.len();
            set.retain(|(listener, _)| *listener != id);
            removed |= set.len() != before;
            !set.is_empty()
        });
        removed
    }

    pub fn count(&self, name: &str) -> usize {
        lock(&self.by_name).get(name).map_or(0, Vec::len)
    }

    pub fn clear(&self) {
        lock(&self.by_name).clear();
    }

    /// Invoke every listener for `name` with `data`. Returns how many ran.
    ///
    /// Listeners run outside the lock, so they may register or remove
    /// listeners themselves.
    pub fn emit(&self, name: &str, data: &EventData) -> usize {
        let listeners: Vec<EventListener> = lock(&self.by_name)
            .get(name)
            .map(|set| set.iter().map(|(_, listener)| listener.clone()).collect())
            .unwrap_or_default();
        trace!(name, listeners = listeners.len(), "emitting");
        for listener in &listeners {
            listener(data);
        }
        listeners.len()
    }
}
