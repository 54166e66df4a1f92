// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A per-workflow event bus: bounded per-subscriber channels. A slow
//! subscriber drops its oldest buffered event rather than applying
//! backpressure to the command processor that's publishing.

use coswarm_core::Event;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

const DEFAULT_SUBSCRIBER_CAPACITY: usize = 256;

struct Subscriber {
    tx: mpsc::Sender<Event>,
    dropped: Arc<AtomicU64>,
}

#[derive(Default)]
pub struct EventBus {
    subscribers: parking_lot::Mutex<Vec<Subscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe with a bounded channel; returns the receiver and a counter
    /// that tracks how many events this subscriber has dropped.
    pub fn subscribe(&self) -> (mpsc::Receiver<Event>, Arc<AtomicU64>) {
        self.subscribe_with_capacity(DEFAULT_SUBSCRIBER_CAPACITY)
    }

    pub fn subscribe_with_capacity(&self, capacity: usize) -> (mpsc::Receiver<Event>, Arc<AtomicU64>) {
        let (tx, rx) = mpsc::channel(capacity);
        let dropped = Arc::new(AtomicU64::new(0));
        self.subscribers.lock().push(Subscriber { tx, dropped: dropped.clone() });
        (rx, dropped)
    }

    /// Publish to every live subscriber. A full channel counts as dropped
    /// for that subscriber and publishing continues to the rest; a closed
    /// channel is pruned.
    pub fn publish(&self, event: Event) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sub| {
            match sub.tx.try_send(event.clone()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    sub.dropped.fetch_add(1, Ordering::Relaxed);
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => false,
            }
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
