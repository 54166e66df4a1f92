// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fans in every running workflow's [`EventBus`] into one subscription
//! surface, tagging each event with its originating `WorkflowId` so a
//! single subscriber (the TUI/HTTP viewer, out of scope here) can watch
//! all workflows at once or filter down to one.

use coswarm_core::{Event, WorkflowId};
use coswarm_engine::EventBus;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct TaggedEvent {
    pub workflow: WorkflowId,
    pub event: Event,
}

pub struct CrossWorkflowEventBus {
    tx: mpsc::Sender<TaggedEvent>,
    rx: parking_lot::Mutex<Option<mpsc::Receiver<TaggedEvent>>>,
}

impl CrossWorkflowEventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self { tx, rx: parking_lot::Mutex::new(Some(rx)) }
    }

    /// Take the single aggregated receiver. Panics if called twice; the
    /// fan-in has exactly one consumer by design (a per-subscriber fan-out
    /// belongs to that consumer, not to this bus).
    pub fn take_receiver(&self) -> mpsc::Receiver<TaggedEvent> {
        self.rx.lock().take().expect("cross-workflow receiver already taken")
    }

    /// Subscribes to `workflow`'s event bus and forwards everything it
    /// publishes into the aggregated stream, tagged with its workflow id.
    /// Runs until the per-workflow bus drops every sender.
    pub fn attach(self: &Arc<Self>, workflow: WorkflowId, bus: Arc<EventBus>) -> tokio::task::JoinHandle<()> {
        let (mut events, _dropped) = bus.subscribe();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if tx.send(TaggedEvent { workflow, event }).await.is_err() {
                    break;
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "cross_bus_tests.rs"]
mod tests;
