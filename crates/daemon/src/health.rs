// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-workflow heartbeat tracking. A workflow's heartbeat advances on
//! `ProcessOutputRecorded`, `ProcessSpawned`, or any other command activity;
//! a workflow with no heartbeat for longer than `stuck_threshold` is
//! flagged and, if a recovery action is registered, the coordinator is
//! replaced.

use coswarm_core::{Clock, Event, WorkflowId};
use coswarm_engine::EventBus;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Stuck,
}

/// The only recovery action the source supports: replace the coordinator.
/// Progressive back-off or other policies are an open question left for a
/// later revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    ReplaceCoordinator,
}

pub struct HealthMonitor {
    clock: Arc<dyn Clock>,
    stuck_threshold: Duration,
    last_heartbeat_millis: Mutex<HashMap<WorkflowId, i64>>,
}

impl HealthMonitor {
    pub fn new(clock: Arc<dyn Clock>, stuck_threshold: Duration) -> Self {
        Self { clock, stuck_threshold, last_heartbeat_millis: Mutex::new(HashMap::new()) }
    }

    pub fn register(&self, workflow: WorkflowId) {
        self.last_heartbeat_millis.lock().insert(workflow, self.clock.now_millis());
    }

    pub fn forget(&self, workflow: WorkflowId) {
        self.last_heartbeat_millis.lock().remove(&workflow);
    }

    /// Feed an event from a workflow's event bus; any event counts as
    /// activity and resets the heartbeat clock.
    pub fn observe(&self, workflow: WorkflowId, _event: &Event) {
        self.last_heartbeat_millis.lock().insert(workflow, self.clock.now_millis());
    }

    pub fn status(&self, workflow: WorkflowId) -> HealthStatus {
        let last = match self.last_heartbeat_millis.lock().get(&workflow).copied() {
            Some(t) => t,
            None => return HealthStatus::Healthy,
        };
        let elapsed = self.clock.now_millis().saturating_sub(last);
        if elapsed >= self.stuck_threshold.as_millis() as i64 {
            HealthStatus::Stuck
        } else {
            HealthStatus::Healthy
        }
    }

    /// Subscribes to `workflow`'s event bus and feeds every event it
    /// publishes into [`Self::observe`], so a workflow only reads as stuck
    /// once its own event stream has gone quiet, not on some separate
    /// polling cadence. Runs until the per-workflow bus drops every sender.
    pub fn attach(self: &Arc<Self>, workflow: WorkflowId, bus: Arc<EventBus>) -> tokio::task::JoinHandle<()> {
        let (mut events, _dropped) = bus.subscribe();
        let health = self.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                health.observe(workflow, &event);
            }
        })
    }

    /// Scans every registered workflow and returns the recovery action
    /// each stuck one should receive, along with how long it's been idle.
    pub fn sweep(&self) -> Vec<(WorkflowId, RecoveryAction, i64)> {
        let guard = self.last_heartbeat_millis.lock();
        let now = self.clock.now_millis();
        guard
            .iter()
            .filter_map(|(workflow, last)| {
                let idle_for_millis = now.saturating_sub(*last);
                (idle_for_millis >= self.stuck_threshold.as_millis() as i64).then_some((*workflow, RecoveryAction::ReplaceCoordinator, idle_for_millis))
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
