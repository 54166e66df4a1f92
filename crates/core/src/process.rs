// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A process is one long-lived AI CLI subprocess: the coordinator, a
//! worker, or the observer. Unlike [`crate::WorkflowId`] or
//! [`crate::TaskId`], a `ProcessId` is a stable human-assigned name
//! (`"coordinator"`, `"worker-1"`) rather than a random id, so it gets its
//! own string newtype instead of [`crate::define_id!`].

use serde::{Deserialize, Serialize};


/// Stable, human-readable identifier for a process within a workflow:
/// `"coordinator"`, `"worker-1"`, `"worker-2"`, `"observer"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub String);

impl ProcessId {
    pub fn coordinator() -> Self {
        Self("coordinator".to_string())
    }

    pub fn observer() -> Self {
        Self("observer".to_string())
    }

    pub fn worker(n: usize) -> Self {
        Self(format!("worker-{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_coordinator(&self) -> bool {
        self.0 == "coordinator"
    }

    pub fn is_worker(&self) -> bool {
        self.0.starts_with("worker-")
    }
}

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProcessId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ProcessId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for ProcessId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProcessId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::borrow::Borrow<str> for ProcessId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// What role a process plays in its workflow. Governs which commands it
/// may issue and which events the control plane expects from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessRole {
    Coordinator,
    Worker,
    Observer,
}

simple_display!(ProcessRole {
    Coordinator => "coordinator",
    Worker => "worker",
    Observer => "observer",
});

/// Lifecycle state of a process's underlying subprocess.
///
/// `Dormant` means the process has a preserved session reference but no
/// live subprocess — it can be resumed without losing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    Starting,
    Running,
    Busy,
    Idle,
    Dormant,
    Stopping,
    Stopped,
    Crashed,
}

impl ProcessStatus {
    pub fn has_live_subprocess(self) -> bool {
        matches!(
            self,
            ProcessStatus::Starting | ProcessStatus::Running | ProcessStatus::Busy | ProcessStatus::Idle
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ProcessStatus::Stopped | ProcessStatus::Crashed)
    }
}

simple_display!(ProcessStatus {
    Starting => "starting",
    Running => "running",
    Busy => "busy",
    Idle => "idle",
    Dormant => "dormant",
    Stopping => "stopping",
    Stopped => "stopped",
    Crashed => "crashed",
});

/// Running totals for cost and token use, aggregated per the rules in
/// [`crate::session`]: cost sums across turns, context tokens replace,
/// output tokens accumulate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessMetrics {
    pub total_cost_usd: f64,
    pub context_tokens: u64,
    pub cumulative_output_tokens: u64,
    pub turn_count: u64,
}

impl ProcessMetrics {
    /// Fold one turn's usage report into the running totals.
    pub fn record_turn(&mut self, turn_cost_usd: f64, context_tokens: u64, output_tokens: u64) {
        self.total_cost_usd += turn_cost_usd;
        self.context_tokens = context_tokens;
        self.cumulative_output_tokens += output_tokens;
        self.turn_count += 1;
    }
}

/// A process record: one AI CLI subprocess and everything the orchestrator
/// tracks about it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    pub id: ProcessId,
    pub workflow: crate::WorkflowId,
    pub role: ProcessRole,
    pub status: ProcessStatus,
    #[serde(default)]
    pub session_ref: Option<String>,
    pub metrics: ProcessMetrics,
    pub started_at_millis: i64,
    pub last_activity_millis: i64,
    #[serde(default)]
    pub current_task: Option<crate::TaskId>,
}

impl Process {
    /// Move to `Dormant`, preserving the session reference so a later
    /// `Resume` command can reattach without losing context.
    pub fn go_dormant(&mut self, at_millis: i64) {
        self.status = ProcessStatus::Dormant;
        self.last_activity_millis = at_millis;
    }

    pub fn touch(&mut self, at_millis: i64) {
        self.last_activity_millis = at_millis;
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
