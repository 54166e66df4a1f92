// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The top-level unit of orchestration: one workflow owns one command
//! processor, one set of processes, and a single backlog.

use serde::{Deserialize, Serialize};

use crate::define_id;

define_id! {
    /// Identifies one workflow instance end to end, from admission through
    /// terminal state and on-disk session persistence.
    pub struct WorkflowId("wkfl");
}

/// How a workflow's coordinator was told to run: drive a fixed plan to
/// completion, or stay alive servicing an open-ended backlog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowMode {
    Plan,
    Backlog,
}

simple_display!(WorkflowMode {
    Plan => "plan",
    Backlog => "backlog",
});

/// Workflow lifecycle state. `Completed`, `Failed`, and `Cancelled` are
/// terminal; nothing transitions out of them. `Paused` is not: a paused
/// workflow accepts `ResumeWorkflow` and nothing else that would advance it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Pending,
    Running,
    Paused,
    Draining,
    Completed,
    Failed,
    Cancelled,
}

impl WorkflowState {
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkflowState::Completed | WorkflowState::Failed | WorkflowState::Cancelled)
    }
}

simple_display!(WorkflowState {
    Pending => "pending",
    Running => "running",
    Paused => "paused",
    Draining => "draining",
    Completed => "completed",
    Failed => "failed",
    Cancelled => "cancelled",
});

/// How a workflow's run ended, recorded alongside `Completed` so a
/// `Completed` state can still distinguish a clean finish from one the
/// coordinator cut short. `Failed` is reserved for internal faults the
/// coordinator never got a chance to report on; an explicit abort signal
/// is a `Completed` workflow with `Aborted` status, not a `Failed` one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    Success,
    Partial,
    Aborted,
}

simple_display!(CompletionStatus {
    Success => "success",
    Partial => "partial",
    Aborted => "aborted",
});

/// A running (or terminated) workflow: the aggregate root the command
/// processor mutates and the control plane schedules around.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowInstance {
    pub id: WorkflowId,
    pub application: String,
    pub mode: WorkflowMode,
    pub state: WorkflowState,
    pub max_workers: usize,
    pub created_at_millis: i64,
    pub updated_at_millis: i64,
    #[serde(default)]
    pub failure_reason: Option<String>,
    /// Set once, by `SignalWorkflowComplete`, alongside `state = Completed`.
    #[serde(default)]
    pub completion_status: Option<CompletionStatus>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub completed_at_millis: Option<i64>,
}

impl WorkflowInstance {
    /// Production constructor: the builder above is test-only scaffolding
    /// gated behind `test-support`, so control-plane code that admits a
    /// new workflow at runtime goes through here instead.
    pub fn new(application: impl Into<String>, mode: WorkflowMode, max_workers: usize, created_at_millis: i64) -> Self {
        Self {
            id: WorkflowId::new(),
            application: application.into(),
            mode,
            state: WorkflowState::Pending,
            max_workers,
            created_at_millis,
            updated_at_millis: created_at_millis,
            failure_reason: None,
            completion_status: None,
            summary: None,
            completed_at_millis: None,
        }
    }
}

builder! {
    pub struct WorkflowInstanceBuilder => WorkflowInstance {
        into {
            application: String = "app",
        }
        set {
            id: WorkflowId = WorkflowId::new(),
            mode: WorkflowMode = WorkflowMode::Plan,
            state: WorkflowState = WorkflowState::Pending,
            max_workers: usize = 4,
            created_at_millis: i64 = 0,
            updated_at_millis: i64 = 0,
            completion_status: Option<CompletionStatus> = None,
            completed_at_millis: Option<i64> = None,
        }
        option {
            failure_reason: String = None,
            summary: String = None,
        }
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
