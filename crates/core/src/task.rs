// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Work items a coordinator hands to workers through the shared backlog.

use serde::{Deserialize, Serialize};

use crate::{define_id, ProcessId};

define_id! {
    pub struct TaskId("task");
}

/// A circuit breaker on reassignment: a task bounced between workers this
/// many times is parked rather than retried forever.
pub const MAX_REASSIGNMENTS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Queued,
    Assigned,
    InProgress,
    Completed,
    Failed,
    /// Reassignment count hit [`MAX_REASSIGNMENTS`]; requires operator or
    /// coordinator intervention to move again.
    Parked,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

simple_display!(TaskStatus {
    Queued => "queued",
    Assigned => "assigned",
    InProgress => "in_progress",
    Completed => "completed",
    Failed => "failed",
    Parked => "parked",
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub workflow: crate::WorkflowId,
    pub description: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub assigned_to: Option<ProcessId>,
    #[serde(default)]
    pub reassignment_count: u32,
    pub created_at_millis: i64,
    #[serde(default)]
    pub result_summary: Option<String>,
}

impl Task {
    /// Assign to a worker, bumping the reassignment count if it was
    /// previously assigned elsewhere. Parks the task once the count hits
    /// [`MAX_REASSIGNMENTS`] instead of assigning again.
    pub fn assign(&mut self, worker: ProcessId) {
        if self.assigned_to.is_some() {
            self.reassignment_count += 1;
        }
        if self.reassignment_count >= MAX_REASSIGNMENTS {
            self.status = TaskStatus::Parked;
            self.assigned_to = None;
            return;
        }
        self.assigned_to = Some(worker);
        self.status = TaskStatus::Assigned;
    }

    pub fn complete(&mut self, summary: impl Into<String>) {
        self.status = TaskStatus::Completed;
        self.result_summary = Some(summary.into());
    }

    pub fn fail(&mut self, summary: impl Into<String>) {
        self.status = TaskStatus::Failed;
        self.result_summary = Some(summary.into());
    }
}

builder! {
    pub struct TaskBuilder => Task {
        into {
            description: String = "do the thing",
        }
        set {
            status: TaskStatus = TaskStatus::Queued,
            reassignment_count: u32 = 0,
            created_at_millis: i64 = 0,
        }
        option {
            assigned_to: ProcessId = None,
            result_summary: String = None,
        }
        computed {
            id: TaskId = TaskId::new(),
            workflow: crate::WorkflowId = crate::WorkflowId::new(),
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;

#[cfg(all(test, feature = "test-support"))]
#[path = "task_proptests.rs"]
mod proptests;
