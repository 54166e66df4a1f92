// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events are the facts a command processor emits after applying a
//! command: append-only, never mutated, the only thing repositories and
//! the cross-workflow event bus ever observe.

use serde::{Deserialize, Serialize};

use crate::{ProcessId, ProcessRole, TaskId, WorkflowId};

fn ns_fragment(domain: &str, action: &str) -> String {
    format!("{domain}:{action}")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "workflow:started")]
    WorkflowStarted { workflow: WorkflowId },
    #[serde(rename = "workflow:draining")]
    WorkflowDraining { workflow: WorkflowId },
    #[serde(rename = "workflow:completed")]
    WorkflowCompleted {
        workflow: WorkflowId,
        #[serde(default)]
        status: Option<crate::CompletionStatus>,
        #[serde(default)]
        summary: Option<String>,
    },
    #[serde(rename = "workflow:failed")]
    WorkflowFailed { workflow: WorkflowId, reason: String },
    #[serde(rename = "workflow:cancelled")]
    WorkflowCancelled { workflow: WorkflowId },
    #[serde(rename = "workflow:paused")]
    WorkflowPaused { workflow: WorkflowId },
    #[serde(rename = "workflow:resumed")]
    WorkflowResumed { workflow: WorkflowId },

    #[serde(rename = "process:spawned")]
    ProcessSpawned { workflow: WorkflowId, process: ProcessId, role: ProcessRole },
    #[serde(rename = "process:ready")]
    ProcessReady { workflow: WorkflowId, process: ProcessId },
    #[serde(rename = "process:busy")]
    ProcessBusy { workflow: WorkflowId, process: ProcessId },
    #[serde(rename = "process:idle")]
    ProcessIdle { workflow: WorkflowId, process: ProcessId },
    #[serde(rename = "process:dormant")]
    ProcessDormant { workflow: WorkflowId, process: ProcessId },
    #[serde(rename = "process:resumed")]
    ProcessResumed { workflow: WorkflowId, process: ProcessId },
    #[serde(rename = "process:stopped")]
    ProcessStopped { workflow: WorkflowId, process: ProcessId },
    #[serde(rename = "process:crashed")]
    ProcessCrashed { workflow: WorkflowId, process: ProcessId, reason: String },
    #[serde(rename = "process:retired")]
    ProcessRetired { workflow: WorkflowId, process: ProcessId, reason: Option<String> },
    #[serde(rename = "process:replaced")]
    ProcessReplaced { workflow: WorkflowId, process: ProcessId },
    #[serde(rename = "process:output_recorded")]
    ProcessOutputRecorded {
        workflow: WorkflowId,
        process: ProcessId,
        turn_cost_usd: f64,
        context_tokens: u64,
        output_tokens: u64,
        #[serde(default)]
        session_ref: Option<String>,
    },
    #[serde(rename = "process:heartbeat")]
    ProcessHeartbeat { workflow: WorkflowId, process: ProcessId, at_millis: i64 },
    #[serde(rename = "process:stuck")]
    ProcessStuck { workflow: WorkflowId, process: ProcessId, idle_for_millis: i64 },

    #[serde(rename = "task:queued")]
    TaskQueued { workflow: WorkflowId, task: TaskId },
    #[serde(rename = "task:assigned")]
    TaskAssigned { workflow: WorkflowId, task: TaskId, worker: ProcessId },
    #[serde(rename = "task:reassigned")]
    TaskReassigned { workflow: WorkflowId, task: TaskId, worker: ProcessId, attempt: u32 },
    #[serde(rename = "task:parked")]
    TaskParked { workflow: WorkflowId, task: TaskId },
    #[serde(rename = "task:completed")]
    TaskCompleted { workflow: WorkflowId, task: TaskId, summary: String },
    #[serde(rename = "task:failed")]
    TaskFailed { workflow: WorkflowId, task: TaskId, summary: String },

    #[serde(rename = "message:queued")]
    MessageQueued { workflow: WorkflowId, to: ProcessId },
    #[serde(rename = "message:delivered")]
    MessageDelivered { workflow: WorkflowId, to: ProcessId },

    #[serde(rename = "fabric:posted")]
    FabricPosted { workflow: WorkflowId, from: ProcessId, channel: String },
    #[serde(rename = "fabric:acked")]
    FabricAcked { workflow: WorkflowId, subscriber: ProcessId, count: usize },

    #[serde(rename = "admission:rejected")]
    AdmissionRejected { workflow: WorkflowId, reason: String },

    #[serde(other, skip_serializing)]
    Custom,
}

impl Event {
    /// The `domain:action` tag this event round-trips to; mirrors the
    /// `#[serde(rename = ...)]` on each variant, for log lines that want
    /// the tag without the payload.
    pub fn kind(&self) -> String {
        match self {
            Event::WorkflowStarted { .. } => ns_fragment("workflow", "started"),
            Event::WorkflowDraining { .. } => ns_fragment("workflow", "draining"),
            Event::WorkflowCompleted { .. } => ns_fragment("workflow", "completed"),
            Event::WorkflowFailed { .. } => ns_fragment("workflow", "failed"),
            Event::WorkflowCancelled { .. } => ns_fragment("workflow", "cancelled"),
            Event::WorkflowPaused { .. } => ns_fragment("workflow", "paused"),
            Event::WorkflowResumed { .. } => ns_fragment("workflow", "resumed"),
            Event::ProcessSpawned { .. } => ns_fragment("process", "spawned"),
            Event::ProcessReady { .. } => ns_fragment("process", "ready"),
            Event::ProcessBusy { .. } => ns_fragment("process", "busy"),
            Event::ProcessIdle { .. } => ns_fragment("process", "idle"),
            Event::ProcessDormant { .. } => ns_fragment("process", "dormant"),
            Event::ProcessResumed { .. } => ns_fragment("process", "resumed"),
            Event::ProcessStopped { .. } => ns_fragment("process", "stopped"),
            Event::ProcessCrashed { .. } => ns_fragment("process", "crashed"),
            Event::ProcessRetired { .. } => ns_fragment("process", "retired"),
            Event::ProcessReplaced { .. } => ns_fragment("process", "replaced"),
            Event::ProcessOutputRecorded { .. } => ns_fragment("process", "output_recorded"),
            Event::ProcessHeartbeat { .. } => ns_fragment("process", "heartbeat"),
            Event::ProcessStuck { .. } => ns_fragment("process", "stuck"),
            Event::TaskQueued { .. } => ns_fragment("task", "queued"),
            Event::TaskAssigned { .. } => ns_fragment("task", "assigned"),
            Event::TaskReassigned { .. } => ns_fragment("task", "reassigned"),
            Event::TaskParked { .. } => ns_fragment("task", "parked"),
            Event::TaskCompleted { .. } => ns_fragment("task", "completed"),
            Event::TaskFailed { .. } => ns_fragment("task", "failed"),
            Event::MessageQueued { .. } => ns_fragment("message", "queued"),
            Event::MessageDelivered { .. } => ns_fragment("message", "delivered"),
            Event::FabricPosted { .. } => ns_fragment("fabric", "posted"),
            Event::FabricAcked { .. } => ns_fragment("fabric", "acked"),
            Event::AdmissionRejected { .. } => ns_fragment("admission", "rejected"),
            Event::Custom => "custom".to_string(),
        }
    }

    pub fn workflow(&self) -> Option<WorkflowId> {
        match self {
            Event::WorkflowStarted { workflow }
            | Event::WorkflowDraining { workflow }
            | Event::WorkflowCompleted { workflow, .. }
            | Event::WorkflowFailed { workflow, .. }
            | Event::WorkflowCancelled { workflow }
            | Event::WorkflowPaused { workflow }
            | Event::WorkflowResumed { workflow }
            | Event::ProcessSpawned { workflow, .. }
            | Event::ProcessReady { workflow, .. }
            | Event::ProcessBusy { workflow, .. }
            | Event::ProcessIdle { workflow, .. }
            | Event::ProcessDormant { workflow, .. }
            | Event::ProcessResumed { workflow, .. }
            | Event::ProcessStopped { workflow, .. }
            | Event::ProcessCrashed { workflow, .. }
            | Event::ProcessRetired { workflow, .. }
            | Event::ProcessReplaced { workflow, .. }
            | Event::ProcessOutputRecorded { workflow, .. }
            | Event::ProcessHeartbeat { workflow, .. }
            | Event::ProcessStuck { workflow, .. }
            | Event::TaskQueued { workflow, .. }
            | Event::TaskAssigned { workflow, .. }
            | Event::TaskReassigned { workflow, .. }
            | Event::TaskParked { workflow, .. }
            | Event::TaskCompleted { workflow, .. }
            | Event::TaskFailed { workflow, .. }
            | Event::MessageQueued { workflow, .. }
            | Event::MessageDelivered { workflow, .. }
            | Event::FabricPosted { workflow, .. }
            | Event::FabricAcked { workflow, .. }
            | Event::AdmissionRejected { workflow, .. } => Some(*workflow),
            Event::Custom => None,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
