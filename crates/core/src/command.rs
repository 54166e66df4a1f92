// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commands are the only way to mutate a workflow's state. Every command
//! flows through that workflow's single-writer command processor, which
//! applies it to produce events and effects, never the other way around.

use serde::{Deserialize, Serialize};

use crate::{CompletionStatus, FabricMessage, FabricMessageId, MessageSource, ProcessId, TaskId, WorkflowId};

/// Where a command originated: used for audit, for attributing effects, and
/// for rejecting commands a process isn't allowed to issue (only the
/// coordinator may `StopWorkflow`, for instance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum CommandSource {
    Process(ProcessId),
    ControlPlane,
    ExternalAdapter,
    Operator,
}

/// The full vocabulary of state mutations a workflow accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandKind {
    /// Boot-time only: registers a workflow's handler set with its
    /// command processor before any other command is accepted.
    Register,
    StartWorkflow,
    SpawnProcess { role: crate::ProcessRole, process: ProcessId },
    StopProcess { process: ProcessId },
    ResumeProcess { process: ProcessId, session_ref: String },
    EnqueueTask { description: String },
    AssignTask { task: TaskId, worker: ProcessId },
    ReportTaskResult { task: TaskId, success: bool, summary: String },
    SendMessage { to: ProcessId, body: String },
    PostFabricMessage(FabricMessage),
    Heartbeat { process: ProcessId },
    DrainWorkflow,
    StopWorkflow { reason: Option<String> },

    /// The coordinator declaring its run finished, successfully or not.
    /// `Failed` is reserved for faults the processor detects on its own;
    /// this is always a `Completed` workflow carrying `status`.
    SignalWorkflowComplete { status: CompletionStatus, summary: String, tasks_closed: u32 },
    /// Suspend a running workflow without tearing down its processes.
    PauseWorkflow,
    /// Resume a workflow previously paused.
    ResumeWorkflow,
    /// Retire one process and spawn a replacement with the same id and
    /// role, carrying over its queued inbox.
    ReplaceProcess { process: ProcessId },
    /// Retire one process permanently: idle processes go dormant
    /// (resumable later), anything else is stopped outright. Either way
    /// its queued inbox drains to the dead-letter log.
    RetireProcess { process: ProcessId, reason: Option<String> },
    /// One AI turn finished, successfully or not. Carries enough to roll
    /// the process's session-ref back to its pre-turn value on failure
    /// and to dispatch the next queued message on success.
    ProcessTurnComplete {
        process: ProcessId,
        succeeded: bool,
        session_ref: Option<String>,
        turn_cost_usd: f64,
        context_tokens: u64,
        output_tokens: u64,
        last_error: Option<String>,
    },
    /// Dispatch the next queued message to a process that just became
    /// ready, if one is waiting.
    DeliverQueued { process: ProcessId },
    /// Post a fabric reply; `message.reply_to` must be set.
    FabricReply(FabricMessage),
    /// A subscriber acknowledging it has consumed fabric messages up to
    /// and including each of `ids`.
    FabricAck { subscriber: ProcessId, ids: Vec<FabricMessageId> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    pub workflow: WorkflowId,
    pub source: CommandSource,
    pub kind: CommandKind,
    pub issued_at_millis: i64,
}

impl Command {
    pub fn new(workflow: WorkflowId, source: CommandSource, kind: CommandKind, issued_at_millis: i64) -> Self {
        Self { workflow, source, kind, issued_at_millis }
    }

    /// Only the coordinator, the control plane, or an operator may stop,
    /// drain, pause, resume, or declare a workflow complete, or replace or
    /// retire one of its processes; a worker issuing one of these is a
    /// validation error, not a silent no-op.
    pub fn requires_privileged_source(&self) -> bool {
        matches!(
            self.kind,
            CommandKind::StopWorkflow { .. }
                | CommandKind::DrainWorkflow
                | CommandKind::PauseWorkflow
                | CommandKind::ResumeWorkflow
                | CommandKind::SignalWorkflowComplete { .. }
                | CommandKind::ReplaceProcess { .. }
                | CommandKind::RetireProcess { .. }
        )
    }

    pub fn is_privileged(&self) -> bool {
        matches!(
            self.source,
            CommandSource::ControlPlane | CommandSource::Operator
        ) || matches!(&self.source, CommandSource::Process(p) if p.is_coordinator())
    }
}

impl From<&CommandSource> for MessageSource {
    fn from(source: &CommandSource) -> Self {
        match source {
            CommandSource::Process(id) => MessageSource::Process(id.clone()),
            CommandSource::ControlPlane | CommandSource::ExternalAdapter => MessageSource::System,
            CommandSource::Operator => MessageSource::Operator,
        }
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
