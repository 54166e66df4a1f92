// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maps MCP tool calls onto [`Command`]s or read-only [`QueryKind`]s. Framed
//! as newline-delimited JSON to match real MCP stdio transports, rather than
//! the 4-byte length-prefixed framing used for the control plane's own
//! native socket.
//!
//! Mutating tool calls become a [`Command`] and enter the workflow's
//! single-writer queue like any other command; read-only calls
//! (`get_task_status`, `list_workers`, `read_message_log`, `fabric_inbox`,
//! `fabric_history`) never touch the queue — they're answered straight from
//! the repositories by whatever owns `MaterializedState`.

use coswarm_core::{
    Attachment, Command, CommandKind, CommandSource, FabricChannel, FabricMessage, FabricMessageId, ProcessId, TaskId,
    WorkflowId,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExternalAdapterError {
    #[error("malformed tool call: {0}")]
    Malformed(String),
    #[error("unknown tool: {0}")]
    UnknownTool(String),
}

/// One line of an MCP tool-call request, carrying the call id through so
/// the response can be paired back up by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    pub tool: String,
    pub arguments: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolCallResponse {
    pub fn ok(id: String, result: serde_json::Value) -> Self {
        Self { id, result: Some(result), error: None }
    }

    pub fn err(id: String, error: impl std::fmt::Display) -> Self {
        Self { id, result: None, error: Some(error.to_string()) }
    }
}

/// Read-only requests answered straight from repositories, never submitted
/// to a workflow's command queue.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryKind {
    GetTaskStatus { task: TaskId },
    ListWorkers,
    ReadMessageLog { process: ProcessId },
    FabricInbox { subscriber: ProcessId },
    FabricHistory { channel: FabricChannel },
}

/// What one MCP tool call resolves to: a command to submit, or a query to
/// answer directly.
#[derive(Debug, Clone)]
pub enum AdapterAction {
    Submit(Command),
    Answer(QueryKind),
}

fn require_str<'a>(args: &'a serde_json::Value, field: &str, tool: &str) -> Result<&'a str, ExternalAdapterError> {
    args.get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ExternalAdapterError::Malformed(format!("{tool} requires {field}")))
}

fn optional_str(args: &serde_json::Value, field: &str) -> Option<String> {
    args.get(field).and_then(|v| v.as_str()).map(str::to_string)
}

fn require_bool(args: &serde_json::Value, field: &str, tool: &str) -> Result<bool, ExternalAdapterError> {
    args.get(field)
        .and_then(|v| v.as_bool())
        .ok_or_else(|| ExternalAdapterError::Malformed(format!("{tool} requires {field}")))
}

fn optional_process_list(args: &serde_json::Value, field: &str) -> Vec<ProcessId> {
    args.get(field)
        .and_then(|v| v.as_array())
        .map(|items| items.iter().filter_map(|v| v.as_str()).map(ProcessId::from).collect())
        .unwrap_or_default()
}

fn optional_attachment_list(args: &serde_json::Value, field: &str) -> Vec<Attachment> {
    args.get(field)
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|path| Attachment { path: path.to_string(), description: None })
                .collect()
        })
        .unwrap_or_default()
}

fn fabric_channel(args: &serde_json::Value) -> FabricChannel {
    match args.get("channel").and_then(|v| v.as_str()) {
        Some(name) if !name.is_empty() && name != "default" => FabricChannel::Named(name.to_string()),
        _ => FabricChannel::Default,
    }
}

fn fabric_message_from(workflow: WorkflowId, from: ProcessId, args: &serde_json::Value, now: i64, tool: &str) -> Result<FabricMessage, ExternalAdapterError> {
    let body = require_str(args, "body", tool)?.to_string();
    Ok(FabricMessage {
        id: FabricMessageId::new(),
        workflow,
        channel: fabric_channel(args),
        from,
        body,
        mentions: optional_process_list(args, "mentions"),
        attachments: optional_attachment_list(args, "attachments"),
        posted_at_millis: now,
        reply_to: optional_str(args, "reply_to").map(FabricMessageId::from),
    })
}

/// Translates an incoming MCP tool call into either a [`Command`] to submit
/// or a [`QueryKind`] to answer directly, per the surface the adapter
/// recognizes: `assign_task`, `mark_task_complete`, `mark_task_failed`,
/// `get_task_status`, `list_workers`, `send_to_worker`, `replace_worker`,
/// `post_message`, `read_message_log`, `signal_ready`,
/// `signal_workflow_complete`, `fabric_send`, `fabric_reply`,
/// `fabric_inbox`, `fabric_history`, `fabric_subscribe`, `fabric_ack`,
/// `fabric_attach`, `report_implementation_complete`,
/// `report_review_verdict`, plus the original `enqueue_task`,
/// `send_message`, `stop_workflow`.
pub fn tool_call_to_action(workflow: WorkflowId, request: &ToolCallRequest, issued_at_millis: i64) -> Result<AdapterAction, ExternalAdapterError> {
    let tool = request.tool.as_str();
    let args = &request.arguments;

    // A caller-authenticated source would come from the MCP transport's own
    // process identity in a real deployment; tool calls arrive over the
    // adapter boundary, never self-attributed to a process.
    let source = CommandSource::ExternalAdapter;

    let kind = match tool {
        "enqueue_task" => CommandKind::EnqueueTask { description: require_str(args, "description", tool)?.to_string() },

        "assign_task" => CommandKind::AssignTask {
            task: TaskId::from(require_str(args, "task", tool)?),
            worker: ProcessId::from(require_str(args, "worker", tool)?),
        },

        "mark_task_complete" => CommandKind::ReportTaskResult {
            task: TaskId::from(require_str(args, "task", tool)?),
            success: true,
            summary: optional_str(args, "summary").unwrap_or_default(),
        },

        "mark_task_failed" => CommandKind::ReportTaskResult {
            task: TaskId::from(require_str(args, "task", tool)?),
            success: false,
            summary: optional_str(args, "summary").unwrap_or_default(),
        },

        "get_task_status" => return Ok(AdapterAction::Answer(QueryKind::GetTaskStatus { task: TaskId::from(require_str(args, "task", tool)?) })),

        "list_workers" => return Ok(AdapterAction::Answer(QueryKind::ListWorkers)),

        "send_message" | "post_message" => CommandKind::SendMessage { to: ProcessId::from(require_str(args, "to", tool)?), body: require_str(args, "body", tool)?.to_string() },

        "send_to_worker" => {
            let to = ProcessId::from(require_str(args, "to", tool)?);
            if !to.is_worker() {
                return Err(ExternalAdapterError::Malformed(format!("send_to_worker target {to} is not a worker")));
            }
            CommandKind::SendMessage { to, body: require_str(args, "body", tool)?.to_string() }
        }

        "replace_worker" => CommandKind::ReplaceProcess { process: ProcessId::from(require_str(args, "worker", tool)?) },

        "read_message_log" => return Ok(AdapterAction::Answer(QueryKind::ReadMessageLog { process: ProcessId::from(require_str(args, "process", tool)?) })),

        "signal_ready" => CommandKind::DeliverQueued { process: ProcessId::from(require_str(args, "process", tool)?) },

        "signal_workflow_complete" => CommandKind::SignalWorkflowComplete {
            status: parse_completion_status(args, tool)?,
            summary: optional_str(args, "summary").unwrap_or_default(),
            tasks_closed: args.get("tasks_closed").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
        },

        "fabric_send" => CommandKind::PostFabricMessage(fabric_message_from(workflow, ProcessId::coordinator(), args, issued_at_millis, tool)?),

        "fabric_reply" => {
            let msg = fabric_message_from(workflow, ProcessId::coordinator(), args, issued_at_millis, tool)?;
            if msg.reply_to.is_none() {
                return Err(ExternalAdapterError::Malformed("fabric_reply requires reply_to".to_string()));
            }
            CommandKind::FabricReply(msg)
        }

        "fabric_inbox" => return Ok(AdapterAction::Answer(QueryKind::FabricInbox { subscriber: ProcessId::from(require_str(args, "subscriber", tool)?) })),

        "fabric_history" => return Ok(AdapterAction::Answer(QueryKind::FabricHistory { channel: fabric_channel(args) })),

        // Subscription has no state of its own beyond "this subscriber has
        // an ack cursor"; acking zero ids establishes that cursor without
        // marking anything as consumed.
        "fabric_subscribe" => CommandKind::FabricAck { subscriber: ProcessId::from(require_str(args, "subscriber", tool)?), ids: Vec::new() },

        "fabric_ack" => {
            let subscriber = ProcessId::from(require_str(args, "subscriber", tool)?);
            let ids = args
                .get("ids")
                .and_then(|v| v.as_array())
                .ok_or_else(|| ExternalAdapterError::Malformed("fabric_ack requires ids".to_string()))?
                .iter()
                .filter_map(|v| v.as_str())
                .map(FabricMessageId::from)
                .collect();
            CommandKind::FabricAck { subscriber, ids }
        }

        // An attachment-bearing post: the same shape as `fabric_send`, just
        // named for the common case of attaching a file, replying if
        // `reply_to` is present.
        "fabric_attach" => {
            let msg = fabric_message_from(workflow, ProcessId::coordinator(), args, issued_at_millis, tool)?;
            if msg.attachments.is_empty() {
                return Err(ExternalAdapterError::Malformed("fabric_attach requires attachments".to_string()));
            }
            if msg.is_reply() {
                CommandKind::FabricReply(msg)
            } else {
                CommandKind::PostFabricMessage(msg)
            }
        }

        "report_implementation_complete" => CommandKind::ReportTaskResult {
            task: TaskId::from(require_str(args, "task", tool)?),
            success: true,
            summary: optional_str(args, "summary").unwrap_or_default(),
        },

        "report_review_verdict" => {
            let approved = require_bool(args, "approved", tool)?;
            CommandKind::ReportTaskResult { task: TaskId::from(require_str(args, "task", tool)?), success: approved, summary: optional_str(args, "summary").unwrap_or_default() }
        }

        "stop_workflow" => CommandKind::StopWorkflow { reason: optional_str(args, "reason") },

        other => return Err(ExternalAdapterError::UnknownTool(other.to_string())),
    };

    Ok(AdapterAction::Submit(Command::new(workflow, source, kind, issued_at_millis)))
}

fn parse_completion_status(args: &serde_json::Value, tool: &str) -> Result<coswarm_core::CompletionStatus, ExternalAdapterError> {
    match require_str(args, "status", tool)? {
        "success" => Ok(coswarm_core::CompletionStatus::Success),
        "partial" => Ok(coswarm_core::CompletionStatus::Partial),
        "aborted" => Ok(coswarm_core::CompletionStatus::Aborted),
        other => Err(ExternalAdapterError::Malformed(format!("signal_workflow_complete: unknown status {other}"))),
    }
}

/// Convenience wrapper over [`tool_call_to_action`] for callers that only
/// ever expect a command back (every mutating tool). Returns `Malformed`
/// if `request` names one of the read-only tools instead.
pub fn tool_call_to_command(workflow: WorkflowId, request: &ToolCallRequest, issued_at_millis: i64) -> Result<Command, ExternalAdapterError> {
    match tool_call_to_action(workflow, request, issued_at_millis)? {
        AdapterAction::Submit(command) => Ok(command),
        AdapterAction::Answer(_) => Err(ExternalAdapterError::Malformed(format!("{} is a read-only query, not a command", request.tool))),
    }
}

/// Parse one newline-delimited JSON line of MCP input.
pub fn parse_tool_call_line(line: &str) -> Result<ToolCallRequest, ExternalAdapterError> {
    serde_json::from_str(line.trim()).map_err(|e| ExternalAdapterError::Malformed(e.to_string()))
}

#[cfg(test)]
#[path = "external_tests.rs"]
mod tests;
