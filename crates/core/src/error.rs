// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The orchestrator's core error taxonomy.
//!
//! Every crate boundary returns `Result<T, OrchestratorError>` (or a
//! crate-local error that carries `#[from]` into this one at the boundary).
//! `anyhow` is reserved for the `cli` binary's `main()`.

use crate::{ProcessId, TaskId, WorkflowId};

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("admission denied for workflow {workflow}: {reason}")]
    AdmissionDenied { workflow: WorkflowId, reason: String },

    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("queue full for workflow {workflow} (capacity {capacity})")]
    QueueFull { workflow: WorkflowId, capacity: usize },

    #[error("workflow {0} not found")]
    WorkflowNotFound(WorkflowId),

    #[error("process {0} not found")]
    ProcessNotFound(ProcessId),

    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    #[error("task {task} already assigned to {existing}, cannot assign to {requested}")]
    ConflictingAssignment { task: TaskId, existing: ProcessId, requested: ProcessId },

    #[error("context window exceeded for process {process}: {used}/{limit} tokens")]
    ContextExceeded { process: ProcessId, used: u64, limit: u64 },

    #[error("provider error for process {process}: {message}")]
    ProviderError { process: ProcessId, message: String },

    #[error("operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("fatal orchestrator error: {0}")]
    Fatal(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl OrchestratorError {
    /// Whether this error represents a condition the caller can retry or
    /// route around, versus one that should bring the workflow down.
    pub fn is_fatal(&self) -> bool {
        matches!(self, OrchestratorError::Fatal(_) | OrchestratorError::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
