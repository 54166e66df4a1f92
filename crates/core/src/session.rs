// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk session shapes. These are pure data: reading and writing them
//! atomically to the session directory tree lives in `coswarm-storage`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{ProcessId, WorkflowId};

/// Token and cost usage for one process, aggregated per the rules in
/// [`crate::ProcessMetrics::record_turn`]: cost sums, context tokens
/// replace, output tokens accumulate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub total_cost_usd: f64,
    pub context_tokens: u64,
    pub cumulative_output_tokens: u64,
    pub turn_count: u64,
}

impl From<crate::ProcessMetrics> for TokenUsage {
    fn from(m: crate::ProcessMetrics) -> Self {
        Self {
            total_cost_usd: m.total_cost_usd,
            context_tokens: m.context_tokens,
            cumulative_output_tokens: m.cumulative_output_tokens,
            turn_count: m.turn_count,
        }
    }
}

/// Metadata recorded for one worker subdirectory under a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerMetadata {
    pub process_id: ProcessId,
    #[serde(default)]
    pub session_ref: Option<String>,
    pub usage: TokenUsage,
    pub started_at_millis: i64,
    #[serde(default)]
    pub ended_at_millis: Option<i64>,
}

/// `metadata.json` at the root of a session directory: the application
/// index entry's source of truth, re-derived on every metadata write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub workflow: WorkflowId,
    pub application: String,
    #[serde(default)]
    pub coordinator_session_ref: Option<String>,
    pub coordinator_usage: TokenUsage,
    #[serde(default)]
    pub workers: HashMap<String, WorkerMetadata>,
    pub created_at_millis: i64,
    pub updated_at_millis: i64,
    pub state: crate::WorkflowState,
    /// Set once the coordinator has issued `SignalWorkflowComplete`.
    #[serde(default)]
    pub workflow_completion_status: Option<crate::CompletionStatus>,
    #[serde(default)]
    pub workflow_summary: Option<String>,
    #[serde(default)]
    pub workflow_completed_at_millis: Option<i64>,
}

impl SessionMetadata {
    /// Total cost across the coordinator and all recorded workers.
    pub fn total_cost_usd(&self) -> f64 {
        self.coordinator_usage.total_cost_usd
            + self.workers.values().map(|w| w.usage.total_cost_usd).sum::<f64>()
    }
}

/// One row of the per-application index (`sessions.json`): enough to list
/// and filter sessions without opening every `metadata.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub workflow: WorkflowId,
    pub application: String,
    pub state: crate::WorkflowState,
    pub created_at_millis: i64,
    pub updated_at_millis: i64,
    pub total_cost_usd: f64,
}

impl From<&SessionMetadata> for IndexEntry {
    fn from(meta: &SessionMetadata) -> Self {
        Self {
            workflow: meta.workflow,
            application: meta.application.clone(),
            state: meta.state,
            created_at_millis: meta.created_at_millis,
            updated_at_millis: meta.updated_at_millis,
            total_cost_usd: meta.total_cost_usd(),
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
