// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-process supervision: spawns a subprocess through a [`Provider`],
//! reads its [`ProviderEvent`] stream, and turns turn completion, crashes,
//! and session-ref capture into commands fed back to the workflow's
//! command processor.

use coswarm_adapters::{HeadlessProcess, Provider, ProviderConfig};
use coswarm_core::{Command, CommandKind, CommandSource, ProcessId, ProviderEvent, WorkflowId};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::processor::CommandProcessorHandle;

/// Drives one process's subprocess for the lifetime of the workflow.
/// `run()` exits once the subprocess ends or is cancelled.
pub struct ProcessSupervisor {
    workflow: WorkflowId,
    process: ProcessId,
    provider: Arc<dyn Provider>,
    processor: CommandProcessorHandle,
}

impl ProcessSupervisor {
    pub fn new(workflow: WorkflowId, process: ProcessId, provider: Arc<dyn Provider>, processor: CommandProcessorHandle) -> Self {
        Self { workflow, process, provider, processor }
    }

    /// Spawn the subprocess and drive its event stream until it exits.
    /// Each turn completion (`result`) is folded into a `ProcessTurnComplete`
    /// command carrying the session ref captured from the turn's `init`
    /// event; crashes and fatal provider errors stop the process and let
    /// the workflow's own error handling decide what happens next.
    pub async fn run(&self, config: ProviderConfig) -> Result<(), coswarm_adapters::ProviderError> {
        let (tx, mut rx) = mpsc::channel(64);
        let handle = self.provider.spawn(config, tx).await?;
        tracing::info!(workflow = %self.workflow, process = %self.process, "process supervisor attached");

        let mut pending_session_ref: Option<String> = None;
        while let Some(event) = rx.recv().await {
            self.handle_provider_event(&event, handle.as_ref(), &mut pending_session_ref).await;
            if event.is_fatal() {
                tracing::info!(workflow = %self.workflow, process = %self.process, "process event stream ended");
                break;
            }
        }
        Ok(())
    }

    async fn handle_provider_event(&self, event: &ProviderEvent, process: &dyn HeadlessProcess, pending_session_ref: &mut Option<String>) {
        match event {
            ProviderEvent::Init { session_ref, .. } => {
                *pending_session_ref = Some(session_ref.clone());
                tracing::debug!(workflow = %self.workflow, process = %self.process, %session_ref, "captured session ref from init");
            }
            ProviderEvent::Result { usage, is_error } => {
                // The handler commits `session_ref` only when `succeeded` is
                // true — on failure the process keeps whatever ref it had
                // going into the turn, so a retry resumes from known-good
                // state instead of one the provider may never have
                // persisted.
                let cmd = Command::new(
                    self.workflow,
                    CommandSource::Process(self.process.clone()),
                    CommandKind::ProcessTurnComplete {
                        process: self.process.clone(),
                        succeeded: !is_error,
                        session_ref: pending_session_ref.clone(),
                        turn_cost_usd: usage.total_cost_usd,
                        context_tokens: usage.context_tokens(),
                        output_tokens: usage.output_tokens,
                        last_error: is_error.then(|| "provider reported an error result".to_string()),
                    },
                    0,
                );
                if self.processor.submit(cmd).await.is_err() {
                    tracing::warn!(workflow = %self.workflow, process = %self.process, "command processor gone, dropping turn result");
                }
                if *is_error {
                    let _ = process.cancel().await;
                }
            }
            ProviderEvent::Error { message } => {
                let cmd = Command::new(
                    self.workflow,
                    CommandSource::Process(self.process.clone()),
                    CommandKind::ProcessTurnComplete {
                        process: self.process.clone(),
                        succeeded: false,
                        session_ref: pending_session_ref.clone(),
                        turn_cost_usd: 0.0,
                        context_tokens: 0,
                        output_tokens: 0,
                        last_error: Some(message.clone()),
                    },
                    0,
                );
                tracing::warn!(workflow = %self.workflow, process = %self.process, %message, "provider reported an error, cancelling");
                if self.processor.submit(cmd).await.is_err() {
                    tracing::warn!(workflow = %self.workflow, process = %self.process, "command processor gone, dropping turn error");
                }
                let _ = process.cancel().await;
            }
            ProviderEvent::Assistant { .. } | ProviderEvent::ToolUse { .. } | ProviderEvent::ToolResult { .. } | ProviderEvent::Unknown => {}
        }
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
