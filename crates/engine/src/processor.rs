// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single-writer command processor: one FIFO loop per workflow. Every
//! command for a workflow funnels through here, serialized, so handlers
//! never race each other over that workflow's state.

use coswarm_core::{Clock, Command, Effect, Event, OrchestratorError};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use crate::admission::{AdmissionControl, NullAdmission};
use crate::bus::EventBus;
use crate::handlers;
use crate::repo::MaterializedState;

type ApplyResult = Result<Vec<Effect>, OrchestratorError>;

enum Envelope {
    Submit(Command),
    SubmitAndWait(Command, oneshot::Sender<ApplyResult>),
}

/// A handle other parts of the system use to talk to a workflow's
/// processor loop. Cloning is cheap; every handle shares the one channel.
#[derive(Clone)]
pub struct CommandProcessorHandle {
    tx: mpsc::Sender<Envelope>,
}

impl CommandProcessorHandle {
    /// Fire-and-forget: queue the command, don't wait for it to apply.
    pub async fn submit(&self, command: Command) -> Result<(), OrchestratorError> {
        self.tx
            .send(Envelope::Submit(command))
            .await
            .map_err(|_| OrchestratorError::Fatal("command processor is no longer running".to_string()))
    }

    /// Queue the command and wait for its effects, bounded by `deadline`.
    pub async fn submit_and_wait(&self, command: Command, deadline: std::time::Duration) -> Result<Vec<Effect>, OrchestratorError> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(Envelope::SubmitAndWait(command, tx))
            .await
            .map_err(|_| OrchestratorError::Fatal("command processor is no longer running".to_string()))?;

        match tokio::time::timeout(deadline, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(OrchestratorError::Fatal("command processor dropped the reply channel".to_string())),
            Err(_) => Err(OrchestratorError::Timeout(deadline)),
        }
    }
}

/// Owns a workflow's `MaterializedState` and applies commands to it one at
/// a time. `run()` drives the FIFO loop until the channel closes.
pub struct CommandProcessor {
    state: MaterializedState,
    bus: Arc<EventBus>,
    clock: Arc<dyn Clock>,
    rx: mpsc::Receiver<Envelope>,
    on_effects: Box<dyn Fn(Vec<Effect>) + Send + Sync>,
    admission: Arc<dyn AdmissionControl>,
}

impl CommandProcessor {
    pub fn spawn(
        workflow: coswarm_core::WorkflowInstance,
        bus: Arc<EventBus>,
        clock: Arc<dyn Clock>,
        on_effects: impl Fn(Vec<Effect>) + Send + Sync + 'static,
        channel_capacity: usize,
    ) -> (CommandProcessorHandle, CommandProcessor) {
        Self::spawn_with_admission(workflow, bus, clock, on_effects, channel_capacity, Arc::new(NullAdmission))
    }

    /// Same as [`Self::spawn`], but consulting `admission` before admitting
    /// new workers or AI turns instead of always admitting.
    pub fn spawn_with_admission(
        workflow: coswarm_core::WorkflowInstance,
        bus: Arc<EventBus>,
        clock: Arc<dyn Clock>,
        on_effects: impl Fn(Vec<Effect>) + Send + Sync + 'static,
        channel_capacity: usize,
        admission: Arc<dyn AdmissionControl>,
    ) -> (CommandProcessorHandle, CommandProcessor) {
        let (tx, rx) = mpsc::channel(channel_capacity);
        let mut state = MaterializedState::default();
        state.workflow = Some(workflow);
        let processor = CommandProcessor { state, bus, clock, rx, on_effects: Box::new(on_effects), admission };
        (CommandProcessorHandle { tx }, processor)
    }

    /// Drive the FIFO loop until every handle is dropped. Intended to run
    /// inside its own `tokio::spawn`.
    pub async fn run(mut self) {
        tracing::debug!("command processor loop starting");
        while let Some(envelope) = self.rx.recv().await {
            match envelope {
                Envelope::Submit(command) => {
                    if let Err(err) = self.handle(command) {
                        tracing::warn!(error = %err, "fire-and-forget command failed to apply");
                    }
                }
                Envelope::SubmitAndWait(command, reply) => {
                    let result = self.handle(command);
                    let _ = reply.send(result);
                }
            }
        }
        tracing::debug!("command processor loop exiting, all handles dropped");
    }

    fn handle(&mut self, command: Command) -> ApplyResult {
        let now = self.clock.now_millis();
        let workflow = command.workflow;
        let (events, effects) = handlers::apply(&mut self.state, &command, now, self.admission.as_ref()).map_err(|err| {
            if let OrchestratorError::AdmissionDenied { reason, .. } = &err {
                self.bus.publish(Event::AdmissionRejected { workflow, reason: reason.clone() });
            }
            err
        })?;
        for event in &events {
            self.bus.publish(event.clone());
        }
        if !effects.is_empty() {
            tracing::trace!(count = effects.len(), "command produced effects");
            (self.on_effects)(effects.clone());
        }
        Ok(effects)
    }

    /// Test/inspection hook: handlers never expose mutable state outside
    /// the processor, so tests observe behavior only through effects and
    /// published events.
    pub fn workflow_state(&self) -> Option<coswarm_core::WorkflowState> {
        self.state.workflow.as_ref().map(|w| w.state)
    }
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
