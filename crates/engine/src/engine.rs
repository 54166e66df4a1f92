// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires one workflow's command processor, event bus, and process
//! supervisors together. `coswarm-daemon`'s control plane holds one
//! `Engine` per running workflow.

use coswarm_adapters::{Provider, ProviderConfig};
use coswarm_core::{Clock, Effect, WorkflowId, WorkflowInstance};
use std::sync::Arc;

use crate::admission::{AdmissionControl, NullAdmission};
use crate::bus::EventBus;
use crate::processor::{CommandProcessor, CommandProcessorHandle};

const DEFAULT_COMMAND_CHANNEL_CAPACITY: usize = 256;

/// Executes [`Effect`]s a command processor produces. Kept as a trait
/// object so the engine doesn't need to know about `coswarm-storage` or
/// `coswarm-adapters` directly beyond the `Provider` it was given.
pub trait EffectSink: Send + Sync {
    fn accept(&self, effects: Vec<Effect>);
}

/// One running workflow: its command processor handle, event bus, and the
/// provider used to spawn its processes.
pub struct Engine {
    pub workflow: WorkflowId,
    pub handle: CommandProcessorHandle,
    pub bus: Arc<EventBus>,
    pub provider: Arc<dyn Provider>,
}

impl Engine {
    /// Start a new workflow's command processor loop and return the
    /// engine handle plus the `JoinHandle` driving it.
    pub fn start(
        workflow: WorkflowInstance,
        clock: Arc<dyn Clock>,
        provider: Arc<dyn Provider>,
        sink: Arc<dyn EffectSink>,
    ) -> (Self, tokio::task::JoinHandle<()>) {
        Self::start_with_admission(workflow, clock, provider, sink, Arc::new(NullAdmission))
    }

    /// Same as [`Self::start`], but consulting `admission` (the control
    /// plane's `ResourceScheduler`, typically) before admitting new workers
    /// or AI turns.
    pub fn start_with_admission(
        workflow: WorkflowInstance,
        clock: Arc<dyn Clock>,
        provider: Arc<dyn Provider>,
        sink: Arc<dyn EffectSink>,
        admission: Arc<dyn AdmissionControl>,
    ) -> (Self, tokio::task::JoinHandle<()>) {
        let workflow_id = workflow.id;
        let bus = Arc::new(EventBus::new());
        let (handle, processor) = CommandProcessor::spawn_with_admission(
            workflow,
            bus.clone(),
            clock,
            move |effects| sink.accept(effects),
            DEFAULT_COMMAND_CHANNEL_CAPACITY,
            admission,
        );
        let join = tokio::spawn(processor.run());
        (Engine { workflow: workflow_id, handle, bus, provider }, join)
    }

    /// Build the provider config a supervisor needs to spawn `process`.
    pub fn provider_config(&self, process: coswarm_core::ProcessId, work_dir: std::path::PathBuf, prompt: impl Into<String>) -> ProviderConfig {
        ProviderConfig::new(process, coswarm_adapters::ProviderKind::ClaudeCode, work_dir, prompt)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
