// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The control plane's top-level `Supervisor`: `Start`/`Stop`/`Shutdown`
//! lifecycle for workflows, wiring the registry, resource scheduler,
//! health monitor, and cross-workflow event bus together.
//!
//! Dependency order, leaves first, mirrors how a workflow is torn down:
//! repositories + event bus, process supervisors, handlers, command
//! processor, external adapter, engine, then this supervisor itself.

use coswarm_adapters::Provider;
use coswarm_core::{Clock, Command, CommandKind, CommandSource, Effect, OrchestratorError, ProcessId, WorkflowId, WorkflowInstance};
use coswarm_engine::{Engine, EffectSink};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::cross_bus::CrossWorkflowEventBus;
use crate::health::{HealthMonitor, RecoveryAction};
use crate::registry::Registry;
use crate::scheduler::ResourceScheduler;

pub struct StopOptions {
    pub drain_deadline: Duration,
}

impl Default for StopOptions {
    fn default() -> Self {
        Self { drain_deadline: Duration::from_secs(30) }
    }
}

struct LoggingSink;
impl EffectSink for LoggingSink {
    fn accept(&self, effects: Vec<Effect>) {
        for effect in &effects {
            info!(effect = effect.name(), fields = ?effect.fields(), "effect produced");
        }
    }
}

/// Owns every running workflow's [`Engine`] and coordinates the control
/// plane's admission, health, and fan-in services around it.
pub struct Supervisor {
    registry: Arc<Registry>,
    scheduler: Arc<ResourceScheduler>,
    health: Arc<HealthMonitor>,
    cross_bus: Arc<CrossWorkflowEventBus>,
    clock: Arc<dyn Clock>,
    provider: Arc<dyn Provider>,
}

impl Supervisor {
    pub fn new(
        scheduler: Arc<ResourceScheduler>,
        health: Arc<HealthMonitor>,
        cross_bus: Arc<CrossWorkflowEventBus>,
        clock: Arc<dyn Clock>,
        provider: Arc<dyn Provider>,
    ) -> Self {
        Self { registry: Arc::new(Registry::new()), scheduler, health, cross_bus, clock, provider }
    }

    /// Creates the per-workflow `Engine` (command processor, handlers,
    /// repositories, event bus) and registers it for health tracking and
    /// cross-workflow fan-in. Admission control runs first; a denied
    /// workflow never reaches the registry.
    pub fn start(&self, workflow: WorkflowInstance) -> Result<WorkflowId, OrchestratorError> {
        let workflow_id = workflow.id;
        self.scheduler.admit_workflow(workflow_id)?;

        let (engine, _join) = Engine::start_with_admission(
            workflow,
            self.clock.clone(),
            self.provider.clone(),
            Arc::new(LoggingSink),
            self.scheduler.clone(),
        );
        self.health.register(workflow_id);
        self.health.attach(workflow_id, engine.bus.clone());
        self.cross_bus.attach(workflow_id, engine.bus.clone());
        self.registry.insert(Arc::new(engine));
        info!(workflow = %workflow_id, "workflow started");
        Ok(workflow_id)
    }

    /// Drains and cancels a workflow in reverse dependency order, then
    /// releases its scheduler and health-tracking resources. Stopping a
    /// workflow that isn't running is a no-op, matching §9's idempotent
    /// stop semantics.
    pub async fn stop(&self, workflow: WorkflowId, opts: StopOptions) -> Result<(), OrchestratorError> {
        let Some(engine) = self.registry.get(workflow) else {
            return Ok(());
        };

        let stop = engine.handle.submit_and_wait(
            coswarm_core::Command::new(workflow, coswarm_core::CommandSource::ControlPlane, coswarm_core::CommandKind::StopWorkflow { reason: None }, self.clock.now_millis()),
            opts.drain_deadline,
        );
        match stop.await {
            Ok(_) => {}
            Err(err) => error!(workflow = %workflow, error = %err, "stop_workflow command failed, tearing down anyway"),
        }

        self.health.forget(workflow);
        self.scheduler.release_workflow(workflow);
        self.registry.remove(workflow);
        info!(workflow = %workflow, "workflow stopped");
        Ok(())
    }

    /// Stops every running workflow with a shared deadline, used on daemon
    /// shutdown.
    pub async fn shutdown(&self, deadline: Duration) {
        let workflows = self.registry.workflow_ids();
        info!(count = workflows.len(), "shutting down all workflows");
        for workflow in workflows {
            let _ = self.stop(workflow, StopOptions { drain_deadline: deadline }).await;
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Runs one health sweep, replacing the coordinator of every workflow
    /// the monitor flags as stuck. A workflow that's already torn down
    /// between the sweep and this running is silently skipped.
    pub async fn run_recovery_sweep(&self) {
        for (workflow, action, idle_for_millis) in self.health.sweep() {
            let RecoveryAction::ReplaceCoordinator = action;
            let Some(engine) = self.registry.get(workflow) else { continue };
            engine.bus.publish(coswarm_core::Event::ProcessStuck { workflow, process: ProcessId::coordinator(), idle_for_millis });
            let command = Command::new(
                workflow,
                CommandSource::ControlPlane,
                CommandKind::ReplaceProcess { process: ProcessId::coordinator() },
                self.clock.now_millis(),
            );
            match engine.handle.submit(command).await {
                Ok(()) => info!(workflow = %workflow, "coordinator replacement requested after stuck sweep"),
                Err(err) => error!(workflow = %workflow, error = %err, "failed to submit coordinator replacement"),
            }
        }
    }

    /// Spawns a background task that runs [`Self::run_recovery_sweep`] on
    /// `interval` until every `Arc` to this supervisor is dropped.
    pub fn spawn_recovery_sweeper(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let supervisor = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let Some(supervisor) = supervisor.upgrade() else { break };
                supervisor.run_recovery_sweep().await;
            }
        })
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
