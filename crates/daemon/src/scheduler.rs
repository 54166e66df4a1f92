// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission control: caps on concurrent workflows, workers per workflow,
//! global AI-call concurrency, and a tokens-per-period budget. Every cap
//! produces a typed rejection rather than a silent block.

use coswarm_core::{OrchestratorError, WorkflowId};
use coswarm_engine::AdmissionControl;
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct SchedulerLimits {
    pub max_workflows: usize,
    pub max_workers_per_workflow: usize,
    pub max_concurrent_ai_calls: usize,
    pub tokens_per_period_budget: u64,
}

impl Default for SchedulerLimits {
    fn default() -> Self {
        Self {
            max_workflows: 16,
            max_workers_per_workflow: 8,
            max_concurrent_ai_calls: 32,
            tokens_per_period_budget: 5_000_000,
        }
    }
}

#[derive(Default)]
struct SchedulerState {
    workflows: usize,
    workers_by_workflow: HashMap<WorkflowId, usize>,
    active_ai_calls: usize,
    tokens_spent_this_period: u64,
}

/// Enforces [`SchedulerLimits`] across every workflow the daemon runs.
/// Holds a single `parking_lot::Mutex`-guarded counter set — admission
/// checks are cheap and never held across an await point.
pub struct ResourceScheduler {
    limits: SchedulerLimits,
    state: Mutex<SchedulerState>,
}

impl ResourceScheduler {
    pub fn new(limits: SchedulerLimits) -> Self {
        Self { limits, state: Mutex::new(SchedulerState::default()) }
    }

    pub fn admit_workflow(&self, workflow: WorkflowId) -> Result<(), OrchestratorError> {
        let mut state = self.state.lock();
        if state.workflows >= self.limits.max_workflows {
            return Err(OrchestratorError::AdmissionDenied {
                workflow,
                reason: format!("max_workflows cap of {} reached", self.limits.max_workflows),
            });
        }
        state.workflows += 1;
        Ok(())
    }

    pub fn release_workflow(&self, workflow: WorkflowId) {
        let mut state = self.state.lock();
        state.workflows = state.workflows.saturating_sub(1);
        state.workers_by_workflow.remove(&workflow);
    }

    pub fn admit_worker(&self, workflow: WorkflowId) -> Result<(), OrchestratorError> {
        let mut state = self.state.lock();
        let count = state.workers_by_workflow.entry(workflow).or_insert(0);
        if *count >= self.limits.max_workers_per_workflow {
            return Err(OrchestratorError::AdmissionDenied {
                workflow,
                reason: format!("max_workers_per_workflow cap of {} reached", self.limits.max_workers_per_workflow),
            });
        }
        *count += 1;
        Ok(())
    }

    pub fn release_worker(&self, workflow: WorkflowId) {
        let mut state = self.state.lock();
        if let Some(count) = state.workers_by_workflow.get_mut(&workflow) {
            *count = count.saturating_sub(1);
        }
    }

    pub fn admit_ai_call(&self, workflow: WorkflowId) -> Result<(), OrchestratorError> {
        let mut state = self.state.lock();
        if state.active_ai_calls >= self.limits.max_concurrent_ai_calls {
            return Err(OrchestratorError::AdmissionDenied {
                workflow,
                reason: format!("max_concurrent_ai_calls cap of {} reached", self.limits.max_concurrent_ai_calls),
            });
        }
        state.active_ai_calls += 1;
        Ok(())
    }

    pub fn release_ai_call(&self) {
        let mut state = self.state.lock();
        state.active_ai_calls = state.active_ai_calls.saturating_sub(1);
    }

    pub fn record_tokens(&self, workflow: WorkflowId, tokens: u64) -> Result<(), OrchestratorError> {
        let mut state = self.state.lock();
        if state.tokens_spent_this_period + tokens > self.limits.tokens_per_period_budget {
            return Err(OrchestratorError::AdmissionDenied {
                workflow,
                reason: format!("tokens_per_period_budget of {} exceeded", self.limits.tokens_per_period_budget),
            });
        }
        state.tokens_spent_this_period += tokens;
        Ok(())
    }

    /// Resets the token budget at the start of a new accounting period.
    pub fn reset_period(&self) {
        self.state.lock().tokens_spent_this_period = 0;
    }
}

impl AdmissionControl for ResourceScheduler {
    fn admit_worker(&self, workflow: WorkflowId) -> Result<(), OrchestratorError> {
        self.admit_worker(workflow)
    }

    fn release_worker(&self, workflow: WorkflowId) {
        self.release_worker(workflow)
    }

    fn admit_ai_call(&self, workflow: WorkflowId) -> Result<(), OrchestratorError> {
        self.admit_ai_call(workflow)
    }

    fn release_ai_call(&self) {
        self.release_ai_call()
    }

    fn record_tokens(&self, workflow: WorkflowId, tokens: u64) -> Result<(), OrchestratorError> {
        self.record_tokens(workflow, tokens)
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "scheduler_proptests.rs"]
mod proptests;
