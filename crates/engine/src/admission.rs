// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission control the command processor consults before it would create
//! new concurrent work: another worker process, another AI turn, or another
//! block of tokens against the period budget. Decoupled from
//! `coswarm-daemon`'s `ResourceScheduler` the same way [`crate::EffectSink`]
//! decouples effect execution from storage — `coswarm-daemon` depends on
//! `coswarm-engine`, not the other way around, so the scheduler has to be
//! reached through a trait object handlers are simply handed.

use coswarm_core::{OrchestratorError, WorkflowId};

pub trait AdmissionControl: Send + Sync {
    fn admit_worker(&self, workflow: WorkflowId) -> Result<(), OrchestratorError> {
        let _ = workflow;
        Ok(())
    }

    fn release_worker(&self, workflow: WorkflowId) {
        let _ = workflow;
    }

    fn admit_ai_call(&self, workflow: WorkflowId) -> Result<(), OrchestratorError> {
        let _ = workflow;
        Ok(())
    }

    fn release_ai_call(&self) {}

    fn record_tokens(&self, workflow: WorkflowId, tokens: u64) -> Result<(), OrchestratorError> {
        let _ = (workflow, tokens);
        Ok(())
    }
}

/// Admits everything: the command processor's default when nothing sits
/// above it capping resource use (unit tests, `coswarm run`'s single-shot
/// CLI path before a daemon's scheduler is in the loop).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAdmission;

impl AdmissionControl for NullAdmission {}
