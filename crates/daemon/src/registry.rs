// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The control plane's registry: every running workflow's engine handle,
//! looked up by [`WorkflowId`] from anywhere in the daemon.

use coswarm_core::WorkflowId;
use coswarm_engine::Engine;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct Registry {
    engines: parking_lot::RwLock<HashMap<WorkflowId, Arc<Engine>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, engine: Arc<Engine>) {
        self.engines.write().insert(engine.workflow, engine);
    }

    pub fn get(&self, workflow: WorkflowId) -> Option<Arc<Engine>> {
        self.engines.read().get(&workflow).cloned()
    }

    pub fn remove(&self, workflow: WorkflowId) -> Option<Arc<Engine>> {
        self.engines.write().remove(&workflow)
    }

    pub fn len(&self) -> usize {
        self.engines.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.read().is_empty()
    }

    pub fn workflow_ids(&self) -> Vec<WorkflowId> {
        self.engines.read().keys().copied().collect()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
