// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A [`Provider`] that never forks a process: scripted [`ProviderEvent`]s
//! are fed in, sent messages are recorded, for deterministic engine tests.

use async_trait::async_trait;
use coswarm_core::{ProcessId, ProviderEvent};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::provider::{HeadlessProcess, ProcessRunState, Provider, ProviderConfig, ProviderError};

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Send(String),
    Cancel,
}

/// Shared recording of everything sent to a [`FakeHeadlessProcess`], readable
/// from the test after the engine has run.
#[derive(Debug, Default)]
pub struct FakeProviderState {
    pub calls: Mutex<Vec<RecordedCall>>,
}

pub struct FakeProvider {
    pub scripts: Mutex<std::collections::HashMap<String, Vec<ProviderEvent>>>,
    pub state: Arc<FakeProviderState>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self { scripts: Mutex::new(std::collections::HashMap::new()), state: Arc::new(FakeProviderState::default()) }
    }

    /// Queue the sequence of events a process will "emit" once spawned.
    pub fn script(&self, process: &ProcessId, events: Vec<ProviderEvent>) {
        self.scripts.lock().insert(process.to_string(), events);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().clone()
    }
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for FakeProvider {
    async fn spawn(
        &self,
        config: ProviderConfig,
        event_tx: mpsc::Sender<ProviderEvent>,
    ) -> Result<Box<dyn HeadlessProcess>, ProviderError> {
        let events = self.scripts.lock().remove(&config.process.to_string()).unwrap_or_default();
        for event in events {
            let _ = event_tx.send(event).await;
        }
        Ok(Box::new(FakeHeadlessProcess {
            process_id: config.process,
            work_dir: config.work_dir,
            session_ref: Mutex::new(config.resume_session_ref),
            state: self.state.clone(),
        }))
    }
}

struct FakeHeadlessProcess {
    process_id: ProcessId,
    work_dir: std::path::PathBuf,
    session_ref: Mutex<Option<String>>,
    state: Arc<FakeProviderState>,
}

#[async_trait]
impl HeadlessProcess for FakeHeadlessProcess {
    fn process_id(&self) -> &ProcessId {
        &self.process_id
    }

    fn work_dir(&self) -> &std::path::Path {
        &self.work_dir
    }

    fn pid(&self) -> Option<u32> {
        None
    }

    fn session_ref(&self) -> Option<String> {
        self.session_ref.lock().clone()
    }

    fn status(&self) -> ProcessRunState {
        ProcessRunState::Running
    }

    async fn send(&self, body: &str) -> Result<(), ProviderError> {
        self.state.calls.lock().push(RecordedCall::Send(body.to_string()));
        Ok(())
    }

    async fn cancel(&self) -> Result<(), ProviderError> {
        self.state.calls.lock().push(RecordedCall::Cancel);
        Ok(())
    }

    async fn wait(&self) -> Result<i32, ProviderError> {
        Ok(0)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
