// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The provider abstraction: spawning a headless AI CLI and reading its
//! structured event stream. `coswarm-engine` depends only on this trait,
//! never on a concrete CLI binary, so tests run against [`FakeProvider`]
//! without ever forking a process.

use async_trait::async_trait;
use coswarm_core::{ProcessId, ProviderEvent};
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("spawn failed for {process}: {message}")]
    SpawnFailed { process: ProcessId, message: String },
    #[error("process {0} is not running")]
    NotRunning(ProcessId),
    #[error("write to stdin failed for {process}: {source}")]
    WriteFailed { process: ProcessId, #[source] source: std::io::Error },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which headless CLI a process is spawned with. `Fake` never touches the
/// filesystem or forks anything and exists purely for tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    ClaudeCode,
    Fake,
}

/// Everything needed to spawn one process's subprocess.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub process: ProcessId,
    pub kind: ProviderKind,
    pub work_dir: PathBuf,
    pub initial_prompt: String,
    /// When set, the CLI is started in resume mode against this session
    /// reference instead of starting a fresh conversation.
    pub resume_session_ref: Option<String>,
    pub env: Vec<(String, String)>,
}

impl ProviderConfig {
    pub fn new(process: ProcessId, kind: ProviderKind, work_dir: PathBuf, initial_prompt: impl Into<String>) -> Self {
        Self {
            process,
            kind,
            work_dir,
            initial_prompt: initial_prompt.into(),
            resume_session_ref: None,
            env: Vec::new(),
        }
    }

    coswarm_core::setters! {
        set {
            env: Vec<(String, String)>,
        }
        option {
            resume_session_ref: String,
        }
    }
}

/// Current status of a spawned subprocess, as observed by its supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessRunState {
    Running,
    Exited(i32),
    Killed,
}

/// A live (or recently-live) headless subprocess.
///
/// `events()`/`errors()` hand back the receiving half of channels the
/// provider feeds from its own background task; callers drain them, they
/// are not polled.
#[async_trait]
pub trait HeadlessProcess: Send + Sync {
    fn process_id(&self) -> &ProcessId;

    fn work_dir(&self) -> &std::path::Path;

    fn pid(&self) -> Option<u32>;

    /// The session reference captured from the provider's `init` event, if
    /// one has arrived yet.
    fn session_ref(&self) -> Option<String>;

    fn status(&self) -> ProcessRunState;

    /// Write one message to the subprocess's stdin.
    async fn send(&self, body: &str) -> Result<(), ProviderError>;

    /// Request graceful termination (SIGTERM, then SIGKILL after a grace
    /// period on Unix).
    async fn cancel(&self) -> Result<(), ProviderError>;

    /// Block until the subprocess exits.
    async fn wait(&self) -> Result<i32, ProviderError>;
}

/// Spawns [`HeadlessProcess`] instances. Implemented by [`crate::cli::CliProvider`]
/// for real subprocesses and by [`crate::fake::FakeProvider`] for tests.
#[async_trait]
pub trait Provider: Send + Sync + 'static {
    /// Spawn a subprocess; `event_tx` receives every [`ProviderEvent`] parsed
    /// from its stdout, in order, until the process exits.
    async fn spawn(
        &self,
        config: ProviderConfig,
        event_tx: mpsc::Sender<ProviderEvent>,
    ) -> Result<Box<dyn HeadlessProcess>, ProviderError>;
}
