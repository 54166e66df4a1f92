// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spawns the AI CLI as a direct child process, piping its stdout as
//! newline-delimited JSON events rather than polling a transcript file.

use async_trait::async_trait;
use coswarm_core::{parse_provider_line, ProcessId, ProviderEvent};
use parking_lot::Mutex;
use std::process::Stdio;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command as TokioCommand};
use tokio::sync::{mpsc, Mutex as AsyncMutex};

use crate::provider::{HeadlessProcess, ProcessRunState, Provider, ProviderConfig, ProviderError, ProviderKind};

const KILL_GRACE_PERIOD: std::time::Duration = std::time::Duration::from_secs(10);

fn binary_for(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::ClaudeCode => "claude",
        ProviderKind::Fake => unreachable!("ProviderKind::Fake is routed to FakeProvider, never CliProvider"),
    }
}

fn build_args(config: &ProviderConfig) -> Vec<String> {
    let mut args = vec![
        "--output-format".to_string(),
        "stream-json".to_string(),
        "--print".to_string(),
    ];
    if let Some(session_ref) = &config.resume_session_ref {
        args.push("--resume".to_string());
        args.push(session_ref.clone());
    }
    args.push(config.initial_prompt.clone());
    args
}

/// Spawns the real CLI binary. The only [`Provider`] used outside tests.
pub struct CliProvider;

#[async_trait]
impl Provider for CliProvider {
    async fn spawn(
        &self,
        config: ProviderConfig,
        event_tx: mpsc::Sender<ProviderEvent>,
    ) -> Result<Box<dyn HeadlessProcess>, ProviderError> {
        let binary = binary_for(config.kind);
        let args = build_args(&config);

        let mut command = TokioCommand::new(binary);
        command
            .args(&args)
            .current_dir(&config.work_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in &config.env {
            command.env(key, value);
        }

        let mut child = command.spawn().map_err(|e| ProviderError::SpawnFailed {
            process: config.process.clone(),
            message: e.to_string(),
        })?;

        let pid = child.id();
        let stdout = child.stdout.take().expect("stdout was piped");
        let stdin = child.stdin.take().expect("stdin was piped");
        let stderr = child.stderr.take().expect("stderr was piped");

        let session_ref: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
        let exit_code: Arc<AtomicI32> = Arc::new(AtomicI32::new(i32::MIN));

        let process = CliHeadlessProcess {
            process_id: config.process.clone(),
            work_dir: config.work_dir.clone(),
            pid,
            session_ref: session_ref.clone(),
            exit_code: exit_code.clone(),
            stdin: AsyncMutex::new(stdin),
            child: AsyncMutex::new(Some(child)),
        };

        tokio::spawn(read_stdout(stdout, event_tx, session_ref));
        tokio::spawn(drain_stderr(stderr));

        Ok(Box::new(process))
    }
}

async fn read_stdout(
    stdout: tokio::process::ChildStdout,
    event_tx: mpsc::Sender<ProviderEvent>,
    session_ref: Arc<Mutex<Option<String>>>,
) {
    let mut lines = BufReader::new(stdout).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let Some(event) = parse_provider_line(&line) else { continue };
                if let ProviderEvent::Init { session_ref: ref r, .. } = event {
                    *session_ref.lock() = Some(r.clone());
                }
                if event_tx.send(event).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(_) => break,
        }
    }
}

async fn drain_stderr(stderr: tokio::process::ChildStderr) {
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        tracing::warn!(target: "coswarm_adapters::cli", stderr = %line, "provider stderr");
    }
}

struct CliHeadlessProcess {
    process_id: ProcessId,
    work_dir: std::path::PathBuf,
    pid: Option<u32>,
    session_ref: Arc<Mutex<Option<String>>>,
    exit_code: Arc<AtomicI32>,
    stdin: AsyncMutex<tokio::process::ChildStdin>,
    child: AsyncMutex<Option<Child>>,
}

#[async_trait]
impl HeadlessProcess for CliHeadlessProcess {
    fn process_id(&self) -> &ProcessId {
        &self.process_id
    }

    fn work_dir(&self) -> &std::path::Path {
        &self.work_dir
    }

    fn pid(&self) -> Option<u32> {
        self.pid
    }

    fn session_ref(&self) -> Option<String> {
        self.session_ref.lock().clone()
    }

    fn status(&self) -> ProcessRunState {
        let code = self.exit_code.load(Ordering::SeqCst);
        if code == i32::MIN {
            ProcessRunState::Running
        } else {
            ProcessRunState::Exited(code)
        }
    }

    async fn send(&self, body: &str) -> Result<(), ProviderError> {
        let mut stdin = self.stdin.lock().await;
        stdin
            .write_all(body.as_bytes())
            .await
            .map_err(|e| ProviderError::WriteFailed { process: self.process_id.clone(), source: e })?;
        stdin
            .write_all(b"\n")
            .await
            .map_err(|e| ProviderError::WriteFailed { process: self.process_id.clone(), source: e })?;
        stdin.flush().await.map_err(|e| ProviderError::WriteFailed { process: self.process_id.clone(), source: e })
    }

    async fn cancel(&self) -> Result<(), ProviderError> {
        let Some(pid) = self.pid else { return Ok(()) };
        let nix_pid = nix::unistd::Pid::from_raw(pid as i32);
        let _ = nix::sys::signal::kill(nix_pid, nix::sys::signal::Signal::SIGTERM);

        let mut guard = self.child.lock().await;
        if let Some(child) = guard.as_mut() {
            match tokio::time::timeout(KILL_GRACE_PERIOD, child.wait()).await {
                Ok(Ok(status)) => {
                    self.exit_code.store(status.code().unwrap_or(-1), Ordering::SeqCst);
                }
                _ => {
                    let _ = nix::sys::signal::kill(nix_pid, nix::sys::signal::Signal::SIGKILL);
                    if let Ok(status) = child.wait().await {
                        self.exit_code.store(status.code().unwrap_or(-1), Ordering::SeqCst);
                    }
                }
            }
        }
        Ok(())
    }

    async fn wait(&self) -> Result<i32, ProviderError> {
        let mut guard = self.child.lock().await;
        if let Some(child) = guard.as_mut() {
            let status = child.wait().await?;
            let code = status.code().unwrap_or(-1);
            self.exit_code.store(code, Ordering::SeqCst);
            Ok(code)
        } else {
            Ok(self.exit_code.load(Ordering::SeqCst))
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
