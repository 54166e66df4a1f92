// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `coswarm`: drives one workflow end to end and surfaces its terminal
//! state as a process exit code. Not a general-purpose CLI framework — no
//! BQL/runbook parsing, no TUI, just the handful of subcommands needed to
//! run, inspect, resume, and stop a workflow.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coswarm_adapters::{CliProvider, Provider};
use coswarm_core::{
    Clock, Command, CommandKind, CommandSource, Event, ProcessId, ProcessRole, SystemClock, TokenUsage, WorkflowId,
    WorkflowInstance, WorkflowState,
};
use coswarm_daemon::{CrossWorkflowEventBus, HealthMonitor, ResourceScheduler, SchedulerLimits, Supervisor};
use coswarm_storage::SessionStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "coswarm", about = "Run and inspect multi-agent coding workflows")]
struct Cli {
    #[arg(long, global = true, default_value = "default")]
    application: String,

    #[arg(long, global = true)]
    session_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new workflow from a free-form prompt and run it to completion.
    Run { prompt: String },
    /// Print a workflow's persisted metadata.
    Status { workflow: String },
    /// Resume a workflow from its last coordinator session ref.
    Resume { workflow: String },
    /// Mark a workflow stopped in its persisted metadata.
    Stop { workflow: String },
}

fn default_session_root() -> PathBuf {
    dirs::data_local_dir().unwrap_or_else(std::env::temp_dir).join("coswarm").join("sessions")
}

/// Accumulates a workflow's event stream into the shape `SessionMetadata`
/// wants, rather than discarding everything but the terminal event.
#[derive(Default)]
struct RunTally {
    coordinator_session_ref: Option<String>,
    coordinator_usage: TokenUsage,
    workers: std::collections::HashMap<String, coswarm_core::WorkerMetadata>,
    completion_status: Option<coswarm_core::CompletionStatus>,
    summary: Option<String>,
}

impl RunTally {
    fn fold(&mut self, event: &Event, now_millis: i64) {
        match event {
            Event::WorkflowCompleted { status, summary, .. } => {
                self.completion_status = *status;
                self.summary = summary.clone();
            }
            Event::ProcessSpawned { process, .. } if !process.is_coordinator() => {
                self.workers.entry(process.to_string()).or_insert_with(|| coswarm_core::WorkerMetadata {
                    process_id: process.clone(),
                    session_ref: None,
                    usage: TokenUsage::default(),
                    started_at_millis: now_millis,
                    ended_at_millis: None,
                });
            }
            Event::ProcessOutputRecorded { process, turn_cost_usd, context_tokens, output_tokens, session_ref, .. } => {
                let usage = if process.is_coordinator() { Some(&mut self.coordinator_usage) } else { self.workers.get_mut(&process.to_string()).map(|w| &mut w.usage) };
                let Some(usage) = usage else { return };
                usage.total_cost_usd += *turn_cost_usd;
                usage.context_tokens = *context_tokens;
                usage.cumulative_output_tokens += *output_tokens;
                usage.turn_count += 1;
                if session_ref.is_some() {
                    if process.is_coordinator() {
                        self.coordinator_session_ref = session_ref.clone();
                    } else if let Some(worker) = self.workers.get_mut(&process.to_string()) {
                        worker.session_ref = session_ref.clone();
                    }
                }
            }
            _ => {}
        }
    }
}

fn exit_code_for(state: WorkflowState) -> i32 {
    match state {
        WorkflowState::Completed => 0,
        WorkflowState::Failed | WorkflowState::Cancelled => 1,
        WorkflowState::Pending | WorkflowState::Running | WorkflowState::Draining | WorkflowState::Paused => 2,
    }
}

async fn run_workflow(store: &SessionStore, application: &str, prompt: String) -> Result<i32> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let provider: Arc<dyn Provider> = Arc::new(CliProvider);
    let supervisor = Supervisor::new(
        Arc::new(ResourceScheduler::new(SchedulerLimits::default())),
        Arc::new(HealthMonitor::new(clock.clone(), Duration::from_secs(120))),
        Arc::new(CrossWorkflowEventBus::new(256)),
        clock.clone(),
        provider,
    );

    let workflow = WorkflowInstance::new(application, coswarm_core::WorkflowMode::Backlog, 4, clock.now_millis());
    let workflow_id = workflow.id;
    let engine_workflow_id = supervisor.start(workflow).context("admission rejected")?;
    debug_assert_eq!(engine_workflow_id, workflow_id);

    let engine = supervisor.registry().get(workflow_id).expect("just started");
    let (mut events, _dropped) = engine.bus.subscribe();

    engine
        .handle
        .submit(Command::new(workflow_id, CommandSource::ControlPlane, CommandKind::StartWorkflow, clock.now_millis()))
        .await?;
    engine
        .handle
        .submit(Command::new(
            workflow_id,
            CommandSource::ControlPlane,
            CommandKind::SpawnProcess { role: ProcessRole::Coordinator, process: ProcessId::coordinator() },
            clock.now_millis(),
        ))
        .await?;
    engine
        .handle
        .submit(Command::new(
            workflow_id,
            CommandSource::Process(ProcessId::coordinator()),
            CommandKind::EnqueueTask { description: prompt },
            clock.now_millis(),
        ))
        .await?;

    let mut tally = RunTally::default();
    let final_state = loop {
        match events.recv().await {
            Some(event @ Event::WorkflowCompleted { .. }) => {
                tally.fold(&event, clock.now_millis());
                break WorkflowState::Completed;
            }
            Some(Event::WorkflowFailed { .. }) | Some(Event::WorkflowCancelled { .. }) => break WorkflowState::Failed,
            Some(event) => {
                tally.fold(&event, clock.now_millis());
            }
            None => break WorkflowState::Failed,
        }
    };

    let meta = coswarm_core::SessionMetadata {
        workflow: workflow_id,
        application: application.to_string(),
        coordinator_session_ref: tally.coordinator_session_ref,
        coordinator_usage: tally.coordinator_usage,
        workers: tally.workers,
        created_at_millis: clock.now_millis(),
        updated_at_millis: clock.now_millis(),
        state: final_state,
        workflow_completion_status: tally.completion_status,
        workflow_summary: tally.summary,
        workflow_completed_at_millis: tally.completion_status.is_some().then(|| clock.now_millis()),
    };
    store.save_metadata(application, workflow_id, &meta)?;

    println!("{workflow_id} {final_state:?}");
    Ok(exit_code_for(final_state))
}

fn print_status(store: &SessionStore, application: &str, workflow: WorkflowId) -> Result<i32> {
    match store.load_metadata(application, workflow)? {
        Some(meta) => {
            println!("{}", serde_json::to_string_pretty(&meta)?);
            Ok(exit_code_for(meta.state))
        }
        None => {
            eprintln!("no session found for workflow {workflow}");
            Ok(1)
        }
    }
}

fn stop_workflow(store: &SessionStore, application: &str, workflow: WorkflowId) -> Result<i32> {
    let Some(mut meta) = store.load_metadata(application, workflow)? else {
        eprintln!("no session found for workflow {workflow}");
        return Ok(1);
    };
    meta.state = WorkflowState::Cancelled;
    store.save_metadata(application, workflow, &meta)?;
    Ok(0)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let session_root = cli.session_root.unwrap_or_else(default_session_root);
    let store = SessionStore::new(session_root);

    let code = match cli.command {
        Commands::Run { prompt } => run_workflow(&store, &cli.application, prompt).await?,
        Commands::Status { workflow } => print_status(&store, &cli.application, WorkflowId::from(workflow))?,
        Commands::Resume { workflow } => {
            eprintln!("resume is not yet wired to a live coordinator session ref: {workflow}");
            2
        }
        Commands::Stop { workflow } => stop_workflow(&store, &cli.application, WorkflowId::from(workflow))?,
    };

    std::process::exit(code);
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
