// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command handlers: pure functions from `(state, command) -> (events,
//! effects)`. A handler never performs I/O itself — spawning a process,
//! writing a file — it only describes what should happen via [`Effect`]s
//! for the executor to carry out afterward.

use coswarm_core::{
    Command, CommandKind, Effect, Event, OrchestratorError, Process, ProcessId, ProcessMetrics, ProcessRole,
    ProcessStatus, QueuedMessage, Task, TaskStatus, WorkflowState,
};

use crate::admission::AdmissionControl;
use crate::repo::MaterializedState;

pub const MAX_QUEUE_DEPTH: usize = 1_000;

/// Apply one command to `state`, returning the facts it produced and the
/// side effects the executor must carry out. Returns an error without
/// mutating `state` if the command is invalid for the workflow's current
/// state — handlers are all-or-nothing. `admission` gates anything that
/// would create new concurrent work (a process, an AI turn).
pub fn apply(
    state: &mut MaterializedState,
    command: &Command,
    now_millis: i64,
    admission: &dyn AdmissionControl,
) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    if command.requires_privileged_source() && !command.is_privileged() {
        return Err(OrchestratorError::ValidationFailed(format!(
            "{:?} requires a privileged source, got {:?}",
            command.kind, command.source
        )));
    }

    match &command.kind {
        CommandKind::Register => Ok((Vec::new(), Vec::new())),

        CommandKind::StartWorkflow => start_workflow(state, command.workflow, now_millis),

        CommandKind::SpawnProcess { role, process } => {
            spawn_process(state, command.workflow, *role, process.clone(), now_millis, admission)
        }

        CommandKind::StopProcess { process } => stop_process(state, process, admission),

        CommandKind::ResumeProcess { process, session_ref } => resume_process(state, process, session_ref.clone()),

        CommandKind::EnqueueTask { description } => enqueue_task(state, command.workflow, description.clone(), now_millis),

        CommandKind::AssignTask { task, worker } => assign_task(state, task, worker.clone()),

        CommandKind::ReportTaskResult { task, success, summary } => report_task_result(state, task, *success, summary.clone()),

        CommandKind::SendMessage { to, body } => send_message(state, command.workflow, to.clone(), body.clone(), now_millis),

        CommandKind::PostFabricMessage(fabric_msg) => post_fabric_message(state, fabric_msg, now_millis),

        CommandKind::Heartbeat { process } => heartbeat(state, command.workflow, process, now_millis),

        CommandKind::DrainWorkflow => drain_workflow(state, command.workflow),

        CommandKind::StopWorkflow { reason } => stop_workflow(state, command.workflow, reason.clone()),

        CommandKind::SignalWorkflowComplete { status, summary, tasks_closed } => {
            signal_workflow_complete(state, command.workflow, *status, summary.clone(), *tasks_closed, now_millis)
        }

        CommandKind::PauseWorkflow => pause_workflow(state, command.workflow),

        CommandKind::ResumeWorkflow => resume_workflow(state, command.workflow),

        CommandKind::ReplaceProcess { process } => replace_process(state, command.workflow, process, now_millis, admission),

        CommandKind::RetireProcess { process, reason } => retire_process(state, command.workflow, process, reason.clone(), admission),

        CommandKind::ProcessTurnComplete {
            process,
            succeeded,
            session_ref,
            turn_cost_usd,
            context_tokens,
            output_tokens,
            last_error,
        } => process_turn_complete(
            state,
            command.workflow,
            process,
            *succeeded,
            session_ref.clone(),
            *turn_cost_usd,
            *context_tokens,
            *output_tokens,
            last_error.clone(),
            now_millis,
            admission,
        ),

        CommandKind::DeliverQueued { process } => deliver_queued(state, command.workflow, process, now_millis),

        CommandKind::FabricReply(fabric_msg) => fabric_reply(state, fabric_msg, now_millis),

        CommandKind::FabricAck { subscriber, ids } => fabric_ack(state, command.workflow, subscriber.clone(), ids.clone()),
    }
}

fn start_workflow(state: &mut MaterializedState, workflow: coswarm_core::WorkflowId, now: i64) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    let wf = state.workflow.as_mut().ok_or(OrchestratorError::WorkflowNotFound(workflow))?;
    wf.state = WorkflowState::Running;
    wf.updated_at_millis = now;
    Ok((vec![Event::WorkflowStarted { workflow }], Vec::new()))
}

fn spawn_process(
    state: &mut MaterializedState,
    workflow: coswarm_core::WorkflowId,
    role: ProcessRole,
    process: ProcessId,
    now: i64,
    admission: &dyn AdmissionControl,
) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    if state.processes.get(&process).is_some() {
        return Err(OrchestratorError::ValidationFailed(format!("process {process} already exists")));
    }
    admission.admit_worker(workflow)?;
    state.processes.insert(Process {
        id: process.clone(),
        workflow,
        role,
        status: ProcessStatus::Starting,
        session_ref: None,
        metrics: ProcessMetrics::default(),
        started_at_millis: now,
        last_activity_millis: now,
        current_task: None,
    });
    Ok((
        vec![Event::ProcessSpawned { workflow, process: process.clone(), role }],
        vec![Effect::SpawnProcess { workflow, process, role }],
    ))
}

fn stop_process(state: &mut MaterializedState, process: &ProcessId, admission: &dyn AdmissionControl) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    let entry = state.processes.get_mut(process).ok_or_else(|| OrchestratorError::ProcessNotFound(process.clone()))?;
    let workflow = entry.workflow;
    entry.status = ProcessStatus::Stopping;
    admission.release_worker(workflow);
    Ok((
        vec![Event::ProcessStopped { workflow, process: process.clone() }],
        vec![Effect::StopProcess { process: process.clone() }],
    ))
}

fn resume_process(state: &mut MaterializedState, process: &ProcessId, session_ref: String) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    let entry = state.processes.get_mut(process).ok_or_else(|| OrchestratorError::ProcessNotFound(process.clone()))?;
    if entry.status != ProcessStatus::Dormant {
        return Err(OrchestratorError::ValidationFailed(format!("process {process} is not dormant")));
    }
    let workflow = entry.workflow;
    entry.status = ProcessStatus::Starting;
    Ok((
        vec![Event::ProcessResumed { workflow, process: process.clone() }],
        vec![Effect::ResumeProcess { process: process.clone(), session_ref }],
    ))
}

fn enqueue_task(
    state: &mut MaterializedState,
    workflow: coswarm_core::WorkflowId,
    description: String,
    now: i64,
) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    if state.tasks.len() >= MAX_QUEUE_DEPTH {
        return Err(OrchestratorError::QueueFull { workflow, capacity: MAX_QUEUE_DEPTH });
    }
    let task = Task {
        id: coswarm_core::TaskId::new(),
        workflow,
        description,
        status: TaskStatus::Queued,
        assigned_to: None,
        reassignment_count: 0,
        created_at_millis: now,
        result_summary: None,
    };
    let task_id = task.id;
    state.tasks.insert(task);
    Ok((vec![Event::TaskQueued { workflow, task: task_id }], Vec::new()))
}

/// Assignment is exclusive while a task is actively held by a worker.
/// `Task::assign` always lands a freshly-assigned task in `Assigned`, not
/// `InProgress` — that status is only reached later, when the worker
/// itself reports it has started the work — so exclusivity has to be
/// checked against `Assigned`.
fn assign_task(state: &mut MaterializedState, task_id: &coswarm_core::TaskId, worker: ProcessId) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    let task = state.tasks.get_mut(task_id).ok_or(OrchestratorError::TaskNotFound(*task_id))?;
    if let Some(existing) = &task.assigned_to {
        if *existing != worker && (task.status == TaskStatus::Assigned || task.status == TaskStatus::InProgress) {
            return Err(OrchestratorError::ConflictingAssignment { task: *task_id, existing: existing.clone(), requested: worker });
        }
    }
    let workflow = task.workflow;
    let was_reassignment = task.assigned_to.is_some();
    task.assign(worker.clone());

    if let Some(process) = state.processes.get_mut(&worker) {
        process.current_task = Some(*task_id);
    }

    let event = if task.status == TaskStatus::Parked {
        Event::TaskParked { workflow, task: *task_id }
    } else if was_reassignment {
        Event::TaskReassigned { workflow, task: *task_id, worker: worker.clone(), attempt: task.reassignment_count }
    } else {
        Event::TaskAssigned { workflow, task: *task_id, worker: worker.clone() }
    };

    Ok((vec![event], vec![Effect::SendToProcess { process: worker, body: format!("assigned task {task_id}") }]))
}

fn report_task_result(state: &mut MaterializedState, task_id: &coswarm_core::TaskId, success: bool, summary: String) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    let task = state.tasks.get_mut(task_id).ok_or(OrchestratorError::TaskNotFound(*task_id))?;
    let workflow = task.workflow;
    if success {
        task.complete(summary.clone());
        Ok((vec![Event::TaskCompleted { workflow, task: *task_id, summary }], Vec::new()))
    } else {
        task.fail(summary.clone());
        Ok((vec![Event::TaskFailed { workflow, task: *task_id, summary }], Vec::new()))
    }
}

/// Queue `body` for `to`; dispatch it immediately only if `to` is actually
/// idle enough to receive stdin right now. A busy, starting, or dormant
/// process gets the message queued and waits for a `DeliverQueued`
/// command once it frees up, rather than racing stdin writes against
/// whatever turn it's already mid-way through.
fn send_message(state: &mut MaterializedState, workflow: coswarm_core::WorkflowId, to: ProcessId, body: String, now: i64) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    let process = state.processes.get(&to).ok_or_else(|| OrchestratorError::ProcessNotFound(to.clone()))?;
    let ready = process.status == ProcessStatus::Idle;

    let mut message = QueuedMessage {
        id: coswarm_core::MessageId::new(),
        workflow,
        to: to.clone(),
        from: coswarm_core::MessageSource::System,
        body: body.clone(),
        queued_at_millis: now,
        delivered_at_millis: None,
    };

    let mut events = vec![Event::MessageQueued { workflow, to: to.clone() }];
    let mut effects = Vec::new();

    if ready {
        message.mark_delivered(now);
        state.messages.push(message);
        if let Some(process) = state.processes.get_mut(&to) {
            process.status = ProcessStatus::Busy;
        }
        events.push(Event::ProcessBusy { workflow, process: to.clone() });
        events.push(Event::MessageDelivered { workflow, to: to.clone() });
        effects.push(Effect::SendToProcess { process: to, body });
    } else {
        state.messages.push(message);
    }

    Ok((events, effects))
}

fn post_fabric_message(state: &mut MaterializedState, fabric_msg: &coswarm_core::FabricMessage, now: i64) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    let _ = now;
    let event = Event::FabricPosted { workflow: fabric_msg.workflow, from: fabric_msg.from.clone(), channel: fabric_msg.channel.to_string() };
    let effect = Effect::DeliverMentions { task: None, to: fabric_msg.mentions.clone() };
    state.fabric.post(fabric_msg.clone());
    Ok((vec![event], vec![effect]))
}

fn heartbeat(state: &mut MaterializedState, workflow: coswarm_core::WorkflowId, process: &ProcessId, now: i64) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    let entry = state.processes.get_mut(process).ok_or_else(|| OrchestratorError::ProcessNotFound(process.clone()))?;
    entry.touch(now);
    Ok((vec![Event::ProcessHeartbeat { workflow, process: process.clone(), at_millis: now }], Vec::new()))
}

fn drain_workflow(state: &mut MaterializedState, workflow: coswarm_core::WorkflowId) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    let wf = state.workflow.as_mut().ok_or(OrchestratorError::WorkflowNotFound(workflow))?;
    wf.state = WorkflowState::Draining;
    Ok((vec![Event::WorkflowDraining { workflow }], Vec::new()))
}

fn stop_workflow(state: &mut MaterializedState, workflow: coswarm_core::WorkflowId, reason: Option<String>) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    let wf = state.workflow.as_mut().ok_or(OrchestratorError::WorkflowNotFound(workflow))?;
    let mut effects: Vec<Effect> = state.processes.all().map(|p| Effect::StopProcess { process: p.id.clone() }).collect();

    let event = if let Some(reason) = reason {
        wf.state = WorkflowState::Failed;
        wf.failure_reason = Some(reason.clone());
        effects.push(Effect::Notify { title: "workflow failed".to_string(), body: reason.clone() });
        Event::WorkflowFailed { workflow, reason }
    } else {
        wf.state = WorkflowState::Completed;
        effects.push(Effect::Notify { title: "workflow completed".to_string(), body: workflow.to_string() });
        Event::WorkflowCompleted { workflow, status: None, summary: None }
    };

    effects.push(Effect::Emit(event.clone()));
    Ok((vec![event], effects))
}

/// The coordinator declaring its run finished. Unlike `StopWorkflow`, this
/// always lands in `Completed` — `tasks_closed` is informational, logged
/// but not otherwise part of the workflow's persisted state.
fn signal_workflow_complete(
    state: &mut MaterializedState,
    workflow: coswarm_core::WorkflowId,
    status: coswarm_core::CompletionStatus,
    summary: String,
    tasks_closed: u32,
    now: i64,
) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    let wf = state.workflow.as_mut().ok_or(OrchestratorError::WorkflowNotFound(workflow))?;
    wf.state = WorkflowState::Completed;
    wf.completion_status = Some(status);
    wf.summary = Some(summary.clone());
    wf.completed_at_millis = Some(now);
    wf.updated_at_millis = now;
    tracing::info!(tasks_closed, status = %status, "workflow signaled complete");

    let mut effects: Vec<Effect> = state.processes.all().map(|p| Effect::StopProcess { process: p.id.clone() }).collect();
    let event = Event::WorkflowCompleted { workflow, status: Some(status), summary: Some(summary.clone()) };
    effects.push(Effect::Notify { title: "workflow completed".to_string(), body: workflow.to_string() });
    effects.push(Effect::Emit(event.clone()));
    Ok((vec![event], effects))
}

fn pause_workflow(state: &mut MaterializedState, workflow: coswarm_core::WorkflowId) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    let wf = state.workflow.as_mut().ok_or(OrchestratorError::WorkflowNotFound(workflow))?;
    if wf.state != WorkflowState::Running {
        return Err(OrchestratorError::ValidationFailed(format!("workflow {workflow} is not running, cannot pause")));
    }
    wf.state = WorkflowState::Paused;
    Ok((vec![Event::WorkflowPaused { workflow }], Vec::new()))
}

fn resume_workflow(state: &mut MaterializedState, workflow: coswarm_core::WorkflowId) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    let wf = state.workflow.as_mut().ok_or(OrchestratorError::WorkflowNotFound(workflow))?;
    if wf.state != WorkflowState::Paused {
        return Err(OrchestratorError::ValidationFailed(format!("workflow {workflow} is not paused, cannot resume")));
    }
    wf.state = WorkflowState::Running;
    Ok((vec![Event::WorkflowResumed { workflow }], Vec::new()))
}

/// Retire `process` permanently, draining whatever it still had queued to
/// the dead-letter log. An idle process goes dormant so it can be
/// reattached later by session ref; anything else is stopped outright,
/// since there's no clean turn boundary to preserve.
fn retire_process(
    state: &mut MaterializedState,
    workflow: coswarm_core::WorkflowId,
    process: &ProcessId,
    reason: Option<String>,
    admission: &dyn AdmissionControl,
) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    let entry = state.processes.get_mut(process).ok_or_else(|| OrchestratorError::ProcessNotFound(process.clone()))?;
    let now = entry.last_activity_millis;
    let was_idle = matches!(entry.status, ProcessStatus::Idle | ProcessStatus::Dormant);
    let mut effects = Vec::new();
    if was_idle {
        entry.go_dormant(now);
        effects.push(Effect::Emit(Event::ProcessDormant { workflow, process: process.clone() }));
    } else {
        entry.status = ProcessStatus::Stopping;
        effects.push(Effect::StopProcess { process: process.clone() });
    }
    let dropped = state.messages.retire(process);
    if dropped > 0 {
        tracing::warn!(process = %process, dropped, "retired process with undelivered messages");
    }
    admission.release_worker(workflow);
    Ok((vec![Event::ProcessRetired { workflow, process: process.clone(), reason }], effects))
}

/// Retire `process` and spawn a fresh one in its place, same id and role,
/// carrying over whatever it still had queued — unlike `RetireProcess`,
/// replacement isn't a permanent departure, so the inbox isn't drained.
fn replace_process(
    state: &mut MaterializedState,
    workflow: coswarm_core::WorkflowId,
    process: &ProcessId,
    now: i64,
    admission: &dyn AdmissionControl,
) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    let old = state.processes.remove(process).ok_or_else(|| OrchestratorError::ProcessNotFound(process.clone()))?;
    admission.release_worker(workflow);
    admission.admit_worker(workflow)?;
    state.processes.insert(Process {
        id: process.clone(),
        workflow,
        role: old.role,
        status: ProcessStatus::Starting,
        session_ref: None,
        metrics: ProcessMetrics::default(),
        started_at_millis: now,
        last_activity_millis: now,
        current_task: old.current_task,
    });
    Ok((
        vec![Event::ProcessReplaced { workflow, process: process.clone() }],
        vec![Effect::StopProcess { process: process.clone() }, Effect::SpawnProcess { workflow, process: process.clone(), role: old.role }],
    ))
}

/// One AI turn finished. On success the new session ref is committed and
/// metrics updated; on failure the process keeps whatever session ref it
/// had before the turn started, so a retried turn resumes from the last
/// good state instead of one that may never have been persisted by the
/// provider. Either way, if another message is already waiting, hand it
/// off right away instead of making the caller issue a separate
/// `DeliverQueued`.
#[allow(clippy::too_many_arguments)]
fn process_turn_complete(
    state: &mut MaterializedState,
    workflow: coswarm_core::WorkflowId,
    process: &ProcessId,
    succeeded: bool,
    session_ref: Option<String>,
    turn_cost_usd: f64,
    context_tokens: u64,
    output_tokens: u64,
    last_error: Option<String>,
    now: i64,
    admission: &dyn AdmissionControl,
) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    let entry = state.processes.get_mut(process).ok_or_else(|| OrchestratorError::ProcessNotFound(process.clone()))?;
    entry.metrics.record_turn(turn_cost_usd, context_tokens, output_tokens);
    entry.touch(now);
    admission.release_ai_call();
    admission.record_tokens(workflow, output_tokens)?;

    if succeeded {
        if let Some(session_ref) = session_ref {
            entry.session_ref = Some(session_ref);
        }
    }
    let committed_session_ref = entry.session_ref.clone();
    entry.status = ProcessStatus::Idle;

    let mut events = vec![Event::ProcessOutputRecorded {
        workflow,
        process: process.clone(),
        turn_cost_usd,
        context_tokens,
        output_tokens,
        session_ref: committed_session_ref,
    }];
    let mut effects = Vec::new();

    if succeeded {
        events.push(Event::ProcessIdle { workflow, process: process.clone() });
    } else {
        let reason = last_error.unwrap_or_else(|| "turn failed with no reported error".to_string());
        events.push(Event::ProcessCrashed { workflow, process: process.clone(), reason });
    }

    if let Some(mut next) = state.messages.pop_next(process) {
        next.mark_delivered(now);
        let body = next.body.clone();
        if let Some(p) = state.processes.get_mut(process) {
            p.status = ProcessStatus::Busy;
        }
        events.push(Event::ProcessBusy { workflow, process: process.clone() });
        events.push(Event::MessageDelivered { workflow, to: process.clone() });
        effects.push(Effect::SendToProcess { process: process.clone(), body });
    }

    Ok((events, effects))
}

/// Dispatch the next queued message to `process`, if one is waiting. A
/// process still `Starting` gets its first readiness event here rather
/// than waiting on a turn to complete, since nothing else marks a freshly
/// spawned process as able to receive work. A no-op on any other status —
/// callers fire this speculatively whenever a process might have just
/// freed up.
fn deliver_queued(state: &mut MaterializedState, workflow: coswarm_core::WorkflowId, process: &ProcessId, now: i64) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    let entry = state.processes.get(process).ok_or_else(|| OrchestratorError::ProcessNotFound(process.clone()))?;
    let becoming_ready = entry.status == ProcessStatus::Starting;
    if !becoming_ready && entry.status != ProcessStatus::Idle {
        return Ok((Vec::new(), Vec::new()));
    }

    let mut events = Vec::new();
    if becoming_ready {
        if let Some(p) = state.processes.get_mut(process) {
            p.status = ProcessStatus::Idle;
        }
        events.push(Event::ProcessReady { workflow, process: process.clone() });
    }

    let Some(mut next) = state.messages.pop_next(process) else {
        return Ok((events, Vec::new()));
    };
    next.mark_delivered(now);
    let body = next.body.clone();
    if let Some(p) = state.processes.get_mut(process) {
        p.status = ProcessStatus::Busy;
    }
    events.push(Event::ProcessBusy { workflow, process: process.clone() });
    events.push(Event::MessageDelivered { workflow, to: process.clone() });
    Ok((events, vec![Effect::SendToProcess { process: process.clone(), body }]))
}

fn fabric_reply(state: &mut MaterializedState, fabric_msg: &coswarm_core::FabricMessage, now: i64) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    if fabric_msg.reply_to.is_none() {
        return Err(OrchestratorError::ValidationFailed("fabric reply must set reply_to".to_string()));
    }
    if let Some(parent_id) = fabric_msg.reply_to {
        if state.fabric.get(&parent_id).is_none() {
            return Err(OrchestratorError::ValidationFailed(format!("fabric reply targets unknown message {parent_id}")));
        }
    }
    post_fabric_message(state, fabric_msg, now)
}

fn fabric_ack(
    state: &mut MaterializedState,
    workflow: coswarm_core::WorkflowId,
    subscriber: ProcessId,
    ids: Vec<coswarm_core::FabricMessageId>,
) -> Result<(Vec<Event>, Vec<Effect>), OrchestratorError> {
    let count = state.fabric.ack(subscriber.clone(), &ids);
    Ok((vec![Event::FabricAcked { workflow, subscriber, count }], Vec::new()))
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
