// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects are the side effects a command handler asks the runtime to carry
//! out after a command is applied: never executed by the handler itself,
//! always handed to the executor so the handler stays a pure state
//! transition.

use serde::{Deserialize, Serialize};

use crate::{Event, ProcessId, ProcessRole, TaskId, WorkflowId};

pub mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        (d.as_millis() as u64).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(d)?;
        Ok(Duration::from_millis(millis))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Effect {
    /// Publish an event onto the workflow's event bus (and, if tagged with
    /// a workflow id, the cross-workflow bus too).
    Emit(Event),
    /// Ask the process supervisor to spawn a new subprocess for `process`.
    SpawnProcess { workflow: WorkflowId, process: ProcessId, role: ProcessRole },
    /// Deliver `body` to a process's stdin once it is ready to receive it.
    SendToProcess { process: ProcessId, body: String },
    /// Send SIGTERM (then SIGKILL after a grace period) to a process.
    StopProcess { process: ProcessId },
    /// Re-attach a dormant process using its preserved session reference.
    ResumeProcess { process: ProcessId, session_ref: String },
    /// Arm a named timer; firing delivers a `Heartbeat`-shaped command back
    /// into the workflow's command processor after `duration`.
    SetTimer {
        name: String,
        #[serde(with = "duration_serde")]
        duration: std::time::Duration,
    },
    CancelTimer { name: String },
    /// Deliver a fabric post to every mentioned process's inbox.
    DeliverMentions { task: Option<TaskId>, to: Vec<ProcessId> },
    /// Surface a desktop notification for a terminal workflow state.
    Notify { title: String, body: String },
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Emit(_) => "emit",
            Effect::SpawnProcess { .. } => "spawn_process",
            Effect::SendToProcess { .. } => "send_to_process",
            Effect::StopProcess { .. } => "stop_process",
            Effect::ResumeProcess { .. } => "resume_process",
            Effect::SetTimer { .. } => "set_timer",
            Effect::CancelTimer { .. } => "cancel_timer",
            Effect::DeliverMentions { .. } => "deliver_mentions",
            Effect::Notify { .. } => "notify",
        }
    }

    /// Key=value fields for a structured log line, cheap enough to build on
    /// every effect without gating behind a verbosity check.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::Emit(event) => vec![("event", event.kind())],
            Effect::SpawnProcess { process, role, .. } => {
                vec![("process", process.to_string()), ("role", role.to_string())]
            }
            Effect::SendToProcess { process, .. } => vec![("process", process.to_string())],
            Effect::StopProcess { process } => vec![("process", process.to_string())],
            Effect::ResumeProcess { process, .. } => vec![("process", process.to_string())],
            Effect::SetTimer { name, duration } => {
                vec![("timer", name.clone()), ("duration_ms", duration.as_millis().to_string())]
            }
            Effect::CancelTimer { name } => vec![("timer", name.clone())],
            Effect::DeliverMentions { to, .. } => vec![("recipients", to.len().to_string())],
            Effect::Notify { title, .. } => vec![("title", title.clone())],
        }
    }

    /// Effects noisy enough to only log at verbose levels (payload bodies,
    /// not just routing metadata).
    pub fn verbose(&self) -> bool {
        matches!(self, Effect::SendToProcess { .. } | Effect::Notify { .. })
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
