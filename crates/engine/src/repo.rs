// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory repositories. Consistency is guaranteed only within one
//! command-processor invocation: a handler reads and writes through the
//! same `&mut MaterializedState` it was given, never across an `.await`.

use coswarm_core::{
    FabricChannel, FabricMessage, FabricMessageId, Process, ProcessId, QueuedMessage, Task, TaskId, WorkflowInstance,
};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct ProcessRepo {
    processes: HashMap<ProcessId, Process>,
}

impl ProcessRepo {
    pub fn insert(&mut self, process: Process) {
        self.processes.insert(process.id.clone(), process);
    }

    pub fn get(&self, id: &ProcessId) -> Option<&Process> {
        self.processes.get(id)
    }

    pub fn get_mut(&mut self, id: &ProcessId) -> Option<&mut Process> {
        self.processes.get_mut(id)
    }

    pub fn remove(&mut self, id: &ProcessId) -> Option<Process> {
        self.processes.remove(id)
    }

    pub fn all(&self) -> impl Iterator<Item = &Process> {
        self.processes.values()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct TaskRepo {
    tasks: HashMap<TaskId, Task>,
}

impl TaskRepo {
    pub fn insert(&mut self, task: Task) {
        self.tasks.insert(task.id, task);
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(id)
    }

    pub fn queued(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values().filter(|t| t.status == coswarm_core::TaskStatus::Queued)
    }

    pub fn all(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}

/// Per-process inbound message queues, FIFO within each process.
#[derive(Debug, Default)]
pub struct MessageRepo {
    inboxes: HashMap<ProcessId, Vec<QueuedMessage>>,
    dead_letters: Vec<QueuedMessage>,
}

impl MessageRepo {
    pub fn push(&mut self, message: QueuedMessage) {
        self.inboxes.entry(message.to.clone()).or_default().push(message);
    }

    /// Re-queue a message at the front of its inbox: used when a turn
    /// completes but admission has no capacity to dispatch it right away.
    pub fn push_front(&mut self, message: QueuedMessage) {
        self.inboxes.entry(message.to.clone()).or_default().insert(0, message);
    }

    /// Pop the next undelivered message for `process`, if any.
    pub fn pop_next(&mut self, process: &ProcessId) -> Option<QueuedMessage> {
        let queue = self.inboxes.get_mut(process)?;
        if queue.is_empty() {
            return None;
        }
        Some(queue.remove(0))
    }

    pub fn pending_count(&self, process: &ProcessId) -> usize {
        self.inboxes.get(process).map(|q| q.len()).unwrap_or(0)
    }

    /// Drain `process`'s inbox into the dead-letter log, returning how many
    /// messages were dropped. Used when a process retires or is replaced.
    pub fn retire(&mut self, process: &ProcessId) -> usize {
        match self.inboxes.remove(process) {
            Some(queue) => {
                let n = queue.len();
                self.dead_letters.extend(queue);
                n
            }
            None => 0,
        }
    }

    pub fn dead_letters(&self) -> &[QueuedMessage] {
        &self.dead_letters
    }
}

/// The workflow-wide fabric log and per-subscriber ack tracking.
#[derive(Debug, Default)]
pub struct FabricRepo {
    log: Vec<FabricMessage>,
    acked: HashMap<ProcessId, HashSet<FabricMessageId>>,
}

impl FabricRepo {
    pub fn post(&mut self, message: FabricMessage) {
        self.log.push(message);
    }

    pub fn get(&self, id: &FabricMessageId) -> Option<&FabricMessage> {
        self.log.iter().find(|m| &m.id == id)
    }

    pub fn history<'a>(&'a self, channel: &'a FabricChannel) -> impl Iterator<Item = &'a FabricMessage> + 'a {
        self.log.iter().filter(move |m| &m.channel == channel)
    }

    /// Record `subscriber` having consumed each of `ids`, returning how many
    /// were newly acknowledged (already-acked ids don't count twice).
    pub fn ack(&mut self, subscriber: ProcessId, ids: &[FabricMessageId]) -> usize {
        let seen = self.acked.entry(subscriber).or_default();
        ids.iter().filter(|id| seen.insert(**id)).count()
    }

    pub fn unacked(&self, subscriber: &ProcessId) -> impl Iterator<Item = &FabricMessage> {
        let seen = self.acked.get(subscriber);
        self.log.iter().filter(move |m| !seen.map(|s| s.contains(&m.id)).unwrap_or(false))
    }
}

/// Holds the single workflow instance this processor owns alongside its
/// entity repositories.
#[derive(Debug, Default)]
pub struct MaterializedState {
    pub workflow: Option<WorkflowInstance>,
    pub processes: ProcessRepo,
    pub tasks: TaskRepo,
    pub messages: MessageRepo,
    pub fabric: FabricRepo,
}

#[cfg(test)]
#[path = "repo_tests.rs"]
mod tests;
