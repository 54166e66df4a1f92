// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Messages queued for delivery to a process's stdin, waiting for the
//! process to be idle enough to receive them.

use serde::{Deserialize, Serialize};

use crate::{define_id, ProcessId};

define_id! {
    pub struct MessageId("msg-");
}

/// Where a queued message originated, for audit and for the coordinator
/// to address replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum MessageSource {
    Process(ProcessId),
    Operator,
    System,
}

/// One message waiting in a process's inbound queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedMessage {
    pub id: MessageId,
    pub workflow: crate::WorkflowId,
    pub to: ProcessId,
    pub from: MessageSource,
    pub body: String,
    pub queued_at_millis: i64,
    #[serde(default)]
    pub delivered_at_millis: Option<i64>,
}

impl QueuedMessage {
    pub fn is_delivered(&self) -> bool {
        self.delivered_at_millis.is_some()
    }

    pub fn mark_delivered(&mut self, at_millis: i64) {
        self.delivered_at_millis = Some(at_millis);
    }
}

builder! {
    pub struct QueuedMessageBuilder => QueuedMessage {
        into {
            body: String = "hello",
        }
        set {
            to: ProcessId = ProcessId::coordinator(),
            from: MessageSource = MessageSource::Operator,
            queued_at_millis: i64 = 0,
        }
        option {
            delivered_at_millis: i64 = None,
        }
        computed {
            id: MessageId = MessageId::new(),
            workflow: crate::WorkflowId = crate::WorkflowId::new(),
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
