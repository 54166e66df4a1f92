// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The fabric is the workflow-wide broadcast channel processes post to with
//! `@mentions` and file attachments, distinct from the point-to-point
//! [`crate::QueuedMessage`] inbox delivery.

use serde::{Deserialize, Serialize};

use crate::{define_id, ProcessId};

define_id! {
    pub struct FabricMessageId("fbm-");
}

/// A file or artifact referenced alongside a fabric post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub path: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// One post to the shared fabric channel. Any process subscribed to the
/// channel observes it; processes named in `mentions` additionally get a
/// [`crate::QueuedMessage`] delivered to their inbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FabricMessage {
    pub id: FabricMessageId,
    pub workflow: crate::WorkflowId,
    pub channel: FabricChannel,
    pub from: ProcessId,
    pub body: String,
    #[serde(default)]
    pub mentions: Vec<ProcessId>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub posted_at_millis: i64,
    /// Set on replies; the fabric message this one answers.
    #[serde(default)]
    pub reply_to: Option<FabricMessageId>,
}

impl FabricMessage {
    pub fn mentions(&self, who: &ProcessId) -> bool {
        self.mentions.contains(who)
    }

    pub fn is_reply(&self) -> bool {
        self.reply_to.is_some()
    }
}

/// A named broadcast channel within a workflow. `Default` is every
/// process's implicit subscription; named channels are opt-in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FabricChannel {
    Default,
    Named(String),
}

impl std::fmt::Display for FabricChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FabricChannel::Default => f.write_str("default"),
            FabricChannel::Named(name) => f.write_str(name),
        }
    }
}

builder! {
    pub struct FabricMessageBuilder => FabricMessage {
        into {
            body: String = "status update",
        }
        set {
            workflow: crate::WorkflowId = crate::WorkflowId::new(),
            channel: FabricChannel = FabricChannel::Default,
            from: ProcessId = ProcessId::coordinator(),
            mentions: Vec<ProcessId> = Vec::new(),
            attachments: Vec<Attachment> = Vec::new(),
            posted_at_millis: i64 = 0,
        }
        option {
            reply_to: FabricMessageId = None,
        }
        computed {
            id: FabricMessageId = FabricMessageId::new(),
        }
    }
}

#[cfg(test)]
#[path = "fabric_tests.rs"]
mod tests;
