// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The structured event vocabulary emitted on a headless AI CLI's stdout,
//! one JSON object per line. `coswarm-adapters` parses this; `coswarm-engine`
//! reacts to it.

use serde::{Deserialize, Serialize};

/// Usage figures carried on a `result` event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub cache_read_tokens: u64,
    #[serde(default)]
    pub total_cost_usd: f64,
}

impl ProviderUsage {
    /// Context tokens for [`crate::ProcessMetrics::record_turn`]: everything
    /// currently resident, not just this turn's new input.
    pub fn context_tokens(&self) -> u64 {
        self.input_tokens + self.cache_read_tokens
    }
}

/// One line of a headless provider's stdout stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderEvent {
    /// First line emitted once the subprocess has initialized; carries the
    /// session reference needed to resume later.
    Init {
        session_ref: String,
        #[serde(default)]
        model: Option<String>,
    },
    /// The assistant produced text or decided to call a tool.
    Assistant {
        #[serde(default)]
        text: Option<String>,
    },
    ToolUse {
        tool_name: String,
        #[serde(default)]
        input_summary: Option<String>,
    },
    ToolResult {
        tool_name: String,
        #[serde(default)]
        is_error: bool,
    },
    /// Terminates one turn: the provider is idle and ready for the next
    /// message on stdin.
    Result {
        #[serde(default)]
        usage: ProviderUsage,
        #[serde(default)]
        is_error: bool,
    },
    Error {
        message: String,
    },
    #[serde(other)]
    Unknown,
}

impl ProviderEvent {
    pub fn ends_turn(&self) -> bool {
        matches!(self, ProviderEvent::Result { .. })
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, ProviderEvent::Error { .. })
            || matches!(self, ProviderEvent::Result { is_error: true, .. })
    }
}

/// Parse one line of newline-delimited provider output. Blank lines and
/// lines that fail to parse as any known shape surface as `Unknown` rather
/// than an error — a provider upgrade that adds a field should never crash
/// the supervisor.
pub fn parse_provider_line(line: &str) -> Option<ProviderEvent> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(serde_json::from_str(trimmed).unwrap_or(ProviderEvent::Unknown))
}

#[cfg(test)]
#[path = "provider_event_tests.rs"]
mod tests;
