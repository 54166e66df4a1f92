// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The on-disk session directory tree:
//!
//! ```text
//! {base}/{application}/{date}/{session-id}/
//!     metadata.json
//!     coordinator/raw.jsonl
//!     workers/{process-id}/raw.jsonl
//!     observer/notes.md
//!     accountability.md
//! ```

use chrono::NaiveDate;
use coswarm_core::{ProcessId, WorkflowId};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct SessionLayout {
    base: PathBuf,
    application: String,
    date: NaiveDate,
    session: WorkflowId,
}

impl SessionLayout {
    pub fn new(base: impl Into<PathBuf>, application: impl Into<String>, date: NaiveDate, session: WorkflowId) -> Self {
        Self { base: base.into(), application: application.into(), date, session }
    }

    pub fn root(&self) -> PathBuf {
        self.base.join(&self.application).join(self.date.format("%Y-%m-%d").to_string()).join(self.session.to_string())
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.root().join("metadata.json")
    }

    pub fn coordinator_transcript(&self) -> PathBuf {
        self.root().join("coordinator").join("raw.jsonl")
    }

    pub fn worker_transcript(&self, worker: &ProcessId) -> PathBuf {
        self.root().join("workers").join(worker.as_str()).join("raw.jsonl")
    }

    pub fn observer_notes(&self) -> PathBuf {
        self.root().join("observer").join("notes.md")
    }

    pub fn accountability(&self) -> PathBuf {
        self.root().join("accountability.md")
    }

    pub fn transcript_for(&self, process: &ProcessId) -> PathBuf {
        if process.is_coordinator() {
            self.coordinator_transcript()
        } else if process.as_str() == "observer" {
            self.root().join("observer").join("raw.jsonl")
        } else {
            self.worker_transcript(process)
        }
    }

    pub fn application_index_path(base: &Path, application: &str) -> PathBuf {
        base.join(application).join("sessions.json")
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
