// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `SessionStore` ties layout, metadata, transcripts, and the application
//! index together into the one object `coswarm-daemon` and `coswarm-cli`
//! actually hold.

use chrono::Utc;
use coswarm_core::{ProcessId, ProviderEvent, SessionMetadata, WorkflowId};
use std::path::PathBuf;

use crate::error::Result;
use crate::index::ApplicationIndex;
use crate::layout::SessionLayout;
use crate::{metadata, transcript::TranscriptWriter};

#[derive(Debug, Clone)]
pub struct SessionStore {
    base: PathBuf,
}

impl SessionStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn layout(&self, application: &str, workflow: WorkflowId) -> SessionLayout {
        SessionLayout::new(&self.base, application, Utc::now().date_naive(), workflow)
    }

    pub fn save_metadata(&self, application: &str, workflow: WorkflowId, meta: &SessionMetadata) -> Result<()> {
        let layout = self.layout(application, workflow);
        metadata::save(&layout.metadata_path(), meta)?;

        let index_path = SessionLayout::application_index_path(&self.base, application);
        let mut index = ApplicationIndex::load(&index_path);
        index.upsert((meta).into());
        index.save(&index_path)
    }

    pub fn load_metadata(&self, application: &str, workflow: WorkflowId) -> Result<Option<SessionMetadata>> {
        let layout = self.layout(application, workflow);
        metadata::try_load(&layout.metadata_path())
    }

    pub fn append_provider_event(
        &self,
        application: &str,
        workflow: WorkflowId,
        process: &ProcessId,
        event: &ProviderEvent,
    ) -> Result<()> {
        let layout = self.layout(application, workflow);
        let writer = TranscriptWriter::open(layout.transcript_for(process))?;
        writer.append(event)
    }

    pub fn list_applications(&self, application: &str) -> ApplicationIndex {
        let index_path = SessionLayout::application_index_path(&self.base, application);
        ApplicationIndex::load(&index_path)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
