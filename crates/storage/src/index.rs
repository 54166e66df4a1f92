// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sessions.json`: the per-application index that lets the CLI list and
//! filter sessions without opening every `metadata.json` under it.

use coswarm_core::IndexEntry;
use std::path::Path;

use crate::error::{Result, StorageError};

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct ApplicationIndex {
    pub entries: Vec<IndexEntry>,
}

impl ApplicationIndex {
    /// Load the index, tolerating a corrupt or missing file by starting
    /// fresh rather than failing the whole read path — the index is a
    /// derived cache, never the source of truth.
    pub fn load(path: &Path) -> Self {
        match std::fs::read(path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io { path: parent.to_path_buf(), source })?;
        }
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| StorageError::CorruptMetadata { path: path.to_path_buf(), source: e })?;
        std::fs::write(&tmp_path, json).map_err(|source| StorageError::Io { path: tmp_path.clone(), source })?;
        std::fs::rename(&tmp_path, path).map_err(|source| StorageError::Io { path: path.to_path_buf(), source })
    }

    /// Insert or replace the entry for `entry.workflow`, then sort so the
    /// most recently updated session lists first.
    pub fn upsert(&mut self, entry: IndexEntry) {
        self.entries.retain(|e| e.workflow != entry.workflow);
        self.entries.push(entry);
        self.entries.sort_by(|a, b| b.updated_at_millis.cmp(&a.updated_at_millis));
    }
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod tests;
