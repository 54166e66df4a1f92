// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic `metadata.json` reads and writes: every write lands in a sibling
//! temp file and is renamed into place, so a crash mid-write never leaves a
//! half-written file behind.

use coswarm_core::SessionMetadata;
use std::path::Path;

use crate::error::{Result, StorageError};

pub fn save(path: &Path, metadata: &SessionMetadata) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| StorageError::Io { path: parent.to_path_buf(), source })?;
    }
    let tmp_path = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| StorageError::CorruptMetadata { path: path.to_path_buf(), source: e })?;
    std::fs::write(&tmp_path, json).map_err(|source| StorageError::Io { path: tmp_path.clone(), source })?;
    std::fs::rename(&tmp_path, path).map_err(|source| StorageError::Io { path: path.to_path_buf(), source })
}

pub fn load(path: &Path) -> Result<SessionMetadata> {
    let bytes = std::fs::read(path).map_err(|source| StorageError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_slice(&bytes).map_err(|e| StorageError::CorruptMetadata { path: path.to_path_buf(), source: e })
}

pub fn try_load(path: &Path) -> Result<Option<SessionMetadata>> {
    if !path.exists() {
        return Ok(None);
    }
    load(path).map(Some)
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
