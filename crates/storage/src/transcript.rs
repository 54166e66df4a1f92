// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only JSONL transcript writer: one line per provider event, never
//! truncated, never rewritten.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, StorageError};

pub struct TranscriptWriter {
    path: PathBuf,
}

impl TranscriptWriter {
    /// Create (or reopen) the transcript at `path`, creating parent
    /// directories as needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io { path: parent.to_path_buf(), source })?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one JSON-serializable record as a line, fsync'd so a crash
    /// right after never loses it mid-write.
    pub fn append<T: serde::Serialize>(&self, record: &T) -> Result<()> {
        let line = serde_json::to_string(record).map_err(|e| StorageError::CorruptMetadata { path: self.path.clone(), source: e })?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| StorageError::Io { path: self.path.clone(), source })?;
        writeln!(file, "{line}").map_err(|source| StorageError::Io { path: self.path.clone(), source })?;
        file.sync_data().map_err(|source| StorageError::Io { path: self.path.clone(), source })
    }

    /// Read every line from `offset` onward, returning the decoded records
    /// and the new byte offset. Lines that fail to parse are skipped rather
    /// than aborting the read — a torn final line from a crash mid-append
    /// should not poison everything before it.
    pub fn read_from<T: serde::de::DeserializeOwned>(path: &Path, offset: u64) -> Result<(Vec<T>, u64)> {
        use std::io::{Read, Seek, SeekFrom};

        let mut file = match std::fs::File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((Vec::new(), 0)),
            Err(source) => return Err(StorageError::Io { path: path.to_path_buf(), source }),
        };
        file.seek(SeekFrom::Start(offset)).map_err(|source| StorageError::Io { path: path.to_path_buf(), source })?;

        let mut buf = String::new();
        file.read_to_string(&mut buf).map_err(|source| StorageError::Io { path: path.to_path_buf(), source })?;

        let mut records = Vec::new();
        let mut consumed = offset;
        for line in buf.split_inclusive('\n') {
            if !line.ends_with('\n') {
                // Partial line at EOF: stop before it, leave it for the next read.
                break;
            }
            consumed += line.len() as u64;
            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                continue;
            }
            if let Ok(record) = serde_json::from_str(trimmed) {
                records.push(record);
            }
        }
        Ok((records, consumed))
    }
}

#[cfg(test)]
#[path = "transcript_tests.rs"]
mod tests;
