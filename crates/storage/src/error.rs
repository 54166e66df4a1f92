// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error at {path}: {source}")]
    Io { path: std::path::PathBuf, #[source] source: std::io::Error },
    #[error("corrupt metadata at {path}: {source}")]
    CorruptMetadata { path: std::path::PathBuf, #[source] source: serde_json::Error },
}

pub type Result<T> = std::result::Result<T, StorageError>;
