// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk daemon configuration, loaded from a `toml` file with
//! `#[serde(default)]` on every field added after the type's introduction
//! so an older config file keeps loading against a newer binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::scheduler::SchedulerLimits;

fn default_session_root() -> PathBuf {
    dirs::data_local_dir().unwrap_or_else(std::env::temp_dir).join("coswarm").join("sessions")
}

fn default_stuck_threshold_secs() -> u64 {
    120
}

fn default_cross_bus_capacity() -> usize {
    1024
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub session_root: PathBuf,
    pub max_workflows: usize,
    pub max_workers_per_workflow: usize,
    pub max_concurrent_ai_calls: usize,
    pub tokens_per_period_budget: u64,
    pub stuck_threshold_secs: u64,
    pub cross_bus_capacity: usize,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        let limits = SchedulerLimits::default();
        Self {
            session_root: default_session_root(),
            max_workflows: limits.max_workflows,
            max_workers_per_workflow: limits.max_workers_per_workflow,
            max_concurrent_ai_calls: limits.max_concurrent_ai_calls,
            tokens_per_period_budget: limits.tokens_per_period_budget,
            stuck_threshold_secs: default_stuck_threshold_secs(),
            cross_bus_capacity: default_cross_bus_capacity(),
        }
    }
}

impl DaemonConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Loads `path` if it exists, otherwise falls back to defaults. The
    /// daemon should run out of the box without a config file.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            match Self::load(path) {
                Ok(config) => return config,
                Err(err) => tracing::warn!(%err, "failed to load config, falling back to defaults"),
            }
        }
        Self::default()
    }

    pub fn scheduler_limits(&self) -> SchedulerLimits {
        SchedulerLimits {
            max_workflows: self.max_workflows,
            max_workers_per_workflow: self.max_workers_per_workflow,
            max_concurrent_ai_calls: self.max_concurrent_ai_calls,
            tokens_per_period_budget: self.tokens_per_period_budget,
        }
    }

    pub fn stuck_threshold(&self) -> Duration {
        Duration::from_secs(self.stuck_threshold_secs)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("failed to parse config file {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
