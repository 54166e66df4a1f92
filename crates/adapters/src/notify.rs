// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desktop notifications for terminal workflow states, executed alongside
//! `Effect::Notify`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification failed: {0}")]
    Failed(String),
}

pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Real desktop notifications via `notify-rust`. A failure here (no
/// notification daemon running, headless CI box) is logged and swallowed by
/// the caller — losing a toast is never fatal to a workflow.
#[derive(Debug, Default)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        notify_rust::Notification::new()
            .summary(title)
            .body(body)
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError::Failed(e.to_string()))
    }
}

/// Records notifications instead of showing them, for tests and headless
/// deployments.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub sent: parking_lot::Mutex<Vec<(String, String)>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        self.sent.lock().push((title.to_string(), body.to_string()));
        Ok(())
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
