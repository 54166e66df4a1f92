// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapters to the outside world: the headless CLI provider, desktop
//! notifications, and the MCP tool-call surface. `coswarm-engine` depends
//! only on the trait objects defined here.

pub mod cli;
pub mod external;
pub mod notify;
pub mod provider;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use cli::CliProvider;
pub use notify::{DesktopNotifier, Notifier, NotifyError, RecordingNotifier};
pub use provider::{HeadlessProcess, ProcessRunState, Provider, ProviderConfig, ProviderError, ProviderKind};

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeProvider;
