// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The control plane: registry, resource scheduler, health monitor,
//! cross-workflow event bus, and the top-level supervisor that wires them
//! to per-workflow engines.

pub mod config;
pub mod cross_bus;
pub mod health;
pub mod lifecycle;
pub mod registry;
pub mod scheduler;

pub use config::DaemonConfig;
pub use cross_bus::{CrossWorkflowEventBus, TaggedEvent};
pub use health::{HealthMonitor, HealthStatus, RecoveryAction};
pub use lifecycle::{StopOptions, Supervisor};
pub use registry::Registry;
pub use scheduler::{ResourceScheduler, SchedulerLimits};
