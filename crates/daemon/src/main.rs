// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `coswarmd`: the control-plane daemon. Loads configuration, wires the
//! registry/scheduler/health monitor/cross-workflow bus together behind a
//! `Supervisor`, and runs until it receives a shutdown signal.

use coswarm_adapters::{CliProvider, Provider};
use coswarm_core::{Clock, SystemClock};
use coswarm_daemon::{CrossWorkflowEventBus, DaemonConfig, HealthMonitor, Supervisor};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn config_path() -> PathBuf {
    std::env::var_os("COSWARMD_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| dirs::config_dir().unwrap_or_else(std::env::temp_dir).join("coswarmd").join("config.toml"))
}

fn init_tracing() {
    let log_dir = dirs::data_local_dir().unwrap_or_else(std::env::temp_dir).join("coswarm").join("logs");
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(log_dir, "coswarmd.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    // Leak the guard deliberately: it must outlive every `tracing` call for
    // the process's lifetime, and the process never tears this down early.
    std::mem::forget(guard);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = DaemonConfig::load_or_default(&config_path());
    tracing::info!(session_root = %config.session_root.display(), "coswarmd starting");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::default());
    let provider: Arc<dyn Provider> = Arc::new(CliProvider);
    let scheduler = Arc::new(coswarm_daemon::ResourceScheduler::new(config.scheduler_limits()));
    let health = Arc::new(HealthMonitor::new(clock.clone(), config.stuck_threshold()));
    let cross_bus = Arc::new(CrossWorkflowEventBus::new(config.cross_bus_capacity));

    let supervisor = Arc::new(Supervisor::new(scheduler, health, cross_bus, clock, provider));
    let _sweeper = supervisor.spawn_recovery_sweeper(config.stuck_threshold() / 2);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received shutdown signal");
        }
    }

    supervisor.shutdown(Duration::from_secs(30)).await;
    tracing::info!("coswarmd stopped");
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
