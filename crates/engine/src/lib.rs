// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The runtime: repositories, event bus, command processor, handlers, and
//! per-process supervision. Everything here is provider-agnostic — it
//! depends only on the `Provider`/`HeadlessProcess` traits from
//! `coswarm-adapters`, never on a concrete CLI binary.

pub mod admission;
pub mod bus;
pub mod engine;
pub mod handlers;
pub mod processor;
pub mod repo;
pub mod supervisor;

pub use admission::{AdmissionControl, NullAdmission};
pub use bus::EventBus;
pub use engine::{Engine, EffectSink};
pub use processor::{CommandProcessor, CommandProcessorHandle};
pub use repo::MaterializedState;
pub use supervisor::ProcessSupervisor;
