// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! spaces-engine: the Update Queue, State Manager, Broadcast Bus,
//! Import/Export Engine, and Command Dispatcher (`spec.md` §4.3–§4.7).
//!
//! This is where concurrency, validation, and the apply-batch algorithm
//! live. Everything upstream (`spaces-core`, `spaces-host`,
//! `spaces-storage`, `spaces-wire`) is pure data or a narrow I/O boundary;
//! this crate is what ties them into the authoritative, concurrent state
//! engine `spec.md` §2 describes.

pub mod broadcast;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod identity;
pub mod import_export;
pub mod manager;
pub mod queue;

pub use broadcast::BroadcastBus;
pub use config::{BroadcastConfig, EngineConfig, PersistenceConfig, QueueConfig};
pub use dispatcher::dispatch;
pub use error::EngineError;
pub use identity::IdentityRegistry;
pub use manager::{ApplyOutcome, OperationResult, StateManager};
pub use queue::{Batch, EnqueueOutcome, Priority, Update, UpdatePayload, UpdateQueue};
