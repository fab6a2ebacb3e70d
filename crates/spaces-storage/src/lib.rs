// SPDX-License-Identifier: MIT

//! Durable persistence for workspace state: write-ahead log, periodic
//! snapshots, schema migration, and the one-shot legacy bootstrap.

mod backup;
mod bootstrap;
mod checkpoint;
mod migration;
mod snapshot;
mod state;
mod store;
mod wal;

pub use bootstrap::{translate as translate_legacy_document, LegacyJsonFile, LegacySource};
pub use checkpoint::{load_snapshot, Checkpointer};
pub use migration::{Migration, MigrationError, MigrationRegistry};
pub use snapshot::{Snapshot, SnapshotError, CURRENT_SNAPSHOT_VERSION};
pub use state::{MaterializedState, Meta, CURRENT_SCHEMA_VERSION};
pub use store::{Store, StoreError, StoreOptions, StorePaths};
pub use wal::{Wal, WalEntry, WalError};
