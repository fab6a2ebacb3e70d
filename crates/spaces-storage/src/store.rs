// SPDX-License-Identifier: MIT

//! The Persistence Layer: WAL + snapshot + materialized state behind a
//! single-writer lock.
//!
//! `spec.md` §4.2 / §5: a single-writer lock serializes concurrent save
//! calls; readers proceed in parallel against the last-committed
//! `MaterializedState`. This module is that lock and the durability
//! pipeline behind it — the Update Queue and State Manager (in
//! `spaces-engine`) are the only callers.

use crate::bootstrap::{translate as translate_legacy_document, LegacySource};
use crate::checkpoint::{load_snapshot, Checkpointer};
use crate::migration::MigrationRegistry;
use crate::snapshot::{Snapshot, SnapshotError};
use crate::state::MaterializedState;
use crate::wal::{Wal, WalError};
use parking_lot::RwLock;
use spaces_core::Event;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("wal error: {0}")]
    Wal(#[from] WalError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// How often a checkpoint is taken and the WAL truncated behind it.
/// Expressed in committed events, matching the WAL's own flush cadence
/// rather than wall-clock time.
#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
    pub checkpoint_every: u64,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { checkpoint_every: 500 }
    }
}

/// Paths the store reads and writes. All three live side by side in the
/// same data directory in production; tests usually point them at a
/// shared temp dir.
#[derive(Debug, Clone)]
pub struct StorePaths {
    pub wal: PathBuf,
    pub snapshot: PathBuf,
}

impl StorePaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self { wal: dir.join("events.wal"), snapshot: dir.join("state.snap") }
    }
}

/// Opens the WAL and snapshot, replays everything into a
/// `MaterializedState`, and serializes further writes behind a lock.
///
/// Reads (`with_state`) take the lock in shared mode: many readers run
/// concurrently against the same committed state. Writes (`commit`) take
/// it exclusively, append-then-apply, and periodically checkpoint.
pub struct Store {
    paths: StorePaths,
    wal: RwLock<Wal>,
    state: RwLock<MaterializedState>,
    checkpointer: Checkpointer,
    migrations: MigrationRegistry,
    options: StoreOptions,
    since_checkpoint: RwLock<u64>,
}

impl Store {
    /// Open a store at `paths`, running recovery (snapshot load + WAL
    /// replay) synchronously. `migrations` should at minimum cover every
    /// schema version older than [`crate::CURRENT_SNAPSHOT_VERSION`].
    pub fn open(
        paths: StorePaths,
        migrations: MigrationRegistry,
        options: StoreOptions,
    ) -> Result<Self, StoreError> {
        let snapshot = load_snapshot(&paths.snapshot, &migrations)?;
        let (mut state, start_seq) = match snapshot {
            Some(snap) => (snap.state, snap.seq),
            None => (MaterializedState::default(), 0),
        };

        let mut wal = Wal::open(&paths.wal, start_seq)?;
        while let Some(entry) = wal.next_unprocessed()? {
            state.apply_event(&entry.event);
            wal.mark_processed(entry.seq);
        }

        info!(seq = wal.processed_seq(), "recovered workspace store");

        Ok(Self {
            checkpointer: Checkpointer::new(paths.snapshot.clone()),
            paths,
            wal: RwLock::new(wal),
            state: RwLock::new(state),
            migrations,
            options,
            since_checkpoint: RwLock::new(0),
        })
    }

    /// Re-read the snapshot and WAL from disk, replacing the in-memory
    /// state. For the observer-facing `Reload` request (`spec.md` §6):
    /// "re-read persistence after external edit" — another process wrote
    /// directly to the store's files and the State Manager's cached copy
    /// needs to catch up. Takes the same exclusive lock `commit` does, so
    /// a reload never races a concurrent write.
    pub fn reload(&self) -> Result<(), StoreError> {
        let snapshot = load_snapshot(&self.paths.snapshot, &self.migrations)?;
        let (mut state, start_seq) = match snapshot {
            Some(snap) => (snap.state, snap.seq),
            None => (MaterializedState::default(), 0),
        };

        let mut wal = Wal::open(&self.paths.wal, start_seq)?;
        while let Some(entry) = wal.next_unprocessed()? {
            state.apply_event(&entry.event);
            wal.mark_processed(entry.seq);
        }

        let mut wal_guard = self.wal.write();
        let mut state_guard = self.state.write();
        *wal_guard = wal;
        *state_guard = state;
        Ok(())
    }

    /// Run the one-shot legacy bootstrap if the store is empty and hasn't
    /// already run it. Non-fatal: a failed or absent legacy read just
    /// leaves the store empty, logged at `warn`.
    pub fn bootstrap_from_legacy(&self, source: &dyn LegacySource, now: u64) -> Result<(), StoreError> {
        {
            let state = self.state.read();
            if state.meta.bootstrap_done || !state.active_spaces.is_empty() || !state.closed_spaces.is_empty() {
                return Ok(());
            }
        }

        let Some(doc) = source.read_workspaces() else {
            warn!("no legacy workspaces document found; skipping bootstrap");
            self.mark_bootstrap_done()?;
            return Ok(());
        };

        let events = translate_legacy_document(doc, now);
        info!(count = events.len(), "bootstrapping workspaces from legacy store");
        self.commit(events)?;
        self.mark_bootstrap_done()
    }

    fn mark_bootstrap_done(&self) -> Result<(), StoreError> {
        let mut wal = self.wal.write();
        let mut state = self.state.write();
        // Not an `Event`: the bootstrap flag is store-internal bookkeeping,
        // not part of the replayable domain vocabulary.
        state.meta.bootstrap_done = true;
        wal.flush()?;
        Ok(())
    }

    /// Run `f` against the current committed state. Many calls may run
    /// concurrently; none of them block a concurrent `commit` from
    /// queuing, only from landing.
    pub fn with_state<R>(&self, f: impl FnOnce(&MaterializedState) -> R) -> R {
        f(&self.state.read())
    }

    /// Append and apply a batch of events atomically: either all land in
    /// the WAL and the materialized state, or (on WAL failure) none do.
    /// Takes the write lock for the whole batch so a caller's multi-event
    /// transition (e.g. close-then-delete) is never observed half-applied.
    pub fn commit(&self, events: Vec<Event>) -> Result<u64, StoreError> {
        let mut wal = self.wal.write();
        let mut state = self.state.write();

        // Append every event before applying any of them: a failure
        // partway through a multi-event batch (e.g. the
        // `[WorkspaceCreated, IdentityBound]` pair a single create/close/
        // restore produces) must not leave `state` ahead of the WAL.
        let mut last_seq = wal.processed_seq();
        let mut seqs = Vec::with_capacity(events.len());
        for event in &events {
            let seq = wal.append(event)?;
            seqs.push(seq);
            last_seq = seq;
        }
        if wal.needs_flush() || !events.is_empty() {
            wal.flush()?;
        }
        for (event, seq) in events.iter().zip(seqs) {
            state.apply_event(event);
            wal.mark_processed(seq);
        }
        drop(state);
        drop(wal);

        self.maybe_checkpoint(last_seq)?;
        Ok(last_seq)
    }

    fn maybe_checkpoint(&self, seq: u64) -> Result<(), StoreError> {
        let mut since = self.since_checkpoint.write();
        *since += 1;
        if *since < self.options.checkpoint_every {
            return Ok(());
        }
        *since = 0;
        drop(since);

        let state = self.state.read().clone();
        self.checkpointer.checkpoint(seq, &state)?;
        self.wal.write().truncate_before(seq + 1)?;
        Ok(())
    }

    /// Force a checkpoint and WAL truncation regardless of cadence. Used
    /// on clean shutdown.
    pub fn checkpoint_now(&self) -> Result<(), StoreError> {
        let seq = self.wal.read().processed_seq();
        let state = self.state.read().clone();
        self.checkpointer.checkpoint(seq, &state)?;
        self.wal.write().truncate_before(seq + 1)?;
        *self.since_checkpoint.write() = 0;
        Ok(())
    }

    /// Make the next [`Store::commit`] fail as if the WAL write had hit a
    /// storage error, without touching anything on disk. For exercising
    /// storage-failure propagation up through the State Manager.
    #[cfg(any(test, feature = "test-support"))]
    pub fn fail_next_wal_write(&self) {
        self.wal.write().fail_next_append();
    }

    /// An opaque export document: the full materialized state, versioned
    /// the same way a snapshot is. Import/Export Engine callers treat this
    /// as a black box, only round-tripping it through [`Store::import`].
    pub fn export(&self) -> Result<Vec<u8>, StoreError> {
        let state = self.state.read().clone();
        let seq = self.wal.read().processed_seq();
        Ok(Snapshot::new(seq, state, chrono::Utc::now()).encode()?)
    }

    /// Replace the entire store contents with a previously exported
    /// document, migrating it forward if needed. Recorded as a single
    /// synthetic checkpoint; the WAL is cleared since the import already
    /// represents fully-applied state.
    pub fn import(&self, document: &[u8]) -> Result<(), StoreError> {
        let snapshot = Snapshot::decode(document, &self.migrations)?;
        let mut wal = self.wal.write();
        let mut state = self.state.write();
        *state = snapshot.state;
        wal.truncate_before(u64::MAX)?;
        drop(state);
        drop(wal);
        self.checkpoint_now()
    }

    /// Clear all persisted state: active, closed, tabs, and the identity
    /// mapping. The bootstrap flag is left set, since re-running the
    /// legacy import after an explicit clear is never desired.
    pub fn clear(&self) -> Result<(), StoreError> {
        let mut state = self.state.write();
        let bootstrap_done = state.meta.bootstrap_done;
        *state = MaterializedState::default();
        state.meta.bootstrap_done = bootstrap_done;
        drop(state);
        self.wal.write().truncate_before(u64::MAX)?;
        self.checkpoint_now()
    }
}
