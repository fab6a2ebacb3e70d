// SPDX-License-Identifier: MIT

//! Atomic snapshot writes and loads.

use crate::backup::rotate_bak_path;
use crate::migration::MigrationRegistry;
use crate::snapshot::{Snapshot, SnapshotError};
use crate::state::MaterializedState;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Writes snapshots to a fixed path, atomically (write-then-rename) and
/// with the previous snapshot rotated to `.bak` rather than clobbered.
pub struct Checkpointer {
    path: PathBuf,
}

impl Checkpointer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a snapshot of `state` at WAL sequence `seq`. The previous
    /// snapshot file, if any, is rotated to `.bak` before the new one
    /// replaces it.
    pub fn checkpoint(&self, seq: u64, state: &MaterializedState) -> Result<(), SnapshotError> {
        let snapshot = Snapshot::new(seq, state.clone(), Utc::now());
        let bytes = snapshot.encode()?;

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, &bytes)?;

        if self.path.exists() {
            let bak = rotate_bak_path(&self.path);
            std::fs::rename(&self.path, &bak)?;
        }
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Load the snapshot at this path, if one exists.
    pub fn load(&self, migrations: &MigrationRegistry) -> Result<Option<Snapshot>, SnapshotError> {
        load_snapshot(&self.path, migrations)
    }
}

/// Free function so recovery can load a snapshot without constructing a
/// full [`Checkpointer`] (used by the legacy bootstrap path, which never
/// writes one).
pub fn load_snapshot(
    path: &Path,
    migrations: &MigrationRegistry,
) -> Result<Option<Snapshot>, SnapshotError> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = std::fs::read(path)?;
    Ok(Some(Snapshot::decode(&bytes, migrations)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let checkpointer = Checkpointer::new(dir.path().join("state.snap"));
        let registry = MigrationRegistry::new();

        assert!(checkpointer.load(&registry).unwrap().is_none());

        checkpointer.checkpoint(5, &MaterializedState::default()).unwrap();
        let snap = checkpointer.load(&registry).unwrap().unwrap();
        assert_eq!(snap.seq, 5);
    }

    #[test]
    fn second_checkpoint_rotates_first_to_bak() {
        let dir = tempfile::tempdir().unwrap();
        let checkpointer = Checkpointer::new(dir.path().join("state.snap"));

        checkpointer.checkpoint(1, &MaterializedState::default()).unwrap();
        checkpointer.checkpoint(2, &MaterializedState::default()).unwrap();

        assert!(checkpointer.path().with_extension("bak").exists());
        let registry = MigrationRegistry::new();
        let snap = checkpointer.load(&registry).unwrap().unwrap();
        assert_eq!(snap.seq, 2);
    }
}
