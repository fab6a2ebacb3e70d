// SPDX-License-Identifier: MIT

//! Snapshot persistence for crash recovery.
//!
//! A snapshot captures the complete [`MaterializedState`] at a point in
//! time, tagged with the WAL sequence number it was taken at. Recovery
//! loads the snapshot (migrating it forward if its schema is older than
//! [`CURRENT_SNAPSHOT_VERSION`]) and replays only the WAL entries after
//! that sequence, instead of the whole log.

use crate::migration::{MigrationError, MigrationRegistry};
use crate::state::MaterializedState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("migration error: {0}")]
    Migration(#[from] MigrationError),
}

/// A point-in-time capture of [`MaterializedState`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "v")]
    pub version: u32,
    /// WAL sequence number at the time of snapshot.
    pub seq: u64,
    pub state: MaterializedState,
    pub created_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(seq: u64, state: MaterializedState, created_at: DateTime<Utc>) -> Self {
        Self { version: CURRENT_SNAPSHOT_VERSION, seq, state, created_at }
    }

    /// Compressed-JSON bytes, via zstd, ready to write to disk.
    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        let json = serde_json::to_vec(self)?;
        Ok(zstd::encode_all(json.as_slice(), 0)?)
    }

    /// Decode bytes written by [`Snapshot::encode`], migrating forward if
    /// the embedded version is older than [`CURRENT_SNAPSHOT_VERSION`].
    pub fn decode(bytes: &[u8], migrations: &MigrationRegistry) -> Result<Self, SnapshotError> {
        let json = zstd::decode_all(bytes)?;
        let value: serde_json::Value = serde_json::from_slice(&json)?;
        let migrated = migrations.migrate_to(value, CURRENT_SNAPSHOT_VERSION)?;
        Ok(serde_json::from_value(migrated)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_encode_decode() {
        let snap = Snapshot::new(7, MaterializedState::default(), Utc::now());
        let bytes = snap.encode().unwrap();
        let registry = MigrationRegistry::new();
        let back = Snapshot::decode(&bytes, &registry).unwrap();
        assert_eq!(back.seq, 7);
        assert_eq!(back.version, CURRENT_SNAPSHOT_VERSION);
    }
}
