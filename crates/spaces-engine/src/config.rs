// SPDX-License-Identifier: MIT

//! Engine configuration (`spec.md` §6 "Configuration"). Loads from TOML
//! the way the teacher's daemon config does, with every field defaulted
//! so a missing file is never fatal.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QueueConfig {
    /// Debounce window, milliseconds. A drain is scheduled this far out
    /// from the most recent `enqueue`; each new `enqueue` resets it.
    pub debounce_time_ms: u64,
    /// Drain is triggered synchronously the moment the queue reaches this
    /// many pending updates.
    pub max_queue_size: usize,
    /// Whether `enqueue` validates payload shape against the per-`kind`
    /// schema before accepting. Disabling is only meaningful in tests
    /// that want to exercise `BatchRejected` further downstream instead.
    pub validate: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { debounce_time_ms: 50, max_queue_size: 256, validate: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PersistenceConfig {
    pub schema_version: u32,
    pub checkpoint_every: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self { schema_version: spaces_storage::CURRENT_SCHEMA_VERSION, checkpoint_every: 500 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Retry a failed delivery once before skipping the subscriber.
    /// `spec.md` §6 default is `false`: best-effort, no retry.
    pub retry: bool,
}

/// Top-level engine configuration. Mirrors the teacher's config structs:
/// serde + `Default`, loadable from TOML, every field independently
/// defaulted so partial config files are never a hard error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub queue: QueueConfig,
    pub persistence: PersistenceConfig,
    pub broadcast: BroadcastConfig,
    /// Cap on retained closed workspaces; the oldest beyond this are
    /// pruned (by `last_modified`) with a cascade `WorkspaceDeleted`.
    /// Supplemented feature, not named in `spec.md` itself.
    pub max_closed_workspaces: usize,
    /// Whether `restore_workspace` also focuses the newly created window.
    /// Open Question in `spec.md` §9; decided here as an explicit,
    /// configurable default of `false` (see `DESIGN.md`).
    pub restore_focus: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            queue: QueueConfig::default(),
            persistence: PersistenceConfig::default(),
            broadcast: BroadcastConfig::default(),
            max_closed_workspaces: 50,
            restore_focus: false,
        }
    }
}

impl EngineConfig {
    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}
