// SPDX-License-Identifier: MIT

//! Materialized state built from WAL replay.
//!
//! Four logical collections, exactly as `spec.md` §2/§6 names them:
//! `active_spaces`, `closed_spaces`, `tabs_by_space`, and `meta`.

mod meta;
mod workspaces;

pub use meta::{Meta, CURRENT_SCHEMA_VERSION};

use serde::{Deserialize, Serialize};
use spaces_core::{Event, Tab, Workspace, WorkspaceId};
use std::collections::HashMap;

/// The single in-memory snapshot of everything on disk. Derived entirely
/// from the event log; a fresh `MaterializedState::default()` plus
/// `apply_event` for every WAL entry in order reconstructs it exactly.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MaterializedState {
    pub active_spaces: HashMap<WorkspaceId, Workspace>,
    pub closed_spaces: HashMap<WorkspaceId, Workspace>,
    pub tabs_by_space: HashMap<WorkspaceId, Vec<Tab>>,
    #[serde(default)]
    pub meta: Meta,
}

impl MaterializedState {
    /// Look up a workspace regardless of which collection it lives in.
    pub fn get(&self, id: &WorkspaceId) -> Option<&Workspace> {
        self.active_spaces.get(id).or_else(|| self.closed_spaces.get(id))
    }

    /// Reassemble a closed workspace's `urls` from `tabs_by_space`, sorted
    /// by `index` ascending — the fidelity invariant in `spec.md` §3.
    pub fn closed_urls(&self, id: &WorkspaceId) -> Vec<String> {
        let mut tabs: Vec<&Tab> = self.tabs_by_space.get(id).map(|v| v.iter().collect()).unwrap_or_default();
        tabs.sort_by_key(|t| t.index);
        tabs.into_iter().map(|t| t.url.clone()).collect()
    }

    /// Apply one committed event. Dispatches by domain; today there is
    /// only the workspace domain, but the match stays exhaustive so a new
    /// `Event` variant is a compile error here until handled.
    pub fn apply_event(&mut self, event: &Event) {
        match event {
            Event::WorkspaceCreated { .. }
            | Event::TabsUpdated { .. }
            | Event::Renamed { .. }
            | Event::Closed { .. }
            | Event::Restored { .. }
            | Event::Deleted { .. } => workspaces::apply(self, event),

            Event::IdentityBound { window_id, permanent_id } => {
                self.meta.permanent_id_mappings.insert(*window_id, *permanent_id);
            }
            Event::IdentityUnbound { window_id } => {
                self.meta.permanent_id_mappings.remove(window_id);
            }
        }
    }
}

#[cfg(test)]
#[path = "../state_tests.rs"]
mod tests;
