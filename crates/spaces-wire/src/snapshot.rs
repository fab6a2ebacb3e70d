// SPDX-License-Identifier: MIT

//! The full-state snapshot carried by every `StateUpdated` broadcast and
//! returned by `GetSpaces`/`Response::Spaces`.

use serde::{Deserialize, Serialize};
use spaces_core::{Workspace, WorkspaceId};

/// A point-in-time view of both collections. Not a patch: `spec.md` §4.5
/// requires subscribers receive the full current snapshot on every
/// successful apply, so observers can always fully resync from one
/// message instead of needing to track deltas themselves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateSnapshot {
    pub active: Vec<Workspace>,
    pub closed: Vec<Workspace>,
}

impl StateSnapshot {
    pub fn new(active: Vec<Workspace>, closed: Vec<Workspace>) -> Self {
        Self { active, closed }
    }

    pub fn find(&self, id: &WorkspaceId) -> Option<&Workspace> {
        self.active.iter().chain(self.closed.iter()).find(|w| &w.permanent_id == id)
    }
}
