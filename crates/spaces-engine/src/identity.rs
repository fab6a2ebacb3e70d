// SPDX-License-Identifier: MIT

//! Identity Registry (`spec.md` §4.1): ephemeral `window_id` <-> stable
//! `permanent_id`.
//!
//! Co-owned with the State Manager and mutated only within an apply batch
//! (§5 "Shared resources"); this type is the read/lookup half, backed by
//! whatever `meta.permanent_id_mappings` the [`spaces_storage::Store`]
//! last committed. The write half is just `Event::IdentityBound` /
//! `Event::IdentityUnbound`, applied through the normal commit path.

use spaces_core::{WindowId, WorkspaceId};
use spaces_storage::MaterializedState;

/// A read-only view over the identity mapping at a point in time.
pub struct IdentityRegistry<'a> {
    state: &'a MaterializedState,
}

impl<'a> IdentityRegistry<'a> {
    pub fn new(state: &'a MaterializedState) -> Self {
        Self { state }
    }

    pub fn lookup(&self, window_id: WindowId) -> Option<WorkspaceId> {
        self.state.meta.permanent_id_mappings.get(&window_id).copied()
    }

    /// Used by broadcast to skip (or specially flag) the originator.
    pub fn reverse_lookup(&self, permanent_id: &WorkspaceId) -> Option<WindowId> {
        self.state
            .meta
            .permanent_id_mappings
            .iter()
            .find(|(_, p)| *p == permanent_id)
            .map(|(w, _)| *w)
    }
}
