// SPDX-License-Identifier: MIT

//! Tab record: the child entity backing a workspace's URL list on disk.

use crate::define_id;
use crate::workspace::WorkspaceId;
use serde::{Deserialize, Serialize};

define_id! {
    /// Identifier for a single persisted tab row.
    ///
    /// Fresh on every close/restore cycle; stability across that boundary is
    /// not observable to any consumer (see `DESIGN.md`).
    pub struct TabId("tab-");
}

/// Which collection a tab row belongs to, mirroring the workspace it came
/// from. Active-workspace tabs are only persisted once a workspace grows
/// large enough that keeping the full list inline stops being cheap; closed
/// workspaces always persist their tabs this way (`spec.md` §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabKind {
    Active,
    Closed,
}

/// A single URL entry belonging to a workspace, ordered by `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub tab_id: TabId,
    pub permanent_id: WorkspaceId,
    pub kind: TabKind,
    pub url: String,
    /// Position within the workspace's `urls` list; ascending order is the
    /// source of truth for reassembly on load.
    pub index: u32,
    pub created_at: u64,
}

#[cfg(test)]
#[path = "tab_tests.rs"]
mod tests;
