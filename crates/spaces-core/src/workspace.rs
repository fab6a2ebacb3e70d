// SPDX-License-Identifier: MIT

//! Workspace identifier and record.

use crate::window::WindowId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Opaque, stable identifier for a workspace; assigned at first sight
    /// and never reused, independent of any live host window.
    pub struct WorkspaceId("wsp-");
}

/// A named, ordered collection of URLs, bound to a live host window when
/// active and archived otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub permanent_id: WorkspaceId,
    pub display_name: String,
    /// True iff the user has explicitly set a name; disables auto-rename
    /// on tab change.
    pub is_named: bool,
    /// Ordered; duplicates allowed; order is user-observable.
    pub urls: Vec<String>,
    pub is_active: bool,
    /// Present iff `is_active`.
    pub window_id: Option<WindowId>,
    pub created_at: u64,
    pub last_used: u64,
    pub last_modified: u64,
    /// Incremented on every committed mutation.
    pub version: u64,
    /// Last host window that modified this workspace; used for
    /// broadcast-originator detection and idempotence.
    pub source_window_id: Option<WindowId>,
}

impl Workspace {
    /// True iff `is_active` and `window_id` agree, per the data-model
    /// invariant that the two are never in disagreement.
    pub fn is_consistent(&self) -> bool {
        self.is_active == self.window_id.is_some()
    }

    crate::setters! {
        into { display_name: String }
        set { is_named: bool, is_active: bool, version: u64 }
        option { window_id: WindowId, source_window_id: WindowId }
    }
}

crate::builder! {
    pub struct WorkspaceBuilder => Workspace {
        into { display_name: String = "Workspace" }
        set {
            is_named: bool = false,
            is_active: bool = true,
            version: u64 = 1,
            urls: Vec<String> = Vec::new(),
            created_at: u64 = 0,
            last_used: u64 = 0,
            last_modified: u64 = 0
        }
        option { window_id: WindowId = None, source_window_id: WindowId = None }
        computed { permanent_id: WorkspaceId = WorkspaceId::new() }
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
