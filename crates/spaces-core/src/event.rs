// SPDX-License-Identifier: MIT

//! The mutation vocabulary shared by live edits and import.
//!
//! Every write the State Manager ever commits — whether it came from a host
//! event, an observer command, or the Import/Export Engine replaying a
//! document — is expressed as one of these. They are what gets appended to
//! the write-ahead log and replayed into [`crate::workspace::Workspace`]
//! state; nothing touches persistence through any other path.
//!
//! Serializes as `{"type": "workspace:created", ...}`; unknown tags are a
//! deserialization error rather than silently dropped, since (unlike a
//! long-lived host event stream) nothing here is ever produced by a version
//! of this crate that the reader doesn't also have.

use crate::window::WindowId;
use crate::workspace::WorkspaceId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A workspace came into being: either a previously-unseen host window
    /// or an imported record.
    #[serde(rename = "workspace:created")]
    WorkspaceCreated {
        permanent_id: WorkspaceId,
        window_id: Option<WindowId>,
        urls: Vec<String>,
        display_name: String,
        is_named: bool,
        created_at: u64,
    },

    /// The host reported a new, ordered truth for a workspace's tabs.
    #[serde(rename = "workspace:tabs_updated")]
    TabsUpdated {
        permanent_id: WorkspaceId,
        urls: Vec<String>,
        /// Auto-derived name to apply when the workspace is not `is_named`.
        /// Computed by the caller so replay never re-derives against a
        /// different `name::derive_name` implementation than the one that
        /// produced the original commit.
        auto_name: String,
        modified_at: u64,
    },

    /// A user- or import-sourced rename, already trimmed and collapsed.
    #[serde(rename = "workspace:renamed")]
    Renamed {
        permanent_id: WorkspaceId,
        display_name: String,
        modified_at: u64,
    },

    /// A host window closed; the workspace moves active -> closed.
    #[serde(rename = "workspace:closed")]
    Closed {
        permanent_id: WorkspaceId,
        modified_at: u64,
    },

    /// A closed workspace is bound to a freshly created host window and
    /// moves closed -> active. `window_id` is always new; see
    /// `spec.md` §4.4 Restore ordering.
    #[serde(rename = "workspace:restored")]
    Restored {
        permanent_id: WorkspaceId,
        window_id: WindowId,
        modified_at: u64,
    },

    /// Permanent removal from the closed collection (and its tab rows).
    #[serde(rename = "workspace:deleted")]
    Deleted { permanent_id: WorkspaceId },

    /// `window_id` now maps to `permanent_id`. Idempotent; overwrites any
    /// prior mapping for `window_id`.
    #[serde(rename = "identity:bound")]
    IdentityBound {
        window_id: WindowId,
        permanent_id: WorkspaceId,
    },

    /// The window closed; `window_id` no longer maps to anything. The
    /// workspace's `permanent_id` is untouched.
    #[serde(rename = "identity:unbound")]
    IdentityUnbound { window_id: WindowId },
}

impl Event {
    /// The workspace this event is about, for broadcast's `touched` set.
    pub fn permanent_id(&self) -> Option<&WorkspaceId> {
        match self {
            Event::WorkspaceCreated { permanent_id, .. }
            | Event::TabsUpdated { permanent_id, .. }
            | Event::Renamed { permanent_id, .. }
            | Event::Closed { permanent_id, .. }
            | Event::Restored { permanent_id, .. }
            | Event::Deleted { permanent_id } => Some(permanent_id),
            Event::IdentityBound { .. } | Event::IdentityUnbound { .. } => None,
        }
    }

    /// Short tag for log lines, mirroring the `{type} id={id}` shape used
    /// throughout the rest of this family of crates.
    pub fn log_summary(&self) -> String {
        match self {
            Event::WorkspaceCreated { permanent_id, .. } => {
                format!("workspace:created id={permanent_id}")
            }
            Event::TabsUpdated { permanent_id, .. } => {
                format!("workspace:tabs_updated id={permanent_id}")
            }
            Event::Renamed { permanent_id, .. } => format!("workspace:renamed id={permanent_id}"),
            Event::Closed { permanent_id, .. } => format!("workspace:closed id={permanent_id}"),
            Event::Restored { permanent_id, window_id, .. } => {
                format!("workspace:restored id={permanent_id} window={window_id}")
            }
            Event::Deleted { permanent_id } => format!("workspace:deleted id={permanent_id}"),
            Event::IdentityBound { window_id, permanent_id } => {
                format!("identity:bound window={window_id} id={permanent_id}")
            }
            Event::IdentityUnbound { window_id } => format!("identity:unbound window={window_id}"),
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
