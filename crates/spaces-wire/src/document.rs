// SPDX-License-Identifier: MIT

//! The import/export document schema (`spec.md` §4.6 / §6). Only the
//! shape lives here; validating it and feeding it through the apply path
//! is `spaces-engine::import_export`'s job.

use serde::{Deserialize, Serialize};
use spaces_core::WorkspaceId;
use std::collections::HashMap;

/// One workspace as it appears in an export document: just enough to
/// reconstruct a `WorkspaceCreated` event, not the full internal record
/// (no `window_id`, no timestamps — those are live-session concepts).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkspaceRecord {
    pub permanent_id: WorkspaceId,
    pub display_name: String,
    #[serde(default)]
    pub is_named: bool,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SpacesSection {
    #[serde(default)]
    pub active: HashMap<WorkspaceId, WorkspaceRecord>,
    #[serde(default)]
    pub closed: HashMap<WorkspaceId, WorkspaceRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportMetadata {
    pub exported_by: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// The top-level document: `{version, timestamp, spaces, metadata}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportDocument {
    /// `N.N.N`, validated by the importer, not by this type.
    pub version: String,
    /// Milliseconds since epoch.
    pub timestamp: u64,
    pub spaces: SpacesSection,
    pub metadata: ExportMetadata,
}

/// Import behavior flags (`spec.md` §4.6 "Options").
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ImportOptions {
    /// Validate only; never apply.
    #[serde(default)]
    pub validate_only: bool,
    /// Overwrite collisions instead of merging (merge never deletes
    /// existing workspaces; replace cascades tab-record deletion for any
    /// workspace it overwrites).
    #[serde(default)]
    pub replace_existing: bool,
}

/// Per-record counts returned in `ImportCompleted`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ImportedCounts {
    pub active: usize,
    pub closed: usize,
}

/// One validation failure against a specific record or top-level field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportFieldError {
    /// `"spaces.active.<permanent_id>.urls"`-style path, or a top-level
    /// field name for document-shape errors.
    pub field: String,
    pub message: String,
}
