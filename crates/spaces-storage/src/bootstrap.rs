// SPDX-License-Identifier: MIT

//! One-shot legacy-store import.
//!
//! `spec.md` §4.2: "on first load, if the indexed store is empty but a
//! legacy key-value store contains a `workspaces` document matching the
//! prior schema, translate and import it once; set a meta flag to prevent
//! re-bootstrap. Failure of the legacy read is non-fatal."
//!
//! The legacy document shape (one flat JSON object, keyed by the
//! browser's window id as a string) is what `original_source` described
//! before the extension moved to today's indexed, permanent-id-keyed
//! store; see `DESIGN.md` for the exact mapping this module assumes.

use serde::Deserialize;
use spaces_core::{Event, WindowId, WorkspaceId};
use std::path::Path;

/// Abstraction over "the old storage", so tests don't need a real browser
/// extension storage API. A production host adapter backs this with
/// whatever local key-value store the legacy version used.
pub trait LegacySource {
    /// Returns the raw `workspaces` document, if the legacy store has one.
    fn read_workspaces(&self) -> Option<serde_json::Value>;
}

/// Reads the legacy document from a plain JSON file on disk (the shape a
/// host integration would dump chrome.storage.local into for migration).
pub struct LegacyJsonFile {
    path: std::path::PathBuf,
}

impl LegacyJsonFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl LegacySource for LegacyJsonFile {
    fn read_workspaces(&self) -> Option<serde_json::Value> {
        let bytes = std::fs::read(&self.path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

#[derive(Debug, Deserialize)]
struct LegacyWorkspace {
    name: Option<String>,
    urls: Vec<String>,
    #[serde(default)]
    closed: bool,
    #[serde(default)]
    named: bool,
}

#[derive(Debug, Deserialize)]
struct LegacyDocument {
    workspaces: std::collections::HashMap<String, LegacyWorkspace>,
}

/// Translate a legacy document into the `Event` batch that would have
/// produced the same state, had it been created through today's code
/// path. Returns an empty vec (not an error) for anything malformed — a
/// best-effort migration is strictly better than blocking startup.
pub fn translate(doc: serde_json::Value, now: u64) -> Vec<Event> {
    let Ok(doc) = serde_json::from_value::<LegacyDocument>(doc) else {
        return Vec::new();
    };

    let mut events = Vec::new();
    for (window_key, legacy) in doc.workspaces {
        let permanent_id = WorkspaceId::new();
        let display_name = legacy
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| spaces_core::derive_name(&legacy.urls));

        let window_id = if legacy.closed {
            None
        } else {
            window_key.parse::<i32>().ok().map(WindowId::new)
        };

        events.push(Event::WorkspaceCreated {
            permanent_id,
            window_id,
            urls: legacy.urls,
            display_name,
            is_named: legacy.named,
            created_at: now,
        });

        if let Some(window_id) = window_id {
            events.push(Event::IdentityBound { window_id, permanent_id });
        }
    }
    events
}
