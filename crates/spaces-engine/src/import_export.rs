// SPDX-License-Identifier: MIT

//! Import/Export Engine (`spec.md` §4.6).
//!
//! Produces and consumes the observer-facing transfer schema
//! (`spaces_wire::ExportDocument`) — distinct from
//! [`spaces_storage::Store::export`]'s internal, zstd-compressed backup
//! blob, which round-trips the *whole* store including live `window_id`s
//! and is never meant to move between installs. Import validates a
//! document, then translates it into the same `Event` vocabulary live
//! edits use, so there is no separate apply path past this point.

use crate::error::EngineError;
use spaces_core::{validate_url, Event, WorkspaceId};
use spaces_storage::MaterializedState;
use spaces_wire::{
    ExportDocument, ExportMetadata, ImportFieldError, ImportOptions, ImportedCounts,
    SpacesSection, WorkspaceRecord,
};
use std::collections::{HashMap, HashSet};

pub const CURRENT_EXPORT_VERSION: &str = "1.0.0";

/// The result of validating and translating an import document: the
/// events to commit (empty under `validate_only`), per-collection counts
/// of records actually accepted, and field errors for the rest.
pub struct ImportPlan {
    pub events: Vec<Event>,
    pub touched: Vec<WorkspaceId>,
    pub counts: ImportedCounts,
    pub errors: Vec<ImportFieldError>,
}

/// Validate `doc` against `working` and translate it into events.
///
/// A structurally invalid document (a malformed `version`) always fails
/// the whole batch via `EngineError::InvalidDocument`. Per-record handling
/// then depends on `options.replace_existing` (`spec.md` §4.6 and §7 "no
/// partial imports under `replace_existing`, per-record skip under
/// merge"): under merge, a bad record is skipped and reported in `errors`
/// while the rest of the document still imports; under `replace_existing`,
/// any single record error aborts the entire import atomically, since a
/// partial replace could otherwise clobber some records while leaving
/// others untouched.
pub fn plan_import(
    working: &MaterializedState,
    doc: &ExportDocument,
    options: &ImportOptions,
    now: u64,
) -> Result<ImportPlan, EngineError> {
    validate_version(&doc.version).map_err(EngineError::InvalidDocument)?;

    let mut events = Vec::new();
    let mut touched = Vec::new();
    let mut errors = Vec::new();
    let mut counts = ImportedCounts::default();

    for (permanent_id, record) in &doc.spaces.active {
        match plan_record(working, *permanent_id, record, true, options, now) {
            Ok(Some(record_events)) => {
                events.extend(record_events);
                touched.push(*permanent_id);
                counts.active += 1;
            }
            Ok(None) => {}
            Err(err) if options.replace_existing => return Err(abort_on_record_error(err)),
            Err(err) => errors.push(err),
        }
    }
    for (permanent_id, record) in &doc.spaces.closed {
        match plan_record(working, *permanent_id, record, false, options, now) {
            Ok(Some(record_events)) => {
                events.extend(record_events);
                touched.push(*permanent_id);
                counts.closed += 1;
            }
            Ok(None) => {}
            Err(err) if options.replace_existing => return Err(abort_on_record_error(err)),
            Err(err) => errors.push(err),
        }
    }

    if options.validate_only {
        return Ok(ImportPlan { events: Vec::new(), touched: Vec::new(), counts, errors });
    }

    Ok(ImportPlan { events, touched, counts, errors })
}

fn abort_on_record_error(err: ImportFieldError) -> EngineError {
    EngineError::InvalidDocument(format!("{}: {}", err.field, err.message))
}

fn plan_record(
    working: &MaterializedState,
    permanent_id: WorkspaceId,
    record: &WorkspaceRecord,
    active: bool,
    options: &ImportOptions,
    now: u64,
) -> Result<Option<Vec<Event>>, ImportFieldError> {
    let field_prefix = if active { "spaces.active" } else { "spaces.closed" };

    if record.display_name.trim().is_empty() {
        return Err(ImportFieldError {
            field: format!("{field_prefix}.{permanent_id}.display_name"),
            message: "display name must not be empty".into(),
        });
    }
    for url in &record.urls {
        if let Err(e) = validate_url(url) {
            return Err(ImportFieldError {
                field: format!("{field_prefix}.{permanent_id}.urls"),
                message: e.to_string(),
            });
        }
    }

    let mut events = Vec::new();
    match working.get(&permanent_id) {
        Some(existing) if existing.is_active => {
            // A live workspace is bound to a real host window; import never
            // overwrites it, merge or replace, since doing so would desync
            // the persisted record from what the host actually has open.
            if options.replace_existing {
                return Err(ImportFieldError {
                    field: format!("{field_prefix}.{permanent_id}"),
                    message: "workspace is active; replace_existing does not override live workspaces".into(),
                });
            }
            return Ok(None);
        }
        Some(_) if options.replace_existing => {
            events.push(Event::Deleted { permanent_id });
        }
        Some(_) => return Ok(None), // merge never overwrites an existing closed workspace
        None => {}
    }

    events.push(Event::WorkspaceCreated {
        permanent_id,
        window_id: None,
        urls: dedupe_urls(&record.urls),
        display_name: record.display_name.clone(),
        is_named: record.is_named,
        created_at: now,
    });

    Ok(Some(events))
}

/// Collapse duplicate URLs on import, preserving first-seen order.
/// Supplemented feature: the live edit path never needs this, since the
/// host is the source of truth for whatever duplicates a user's tabs
/// actually contain.
fn dedupe_urls(urls: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.iter().filter(|u| seen.insert((*u).clone())).cloned().collect()
}

fn validate_version(version: &str) -> Result<(), String> {
    let parts: Vec<&str> = version.split('.').collect();
    let well_formed = parts.len() == 3 && parts.iter().all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
    if well_formed {
        Ok(())
    } else {
        Err(format!("version {version:?} is not of the form N.N.N"))
    }
}

/// Build the observer-facing export document from the current state.
pub fn build_export_document(
    state: &MaterializedState,
    now: u64,
    exported_by: impl Into<String>,
) -> ExportDocument {
    let mut active: HashMap<WorkspaceId, WorkspaceRecord> = HashMap::new();
    for (id, ws) in &state.active_spaces {
        active.insert(
            *id,
            WorkspaceRecord {
                permanent_id: *id,
                display_name: ws.display_name.clone(),
                is_named: ws.is_named,
                urls: ws.urls.clone(),
            },
        );
    }
    let mut closed: HashMap<WorkspaceId, WorkspaceRecord> = HashMap::new();
    for (id, ws) in &state.closed_spaces {
        closed.insert(
            *id,
            WorkspaceRecord {
                permanent_id: *id,
                display_name: ws.display_name.clone(),
                is_named: ws.is_named,
                urls: state.closed_urls(id),
            },
        );
    }

    ExportDocument {
        version: CURRENT_EXPORT_VERSION.to_string(),
        timestamp: now,
        spaces: SpacesSection { active, closed },
        metadata: ExportMetadata { exported_by: exported_by.into(), description: None },
    }
}
