// SPDX-License-Identifier: MIT

//! Update Queue (`spec.md` §4.3): validates mutation requests at the
//! boundary, batches them on a debounce window, and hands batches to the
//! State Manager in priority order.
//!
//! This module is synchronous and holds no timer itself — `spec.md` §9
//! treats the debounce as "schedule drain at now+δ, reset on each
//! enqueue", implementable as a cooperative task or a timer handle held
//! by the caller. [`UpdateQueue::enqueue`] reports the deadline the
//! caller should sleep until; [`manager::StateManager`](crate::manager)'s
//! driver loop owns the actual `tokio::time::sleep`.

use crate::config::QueueConfig;
use crate::error::EngineError;
use spaces_core::{WindowId, WorkspaceId};
use spaces_wire::{ExportDocument, ImportOptions};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Priority, ascending = more urgent. `System` is reserved for internal
/// housekeeping (e.g. retention pruning); observer-issued updates default
/// to `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    System = 1,
    High = 2,
    Normal = 3,
    Low = 4,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

/// The mutation kinds an update can carry. Each maps directly onto one
/// [`crate::manager::StateManager`] operation.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdatePayload {
    CreateWorkspace { window_id: WindowId, seed_urls: Vec<String> },
    UpdateTabs { window_id: WindowId, urls: Vec<String> },
    Rename { permanent_id: WorkspaceId, name: String },
    Close { window_id: WindowId },
    Restore { permanent_id: WorkspaceId },
    DeleteClosed { permanent_id: WorkspaceId },
    Import { doc: Box<ExportDocument>, options: ImportOptions },
}

impl UpdatePayload {
    fn kind(&self) -> &'static str {
        match self {
            UpdatePayload::CreateWorkspace { .. } => "create_workspace",
            UpdatePayload::UpdateTabs { .. } => "update_tabs",
            UpdatePayload::Rename { .. } => "rename",
            UpdatePayload::Close { .. } => "close",
            UpdatePayload::Restore { .. } => "restore",
            UpdatePayload::DeleteClosed { .. } => "delete_closed",
            UpdatePayload::Import { .. } => "import",
        }
    }
}

/// One request handed to [`UpdateQueue::enqueue`].
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub id: String,
    pub payload: UpdatePayload,
    pub priority: Priority,
}

impl Update {
    pub fn new(id: impl Into<String>, payload: UpdatePayload) -> Self {
        Self { id: id.into(), payload, priority: Priority::Normal }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

#[derive(Debug, Clone)]
struct QueuedUpdate {
    seq: u64,
    update: Update,
}

/// A batch taken from the queue by [`UpdateQueue::drain_batch`]. Opaque to
/// the caller except for its updates, so [`UpdateQueue::rollback`] can put
/// the exact original entries back at the head on `BatchRejected`.
#[derive(Debug, Clone)]
pub struct Batch {
    entries: Vec<QueuedUpdate>,
}

impl Batch {
    pub fn updates(&self) -> impl Iterator<Item = &Update> {
        self.entries.iter().map(|e| &e.update)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether the caller must synchronously drain before (or instead of)
/// accepting further updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnqueueOutcome {
    pub saturated: bool,
}

pub struct UpdateQueue {
    config: QueueConfig,
    entries: VecDeque<QueuedUpdate>,
    next_seq: u64,
    deadline: Option<Instant>,
}

impl UpdateQueue {
    pub fn new(config: QueueConfig) -> Self {
        Self { config, entries: VecDeque::new(), next_seq: 0, deadline: None }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the queue is already at `max_queue_size`, i.e. the next
    /// `enqueue` must be preceded by a synchronous drain.
    pub fn is_saturated(&self) -> bool {
        self.entries.len() >= self.config.max_queue_size
    }

    /// Validate and accept one update. Resets the debounce deadline to
    /// `now + debounce_time`. Returns whether the queue is now at/over
    /// `max_queue_size`, signaling the caller to drain synchronously
    /// before anything else is accepted (§4.3 "Bounded queue").
    pub fn enqueue(&mut self, update: Update) -> Result<EnqueueOutcome, EngineError> {
        if self.config.validate {
            validate_entry(&update)?;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push_back(QueuedUpdate { seq, update });
        self.deadline = Some(Instant::now() + Duration::from_millis(self.config.debounce_time_ms));

        Ok(EnqueueOutcome { saturated: self.entries.len() >= self.config.max_queue_size })
    }

    /// The instant the caller should wake up and drain, if any updates
    /// are pending. `None` when the queue is empty.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Remove every pending update, sorted by priority ascending (ties by
    /// enqueue order), ready for the State Manager's apply-batch.
    pub fn drain_batch(&mut self) -> Batch {
        let mut entries: Vec<QueuedUpdate> = self.entries.drain(..).collect();
        entries.sort_by(|a, b| {
            (a.update.priority as u8, a.seq).cmp(&(b.update.priority as u8, b.seq))
        });
        self.deadline = None;
        Batch { entries }
    }

    /// Restore a batch to the head of the queue, ahead of anything
    /// enqueued since the drain, and re-arm the debounce deadline. Used
    /// when the State Manager reports `BatchRejected`.
    pub fn rollback(&mut self, batch: Batch) {
        for entry in batch.entries.into_iter().rev() {
            self.entries.push_front(entry);
        }
        if !self.entries.is_empty() {
            self.deadline = Some(Instant::now() + Duration::from_millis(self.config.debounce_time_ms));
        }
    }
}

fn validate_entry(update: &Update) -> Result<(), EngineError> {
    if update.id.trim().is_empty() {
        return Err(EngineError::InvalidUpdate("update id must not be empty".into()));
    }
    match &update.payload {
        UpdatePayload::Rename { name, .. } if name.trim().is_empty() => {
            Err(EngineError::InvalidUpdate(format!(
                "{}: rename payload requires a non-empty name",
                update.payload.kind()
            )))
        }
        UpdatePayload::CreateWorkspace { .. }
        | UpdatePayload::UpdateTabs { .. }
        | UpdatePayload::Rename { .. }
        | UpdatePayload::Close { .. }
        | UpdatePayload::Restore { .. }
        | UpdatePayload::DeleteClosed { .. }
        | UpdatePayload::Import { .. } => Ok(()),
    }
}
