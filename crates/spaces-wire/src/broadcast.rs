// SPDX-License-Identifier: MIT

use crate::document::{ImportFieldError, ImportedCounts};
use crate::snapshot::StateSnapshot;
use serde::{Deserialize, Serialize};
use spaces_core::WorkspaceId;

/// Outbound broadcast-bus messages (`spec.md` §4.5 / §6).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Broadcast {
    /// Sent after every successful apply. `touched` is the set of
    /// `permanent_id`s the committed batch affected, used by the UI to
    /// avoid re-rendering everything on every update.
    StateUpdated { snapshot: StateSnapshot, touched: Vec<WorkspaceId> },
    ImportCompleted { imported_counts: ImportedCounts, errors: Vec<ImportFieldError> },
}
