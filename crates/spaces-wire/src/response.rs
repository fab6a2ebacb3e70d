// SPDX-License-Identifier: MIT

use crate::document::{ExportDocument, ImportFieldError, ImportedCounts};
use crate::snapshot::StateSnapshot;
use serde::{Deserialize, Serialize};
use spaces_core::WindowId;

/// Reply to an [`crate::ObserverRequest`] (`spec.md` §4.7).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    Ok,
    Spaces { snapshot: StateSnapshot },
    Exported { doc: Box<ExportDocument> },
    Imported { imported_counts: ImportedCounts, errors: Vec<ImportFieldError> },
    Restored { window_id: WindowId },
    Error { message: String },
}
