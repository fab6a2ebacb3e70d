// SPDX-License-Identifier: MIT

//! Inbound observer requests (`spec.md` §6 "Observer Requests").

use crate::document::{ExportDocument, ImportOptions};
use serde::{Deserialize, Serialize};
use spaces_core::{WindowId, WorkspaceId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ObserverRequest {
    GetSpaces,
    RenameSpace { permanent_id: WorkspaceId, name: String },
    CloseSpace { window_id: WindowId },
    RestoreSpace { permanent_id: WorkspaceId },
    DeleteClosed { permanent_id: WorkspaceId },
    ImportDocument { doc: ExportDocument, options: ImportOptions },
    ExportDocument,
    /// Re-read persistence after an external edit (e.g. another process
    /// wrote directly to the store).
    Reload,
}
