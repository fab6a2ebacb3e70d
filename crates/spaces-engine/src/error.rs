// SPDX-License-Identifier: MIT

//! The engine-wide error taxonomy (`spec.md` §7), matching the teacher's
//! `AgentAdapterError`/`ExecuteError` style: one `thiserror` enum per
//! failure family, `#[from]` conversions at crate boundaries, translated
//! to a wire-level `Response::Error` by the dispatcher.

use spaces_core::{ValidationError, WindowId, WorkspaceId};
use spaces_storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    // --- Validation (§7 "Validation") ---
    #[error("invalid update: {0}")]
    InvalidUpdate(String),
    #[error("name is empty after trimming")]
    EmptyName,
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid import document: {0}")]
    InvalidDocument(String),

    // --- Identity (§7 "Identity") ---
    #[error("no workspace bound to window {0}")]
    UnknownWindow(WindowId),
    #[error("no workspace with id {0}")]
    UnknownWorkspace(WorkspaceId),
    #[error("window {0} is already bound to a workspace")]
    DuplicateWindow(WindowId),

    // --- Apply (§7 "Apply") ---
    #[error("batch rejected: {0}")]
    BatchRejected(Box<EngineError>),

    // --- Persistence (§7 "Persistence") ---
    #[error("storage failed: {0}")]
    StorageFailed(#[from] StoreError),

    // --- Host (§7 "Host") ---
    #[error("host refused the request: {0}")]
    HostRefused(String),
    #[error("host call timed out after {0}ms")]
    HostTimeout(u64),

    // --- Import (§7 "Import") ---
    #[error("import failed: {0} field error(s)")]
    ImportFailed(Vec<spaces_wire::ImportFieldError>),

    // --- Queue (§4.3) ---
    #[error("queue saturated: drain could not free space")]
    QueueSaturated,
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::EmptyName => EngineError::EmptyName,
            ValidationError::InvalidUrl(url, reason) => EngineError::InvalidUrl { url, reason },
            ValidationError::InvalidUpdate(msg) => EngineError::InvalidUpdate(msg),
            ValidationError::InvalidDocument(msg) => EngineError::InvalidDocument(msg),
        }
    }
}

impl From<spaces_host::HostError> for EngineError {
    fn from(err: spaces_host::HostError) -> Self {
        match err {
            spaces_host::HostError::HostRefused(reason) => EngineError::HostRefused(reason),
            spaces_host::HostError::HostTimeout(ms) => EngineError::HostTimeout(ms),
        }
    }
}
