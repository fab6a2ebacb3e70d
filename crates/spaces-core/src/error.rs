// SPDX-License-Identifier: MIT

//! Validation error taxonomy.
//!
//! These are the errors a caller can provoke before anything touches
//! persistence or the in-memory model: malformed updates, bad names, bad
//! URLs, or a structurally invalid import document. All of them leave state
//! unchanged.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid update: {0}")]
    InvalidUpdate(String),

    #[error("name is empty after trimming")]
    EmptyName,

    #[error("invalid url {0:?}: {1}")]
    InvalidUrl(String, String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),
}
