// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors a [`crate::HostPort`] call can fail with.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("host refused the request: {0}")]
    HostRefused(String),
    #[error("host call timed out after {0}ms")]
    HostTimeout(u64),
}
