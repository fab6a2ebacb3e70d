// SPDX-License-Identifier: MIT

//! Ephemeral host window identity.
//!
//! Unlike [`crate::workspace::WorkspaceId`], a `WindowId` is assigned by the
//! browser host, not generated here, and is reused across process lifetimes
//! (the same integer can refer to a different window after a restart). It
//! carries no permanence guarantee; see [`crate::workspace`] for the stable
//! identifier workspaces are keyed on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A host-assigned window identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub i32);

impl WindowId {
    pub fn new(raw: i32) -> Self {
        Self(raw)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for WindowId {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
#[path = "window_tests.rs"]
mod tests;
