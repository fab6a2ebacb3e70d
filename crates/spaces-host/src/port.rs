// SPDX-License-Identifier: MIT

//! The outbound capability the core requires of the browser integration
//! layer (`spec.md` §6 "Host Commands").

use crate::error::HostError;
use async_trait::async_trait;
use spaces_core::WindowId;

/// Window-creation/close/focus commands the State Manager issues against
/// the live browser. Implemented by a real extension's message-passing
/// glue in production; by [`crate::FakeHost`] in tests.
#[async_trait]
pub trait HostPort: Send + Sync + 'static {
    /// Open a new window seeded with `urls`, returning its assigned
    /// `window_id`. Asynchronous; may fail with [`HostError::HostRefused`]
    /// or time out.
    async fn create_window(&self, urls: &[String]) -> Result<WindowId, HostError>;

    /// Close a window. Idempotent from the core's perspective: closing an
    /// already-closed window is not an error here, since the
    /// `WindowClosed` event (not this call's return) is authoritative.
    async fn close_window(&self, window_id: WindowId) -> Result<(), HostError>;

    /// Bring a window to the foreground. Used only when restore is
    /// configured to re-focus (see `EngineConfig::restore_focus`).
    async fn focus_window(&self, window_id: WindowId) -> Result<(), HostError>;
}

#[cfg(test)]
#[path = "port_tests.rs"]
mod tests;
