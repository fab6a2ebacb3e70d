// SPDX-License-Identifier: MIT

//! Inbound events from the browser integration layer.
//!
//! The core never talks to a browser API directly; it consumes whatever
//! adapter translates `chrome.windows`/`chrome.tabs` callbacks into this
//! stream. See `spec.md` §6 "Host Events".

use spaces_core::WindowId;

/// One event from the host's window/tab lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A window became known to the host, with its current tab urls.
    WindowOpened { window_id: WindowId, initial_urls: Vec<String> },
    /// A window closed.
    WindowClosed { window_id: WindowId },
    /// The host reported the new, ordered truth for a window's tabs.
    TabsChanged { window_id: WindowId, urls: Vec<String> },
    /// Delivered once at process start with every window the host already
    /// has open, so the State Manager can reconcile before any other
    /// event arrives.
    Startup { live_windows: Vec<LiveWindow> },
}

/// One window reported at `Startup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveWindow {
    pub window_id: WindowId,
    pub urls: Vec<String>,
}
