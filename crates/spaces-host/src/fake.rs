// SPDX-License-Identifier: MIT

//! In-memory [`HostPort`] test double.

use crate::error::HostError;
use crate::port::HostPort;
use async_trait::async_trait;
use parking_lot::Mutex;
use spaces_core::WindowId;

/// One call recorded by [`FakeHost`], for assertions in tests that need to
/// check what the State Manager actually asked the host to do (e.g. the
/// restore non-reuse invariant).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    CreateWindow(Vec<String>),
    CloseWindow(WindowId),
    FocusWindow(WindowId),
}

/// A [`HostPort`] backed entirely by in-memory state: no browser, no
/// network. Window ids are assigned sequentially starting from `next_id`
/// so a test can assert non-reuse by inspecting the returned values
/// directly rather than mocking a real browser process.
pub struct FakeHost {
    next_id: Mutex<i32>,
    calls: Mutex<Vec<HostCall>>,
    refuse_create: Mutex<bool>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self { next_id: Mutex::new(1), calls: Mutex::new(Vec::new()), refuse_create: Mutex::new(false) }
    }

    /// Start window id assignment from `first`, useful to avoid colliding
    /// with fixture-assigned ids in a test.
    pub fn starting_at(first: i32) -> Self {
        Self { next_id: Mutex::new(first), calls: Mutex::new(Vec::new()), refuse_create: Mutex::new(false) }
    }

    /// Make every subsequent `create_window` call fail with `HostRefused`.
    pub fn refuse_next_create(&self) {
        *self.refuse_create.lock() = true;
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostPort for FakeHost {
    async fn create_window(&self, urls: &[String]) -> Result<WindowId, HostError> {
        let mut refuse = self.refuse_create.lock();
        if *refuse {
            *refuse = false;
            return Err(HostError::HostRefused("fake host configured to refuse".into()));
        }
        drop(refuse);

        let mut next = self.next_id.lock();
        let id = WindowId::new(*next);
        *next += 1;
        self.calls.lock().push(HostCall::CreateWindow(urls.to_vec()));
        Ok(id)
    }

    async fn close_window(&self, window_id: WindowId) -> Result<(), HostError> {
        self.calls.lock().push(HostCall::CloseWindow(window_id));
        Ok(())
    }

    async fn focus_window(&self, window_id: WindowId) -> Result<(), HostError> {
        self.calls.lock().push(HostCall::FocusWindow(window_id));
        Ok(())
    }
}
