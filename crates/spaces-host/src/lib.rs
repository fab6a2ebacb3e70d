// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! spaces-host: the abstract boundary between the core and a browser
//! integration layer.
//!
//! No browser bindings live here — a real extension's message-passing
//! glue is an external collaborator that implements [`HostPort`] and
//! produces [`HostEvent`]s. This crate only defines the contract and a
//! [`FakeHost`] test double.

pub mod error;
pub mod event;
pub mod port;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use error::HostError;
pub use event::{HostEvent, LiveWindow};
pub use port::HostPort;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeHost, HostCall};
