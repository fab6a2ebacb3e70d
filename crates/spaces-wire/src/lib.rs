// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! spaces-wire: observer-facing message types.
//!
//! Pure data, no I/O and no validation logic — decoding bytes and
//! enforcing the import/export contract live in `spaces-engine`.

mod broadcast;
mod document;
mod request;
mod response;
mod snapshot;

pub use broadcast::Broadcast;
pub use document::{
    ExportDocument, ExportMetadata, ImportFieldError, ImportOptions, ImportedCounts,
    SpacesSection, WorkspaceRecord,
};
pub use request::ObserverRequest;
pub use response::Response;
pub use snapshot::StateSnapshot;

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
