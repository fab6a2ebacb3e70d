// SPDX-License-Identifier: MIT

//! Broadcast Bus (`spec.md` §4.5): fans `StateUpdated`/`ImportCompleted`
//! out to every subscribed observer. The State Manager doesn't track
//! which observer (if any) originated a change, so there is no
//! originator to exclude — everyone, including whoever caused the
//! update, gets the same message.

use crate::config::BroadcastConfig;
use parking_lot::Mutex;
use spaces_core::WorkspaceId;
use spaces_wire::{Broadcast, ImportFieldError, ImportedCounts, StateSnapshot};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Bound on each subscriber's outbound channel. A subscriber that falls
/// this far behind starts getting skipped instead of blocking the
/// publisher (`spec.md` §5: "Drain suspends on... the broadcast send,
/// which is bounded per subscriber").
const SUBSCRIBER_CHANNEL_CAPACITY: usize = 32;

pub struct BroadcastBus {
    config: BroadcastConfig,
    subscribers: Mutex<HashMap<String, mpsc::Sender<Broadcast>>>,
}

impl BroadcastBus {
    pub fn new(config: BroadcastConfig) -> Self {
        Self { config, subscribers: Mutex::new(HashMap::new()) }
    }

    /// Register a new subscriber, returning the receiving half. The id is
    /// opaque here; callers mint it however they track observers
    /// (connection id, test name, etc).
    pub fn subscribe(&self, subscriber_id: impl Into<String>) -> mpsc::Receiver<Broadcast> {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_CHANNEL_CAPACITY);
        self.subscribers.lock().insert(subscriber_id.into(), tx);
        rx
    }

    pub fn unsubscribe(&self, subscriber_id: &str) {
        self.subscribers.lock().remove(subscriber_id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Deliver a `StateUpdated` to every subscriber. Best-effort,
    /// at-least-once within a FIFO-ordered channel per subscriber; a full
    /// or closed channel is skipped rather than blocking the publisher.
    pub fn publish(&self, snapshot: StateSnapshot, touched: Vec<WorkspaceId>) {
        self.deliver_to_all(Broadcast::StateUpdated { snapshot, touched });
    }

    pub fn publish_import_completed(&self, imported_counts: ImportedCounts, errors: Vec<ImportFieldError>) {
        self.deliver_to_all(Broadcast::ImportCompleted { imported_counts, errors });
    }

    fn deliver_to_all(&self, message: Broadcast) {
        let subscribers = self.subscribers.lock();
        for (id, tx) in subscribers.iter() {
            match tx.try_send(message.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) if self.config.retry => {
                    if tx.try_send(message.clone()).is_err() {
                        warn!(subscriber = %id, "dropping broadcast after retry: subscriber still full");
                    }
                }
                Err(mpsc::error::TrySendError::Full(_)) => {
                    debug!(subscriber = %id, "dropping broadcast: subscriber full");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!(subscriber = %id, "subscriber channel closed; will be pruned on next unsubscribe");
                }
            }
        }
    }
}
