//! Snapshot and subscription types for the record store abstraction.

use std::collections::BTreeMap;
use tokio::sync::mpsc;

use super::error::FeedError;
use crate::report::{Report, ReportKey};

/// The entire report collection as delivered by the store.
///
/// Every feed delivery carries a complete snapshot, never a diff. A
/// `BTreeMap` gives deterministic iteration for consumers, but the filter
/// layer imposes its own ordering regardless.
pub type ReportSnapshot = BTreeMap<ReportKey, Report>;

/// A single delivery on a report feed.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// The full current collection after some change.
    Snapshot(ReportSnapshot),
    /// The feed failed; no further snapshots will arrive on this handle.
    Lost(FeedError),
}

/// A live subscription to the full report collection.
///
/// Every add, change, or removal anywhere in the collection redelivers the
/// *entire current collection* — consumers are expected to be idempotent
/// under full re-projection. The current snapshot is delivered immediately
/// after subscribing.
///
/// # Cancellation
///
/// Dropping the feed (or calling [`ReportFeed::cancel`]) stops further
/// deliveries and releases the store-side listener. A feed that has yielded
/// an error is finished; establish a new subscription to resume.
pub struct ReportFeed {
    receiver: mpsc::Receiver<FeedEvent>,
}

impl ReportFeed {
    /// Creates a feed over the given delivery channel.
    pub fn new(receiver: mpsc::Receiver<FeedEvent>) -> Self {
        Self { receiver }
    }

    /// Receives the next full snapshot.
    ///
    /// Returns `Some(Ok(snapshot))` on each delivery, `Some(Err(_))` when
    /// the feed fails (surfaced, never swallowed), and `None` once the feed
    /// is finished.
    pub async fn recv(&mut self) -> Option<Result<ReportSnapshot, FeedError>> {
        match self.receiver.recv().await {
            Some(FeedEvent::Snapshot(snapshot)) => Some(Ok(snapshot)),
            Some(FeedEvent::Lost(err)) => Some(Err(err)),
            None => None,
        }
    }

    /// Attempts to receive a delivery without blocking.
    pub fn try_recv(&mut self) -> Result<FeedEvent, mpsc::error::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Cancels the subscription, releasing the store-side listener.
    ///
    /// Equivalent to dropping the feed; provided for call sites that want
    /// the release to be explicit.
    pub fn cancel(self) {
        drop(self);
    }
}

impl std::fmt::Debug for ReportFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportFeed")
            .field("receiver", &"<mpsc::Receiver>")
            .finish()
    }
}
