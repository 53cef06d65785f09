//! In-memory implementation of the [`RecordStore`] trait.
//!
//! This module provides [`MemoryStore`], an in-memory record store built on
//! Tokio synchronization primitives. It's designed for:
//!
//! - Unit and integration tests that need a functional record store
//! - Local development without a hosted realtime database
//!
//! # Behavior
//!
//! - **Point reads**: profile and report lookups read the locked maps once.
//! - **Live feed**: a `watch` channel holds the latest full snapshot; each
//!   subscriber gets a bridge task that forwards snapshots into a bounded
//!   `mpsc` channel. Bursts of writes may coalesce in the `watch` channel,
//!   but the final state of a burst is always delivered.
//! - **Server clock**: status updates stamp `updated_at` from a strictly
//!   monotonic clock (`max(now, last + 1ms)`), so every issued timestamp is
//!   strictly greater than the previous one even within a millisecond.
//!
//! # Limitations
//!
//! This store does not implement persistence, access rules, or reconnect
//! semantics. Permission-denial paths therefore never trigger here; they
//! exist for hosted-store implementations of the same trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, RwLock};
use tracing::{debug, trace};
use uuid::Uuid;

use super::error::{FeedError, FetchError, ProfileError, UpdateError};
use super::types::{FeedEvent, ReportFeed, ReportSnapshot};
use super::RecordStore;
use crate::report::{Report, ReportKey, ReportStatus};
use crate::technician::{TechnicianId, TechnicianProfile};

/// Default per-subscriber delivery buffer.
const DEFAULT_FEED_CAPACITY: usize = 64;

/// In-memory record store for tests and local development.
///
/// # Thread Safety
///
/// `MemoryStore` is `Send + Sync` and is normally shared as
/// `Arc<MemoryStore>` (or `Arc<dyn RecordStore>`).
///
/// # Example
///
/// ```
/// use fb_core::report::{Report, ReportStatus};
/// use fb_core::store::{MemoryStore, RecordStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let key = store
///     .submit_report(Report::new("Plumbing", "Building A", "Leak", "tech-42"))
///     .await;
///
/// let mut feed = store.subscribe_reports().await?;
/// let snapshot = feed.recv().await.unwrap()?;
/// assert!(snapshot.contains_key(&key));
///
/// store.update_status(&key, ReportStatus::InProgress).await?;
/// let snapshot = feed.recv().await.unwrap()?;
/// assert_eq!(snapshot[&key].status, ReportStatus::InProgress);
/// # Ok(())
/// # }
/// ```
pub struct MemoryStore {
    /// Technician profiles keyed by id.
    profiles: RwLock<HashMap<TechnicianId, TechnicianProfile>>,
    /// The report collection.
    reports: RwLock<BTreeMap<ReportKey, Report>>,
    /// Latest full snapshot, redelivered to every subscriber on change.
    snapshot_tx: watch::Sender<ReportSnapshot>,
    /// Last server-issued timestamp in epoch milliseconds.
    last_server_ms: AtomicI64,
    /// Number of live feed bridge tasks.
    subscribers: Arc<AtomicUsize>,
    /// Delivery buffer size for new feeds.
    feed_capacity: usize,
}

impl MemoryStore {
    /// Creates an empty store with the default feed buffer.
    pub fn new() -> Self {
        Self::with_feed_capacity(DEFAULT_FEED_CAPACITY)
    }

    /// Creates an empty store with the given per-subscriber buffer size.
    pub fn with_feed_capacity(capacity: usize) -> Self {
        let (snapshot_tx, _) = watch::channel(ReportSnapshot::new());
        Self {
            profiles: RwLock::new(HashMap::new()),
            reports: RwLock::new(BTreeMap::new()),
            snapshot_tx,
            last_server_ms: AtomicI64::new(0),
            subscribers: Arc::new(AtomicUsize::new(0)),
            feed_capacity: capacity,
        }
    }

    /// Provisions a technician profile (profiles are created out-of-band in
    /// production; this is the seeding path for tests and local runs).
    pub async fn insert_profile(&self, id: TechnicianId, profile: TechnicianProfile) {
        self.profiles.write().await.insert(id, profile);
    }

    /// Stores a new report under a generated key and publishes the updated
    /// collection to all feeds. This is the report-submission collaborator's
    /// write path.
    pub async fn submit_report(&self, report: Report) -> ReportKey {
        let key = ReportKey::new(Uuid::new_v4().to_string());
        let snapshot = {
            let mut reports = self.reports.write().await;
            reports.insert(key.clone(), report);
            reports.clone()
        };
        debug!(key = %key, total = snapshot.len(), "report submitted");
        self.snapshot_tx.send_replace(snapshot);
        key
    }

    /// Returns the number of reports currently stored.
    pub async fn report_count(&self) -> usize {
        self.reports.read().await.len()
    }

    /// Returns the number of live feed subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.load(Ordering::SeqCst)
    }

    /// Issues the next server-side timestamp.
    ///
    /// Strictly monotonic: `max(now, last + 1ms)`, so two back-to-back
    /// updates never share a timestamp.
    fn server_timestamp(&self) -> DateTime<Utc> {
        let now_ms = Utc::now().timestamp_millis();
        let prev = self
            .last_server_ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now_ms.max(last + 1))
            })
            .unwrap_or(now_ms);
        let issued_ms = now_ms.max(prev + 1);
        DateTime::from_timestamp_millis(issued_ms).unwrap_or_else(Utc::now)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn technician_profile(
        &self,
        id: &TechnicianId,
    ) -> Result<TechnicianProfile, ProfileError> {
        let profiles = self.profiles.read().await;
        let profile = profiles
            .get(id)
            .cloned()
            .ok_or_else(|| ProfileError::NotFound(id.clone()))?;
        if !profile.has_usable_name() {
            return Err(ProfileError::Malformed(id.clone()));
        }
        Ok(profile)
    }

    async fn fetch_report(&self, key: &ReportKey) -> Result<Report, FetchError> {
        self.reports
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(key.clone()))
    }

    async fn subscribe_reports(&self) -> Result<ReportFeed, FeedError> {
        let (tx, rx) = mpsc::channel(self.feed_capacity);
        let mut snapshot_rx = self.snapshot_tx.subscribe();
        let subscribers = Arc::clone(&self.subscribers);
        subscribers.fetch_add(1, Ordering::SeqCst);

        tokio::spawn(async move {
            // `on value` semantics: the current collection is delivered
            // immediately, then again after every change.
            let initial = snapshot_rx.borrow_and_update().clone();
            if tx.send(FeedEvent::Snapshot(initial)).await.is_err() {
                subscribers.fetch_sub(1, Ordering::SeqCst);
                return;
            }
            loop {
                match snapshot_rx.changed().await {
                    Ok(()) => {
                        let snapshot = snapshot_rx.borrow_and_update().clone();
                        trace!(total = snapshot.len(), "delivering report snapshot");
                        if tx.send(FeedEvent::Snapshot(snapshot)).await.is_err() {
                            // Feed dropped; listener released.
                            break;
                        }
                    }
                    Err(_) => {
                        // Store dropped out from under the feed; surface the
                        // failure instead of silently stopping.
                        let _ = tx.send(FeedEvent::Lost(FeedError::ConnectionLost)).await;
                        break;
                    }
                }
            }
            subscribers.fetch_sub(1, Ordering::SeqCst);
        });

        Ok(ReportFeed::new(rx))
    }

    async fn update_status(
        &self,
        key: &ReportKey,
        status: ReportStatus,
    ) -> Result<(), UpdateError> {
        let snapshot = {
            let mut reports = self.reports.write().await;
            let report = reports
                .get_mut(key)
                .ok_or_else(|| UpdateError::ReportNotFound(key.clone()))?;
            report.status = status;
            report.updated_at = Some(self.server_timestamp());
            reports.clone()
        };
        debug!(key = %key, "report status patched");
        self.snapshot_tx.send_replace(snapshot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn seed_report(assigned_to: &str) -> Report {
        Report::new("Plumbing", "Building A", "Leaking pipe", assigned_to)
    }

    #[tokio::test]
    async fn test_profile_lookup() {
        let store = MemoryStore::new();
        let id = TechnicianId::from("tech-42");
        store
            .insert_profile(id.clone(), TechnicianProfile::technician("Jane Doe"))
            .await;

        let profile = store.technician_profile(&id).await.unwrap();
        assert_eq!(profile.name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_profile_not_found() {
        let store = MemoryStore::new();
        let id = TechnicianId::from("tech-ghost");
        assert_eq!(
            store.technician_profile(&id).await,
            Err(ProfileError::NotFound(id))
        );
    }

    #[tokio::test]
    async fn test_profile_without_name_is_malformed() {
        let store = MemoryStore::new();
        let id = TechnicianId::from("tech-1");
        store
            .insert_profile(id.clone(), TechnicianProfile::technician("  "))
            .await;
        assert_eq!(
            store.technician_profile(&id).await,
            Err(ProfileError::Malformed(id))
        );
    }

    #[tokio::test]
    async fn test_fetch_report_point_read() {
        let store = MemoryStore::new();
        let key = store.submit_report(seed_report("tech-42")).await;

        let report = store.fetch_report(&key).await.unwrap();
        assert_eq!(report.category, "Plumbing");

        let missing = ReportKey::from("k-missing");
        assert_eq!(
            store.fetch_report(&missing).await,
            Err(FetchError::NotFound(missing))
        );
    }

    #[tokio::test]
    async fn test_subscribe_delivers_current_snapshot_immediately() {
        let store = MemoryStore::new();
        let key = store.submit_report(seed_report("tech-42")).await;

        let mut feed = store.subscribe_reports().await.unwrap();
        let snapshot = feed.recv().await.unwrap().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains_key(&key));
    }

    #[tokio::test]
    async fn test_every_change_redelivers_full_collection() {
        let store = MemoryStore::new();
        let mut feed = store.subscribe_reports().await.unwrap();
        assert!(feed.recv().await.unwrap().unwrap().is_empty());

        let k1 = store.submit_report(seed_report("tech-42")).await;
        let snapshot = feed.recv().await.unwrap().unwrap();
        assert_eq!(snapshot.len(), 1);

        let k2 = store.submit_report(seed_report("Jane Doe")).await;
        let snapshot = feed.recv().await.unwrap().unwrap();
        // Full replace: both records present, not a diff.
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains_key(&k1));
        assert!(snapshot.contains_key(&k2));
    }

    #[tokio::test]
    async fn test_update_status_patches_status_and_server_timestamp() {
        let store = MemoryStore::new();
        let key = store.submit_report(seed_report("tech-42")).await;

        store
            .update_status(&key, ReportStatus::InProgress)
            .await
            .unwrap();
        let first = store.fetch_report(&key).await.unwrap();
        assert_eq!(first.status, ReportStatus::InProgress);
        let first_ts = first.updated_at.expect("server timestamp set");

        store
            .update_status(&key, ReportStatus::Resolved)
            .await
            .unwrap();
        let second = store.fetch_report(&key).await.unwrap();
        let second_ts = second.updated_at.expect("server timestamp set");
        // Strictly greater, even for back-to-back writes.
        assert!(second_ts > first_ts);
        // Only status and updated_at were touched.
        assert_eq!(second.submitted_at, first.submitted_at);
        assert_eq!(second.assigned_to, first.assigned_to);
    }

    #[tokio::test]
    async fn test_update_missing_report_alters_nothing() {
        let store = MemoryStore::new();
        let key = store.submit_report(seed_report("tech-42")).await;
        let before = store.fetch_report(&key).await.unwrap();

        let missing = ReportKey::from("k-missing");
        assert_eq!(
            store
                .update_status(&missing, ReportStatus::Resolved)
                .await,
            Err(UpdateError::ReportNotFound(missing))
        );

        let after = store.fetch_report(&key).await.unwrap();
        assert_eq!(before, after);
        assert_eq!(store.report_count().await, 1);
    }

    #[tokio::test]
    async fn test_dropping_feed_releases_listener() {
        let store = MemoryStore::new();
        let feed = store.subscribe_reports().await.unwrap();
        assert_eq!(store.subscriber_count(), 1);

        feed.cancel();
        // The bridge task notices the closed channel on its next delivery.
        store.submit_report(seed_report("tech-42")).await;
        for _ in 0..100 {
            if store.subscriber_count() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(store.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_store_drop_surfaces_feed_error() {
        let store = MemoryStore::new();
        let mut feed = store.subscribe_reports().await.unwrap();
        assert!(feed.recv().await.unwrap().is_ok());

        drop(store);
        assert_eq!(feed.recv().await, Some(Err(FeedError::ConnectionLost)));
        assert_eq!(feed.recv().await, None);
    }

    #[tokio::test]
    async fn test_burst_delivers_final_state() {
        let store = MemoryStore::with_feed_capacity(1);
        let mut feed = store.subscribe_reports().await.unwrap();
        assert!(feed.recv().await.unwrap().unwrap().is_empty());

        // A burst of writes may coalesce in the watch channel, but the last
        // state must come through.
        let mut last_key = None;
        for _ in 0..10 {
            last_key = Some(store.submit_report(seed_report("tech-42")).await);
        }
        let last_key = last_key.unwrap();

        let mut latest = None;
        while let Ok(event) = tokio::time::timeout(Duration::from_millis(200), feed.recv()).await {
            match event {
                Some(Ok(snapshot)) => {
                    let done = snapshot.len() == 10;
                    latest = Some(snapshot);
                    if done {
                        break;
                    }
                }
                _ => break,
            }
        }
        let latest = latest.expect("at least one delivery");
        assert_eq!(latest.len(), 10);
        assert!(latest.contains_key(&last_key));
    }
}
