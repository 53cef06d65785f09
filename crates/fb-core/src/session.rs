//! Dashboard session: identity resolution, the live task feed, and status
//! updates for one signed-in technician.
//!
//! A session resolves the technician's profile exactly once, enforces the
//! client-side role gate, and then hands out at most one live [`TaskFeed`]
//! at a time. The resolved identity travels explicitly through the filter
//! and update paths — no ambient global auth state.
//!
//! No failure here is fatal: the dashboard stays usable after any single
//! error, and the caller may retry or re-subscribe at any time.

use std::sync::{Arc, Weak};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::assignment::filter_assigned;
use crate::report::{ReportKey, ReportStatus};
use crate::store::{
    FeedError, FetchError, ProfileError, RecordStore, ReportFeed, UpdateError,
};
use crate::technician::{Role, TechnicianId, TechnicianIdentity};
use crate::view::{TaskDetail, TaskView};

/// Errors surfaced by the dashboard session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The resolved profile's role does not grant dashboard access. A
    /// client-side convenience check; enforcement lives in the store's own
    /// access rules.
    #[error("access denied: role '{role}' cannot open the technician dashboard")]
    AccessDenied {
        /// The role that was denied.
        role: Role,
    },

    /// A previously issued task feed is still alive; one feed per session.
    #[error("a live task feed is already active for this session")]
    FeedActive,

    /// Resolving the technician profile failed.
    #[error("profile resolution failed: {0}")]
    Profile(#[from] ProfileError),

    /// The feed subscription failed.
    #[error("task feed failed: {0}")]
    Feed(#[from] FeedError),

    /// The report detail read failed.
    #[error("report detail read failed: {0}")]
    Fetch(#[from] FetchError),

    /// The status update failed.
    #[error("status update failed: {0}")]
    Update(#[from] UpdateError),
}

/// A signed-in technician's dashboard session.
///
/// Created by [`DashboardSession::open`], which performs the one-shot
/// profile resolution. The session holds the store handle and the resolved
/// identity for the rest of the workflow.
pub struct DashboardSession {
    store: Arc<dyn RecordStore>,
    identity: TechnicianIdentity,
    active_feed: Weak<()>,
}

impl DashboardSession {
    /// Opens a session for an authenticated technician id.
    ///
    /// Resolves the profile exactly once (a point read) and applies the
    /// role gate: only the `technician` role may open the dashboard.
    ///
    /// # Errors
    ///
    /// [`SessionError::Profile`] when the profile is missing, malformed, or
    /// unreachable; [`SessionError::AccessDenied`] when the role does not
    /// grant access.
    pub async fn open(
        store: Arc<dyn RecordStore>,
        technician_id: TechnicianId,
    ) -> Result<Self, SessionError> {
        let profile = store.technician_profile(&technician_id).await?;
        if !profile.role.grants_dashboard_access() {
            warn!(technician = %technician_id, role = %profile.role, "dashboard access denied");
            return Err(SessionError::AccessDenied { role: profile.role });
        }
        info!(technician = %technician_id, name = %profile.name, "dashboard session opened");
        Ok(Self {
            store,
            identity: TechnicianIdentity::new(technician_id, profile.name),
            active_feed: Weak::new(),
        })
    }

    /// The resolved identity (id and display name) for this session.
    pub fn identity(&self) -> &TechnicianIdentity {
        &self.identity
    }

    /// Subscribes to the live task feed for this technician.
    ///
    /// At most one feed is active per session: while a previously returned
    /// [`TaskFeed`] is alive, this fails with [`SessionError::FeedActive`]
    /// (a second listener would duplicate deliveries and leak the first).
    /// Once the feed is dropped or has failed, subscribing again is allowed.
    pub async fn subscribe(&mut self) -> Result<TaskFeed, SessionError> {
        if self.active_feed.upgrade().is_some() {
            return Err(SessionError::FeedActive);
        }
        let feed = self.store.subscribe_reports().await?;
        let liveness = Arc::new(());
        self.active_feed = Arc::downgrade(&liveness);
        debug!(technician = %self.identity.id, "task feed subscribed");
        Ok(TaskFeed {
            inner: feed,
            identity: self.identity.clone(),
            _liveness: liveness,
        })
    }

    /// Reads one report's current details, for populating the update form.
    pub async fn report_detail(&self, key: &ReportKey) -> Result<TaskDetail, SessionError> {
        let report = self.store.fetch_report(key).await?;
        Ok(TaskDetail::from_report(&report))
    }

    /// Applies a status change to one report.
    ///
    /// No optimistic local mutation: the new state reaches the view through
    /// the feed's next redelivered snapshot.
    pub async fn update_status(
        &self,
        key: &ReportKey,
        status: ReportStatus,
    ) -> Result<(), SessionError> {
        match self.store.update_status(key, status.clone()).await {
            Ok(()) => {
                info!(key = %key, status = %status, "report status updated");
                Ok(())
            }
            Err(err) => {
                warn!(key = %key, status = %status, error = %err, "report status update failed");
                Err(err.into())
            }
        }
    }
}

impl std::fmt::Debug for DashboardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardSession")
            .field("identity", &self.identity)
            .field("feed_active", &self.active_feed.upgrade().is_some())
            .finish()
    }
}

/// The live, filtered task view stream for one technician.
///
/// Wraps the store's full-collection feed and re-runs the pure
/// filter-and-project stage on every delivery. Dropping the feed releases
/// the store-side listener and lets the owning session subscribe again.
pub struct TaskFeed {
    inner: ReportFeed,
    identity: TechnicianIdentity,
    _liveness: Arc<()>,
}

impl TaskFeed {
    /// Receives the next dashboard view.
    ///
    /// Each delivery is a full replace: the returned [`TaskView`] reflects
    /// the latest snapshot in its entirety, with no rows carried over from
    /// earlier deliveries. Returns `Some(Err(_))` when the underlying feed
    /// fails (the session may then re-subscribe) and `None` once finished.
    pub async fn next_view(&mut self) -> Option<Result<TaskView, FeedError>> {
        match self.inner.recv().await {
            Some(Ok(snapshot)) => {
                let assigned = filter_assigned(&snapshot, &self.identity);
                debug!(
                    technician = %self.identity.id,
                    total = snapshot.len(),
                    assigned = assigned.len(),
                    "task view refreshed"
                );
                Some(Ok(TaskView::project(&assigned)))
            }
            Some(Err(err)) => {
                warn!(technician = %self.identity.id, error = %err, "task feed failed");
                Some(Err(err))
            }
            None => None,
        }
    }

    /// Cancels the feed, releasing the store-side listener.
    pub fn cancel(self) {
        self.inner.cancel();
    }
}

impl std::fmt::Debug for TaskFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskFeed")
            .field("identity", &self.identity)
            .finish()
    }
}
