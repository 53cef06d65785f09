//! Record store abstraction for Fixboard.
//!
//! This module provides a trait-based abstraction over the external keyed,
//! real-time-subscribable record store, so the dashboard core can swap
//! between backends (the in-memory store here, or a hosted realtime
//! database) without changing application code.
//!
//! # Operations
//!
//! - **Point read**: [`RecordStore::technician_profile`] and
//!   [`RecordStore::fetch_report`] read a single record once.
//! - **Live subscription**: [`RecordStore::subscribe_reports`] delivers the
//!   *entire* report collection on every change to any record in it
//!   (full-snapshot push, never a diff).
//! - **Partial update**: [`RecordStore::update_status`] patches only the
//!   `status` and `updated_at` fields of one report, with `updated_at`
//!   assigned by the store's own clock.
//!
//! # Error Handling
//!
//! Every operation returns an explicit [`Result`]; no failure is swallowed
//! and none is fatal. Implementations should map network failures to the
//! `Connection` variants and store-side denials to `PermissionDenied` /
//! `Rejected`.
//!
//! # Implementations
//!
//! - [`MemoryStore`]: in-memory reference implementation, also used by the
//!   test suites.

pub mod error;
pub mod memory;
pub mod types;

pub use error::{FeedError, FetchError, ProfileError, UpdateError};
pub use memory::MemoryStore;
pub use types::{FeedEvent, ReportFeed, ReportSnapshot};

use async_trait::async_trait;

use crate::report::{Report, ReportKey, ReportStatus};
use crate::technician::{TechnicianId, TechnicianProfile};

/// A keyed, hierarchical, real-time-subscribable record store.
///
/// Implementations must be thread-safe (`Send + Sync`) with a static
/// lifetime so they can be shared as `Arc<dyn RecordStore>`.
///
/// Single-record atomicity for the partial update is the store's guarantee;
/// callers perform no locking, retries, or transactions of their own.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Reads a technician's profile exactly once (a point read, not a
    /// subscription).
    ///
    /// # Errors
    ///
    /// [`ProfileError::NotFound`] when no record exists for the id;
    /// [`ProfileError::Malformed`] when the record lacks a usable display
    /// name; [`ProfileError::Connection`] on transport failure.
    async fn technician_profile(
        &self,
        id: &TechnicianId,
    ) -> Result<TechnicianProfile, ProfileError>;

    /// Reads a single report once, e.g. to populate the update form with
    /// current details.
    async fn fetch_report(&self, key: &ReportKey) -> Result<Report, FetchError>;

    /// Establishes a continuous subscription to the entire report
    /// collection.
    ///
    /// The current snapshot is delivered immediately; afterwards, every
    /// change anywhere in the collection redelivers the full collection.
    /// Bursts may coalesce, but the final state of a burst is always
    /// delivered. The subscription stays active until the returned
    /// [`ReportFeed`] is dropped or cancelled.
    async fn subscribe_reports(&self) -> Result<ReportFeed, FeedError>;

    /// Patches one report's `status`, stamping `updated_at` from the
    /// store's authoritative server-side clock (never the caller's clock),
    /// so concurrent updates from different clients order consistently.
    ///
    /// No optimistic local state is involved: the caller observes the
    /// result through the next feed delivery (write-then-observe).
    ///
    /// # Errors
    ///
    /// [`UpdateError::ReportNotFound`] when the key does not exist — in
    /// that case no existing report may be altered.
    async fn update_status(&self, key: &ReportKey, status: ReportStatus)
        -> Result<(), UpdateError>;
}
