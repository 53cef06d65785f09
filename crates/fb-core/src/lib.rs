//! # fb-core
//!
//! Core of Fixboard, a role-gated real-time task dashboard for field
//! technicians: data models, the live report feed, the assignment filter,
//! and concurrency-safe status updates.
//!
//! The flow for one session: [`session::DashboardSession::open`] resolves
//! the technician's profile once; [`session::DashboardSession::subscribe`]
//! establishes the single live feed; every delivered snapshot is re-filtered
//! and re-projected in full ([`assignment::filter_assigned`] →
//! [`view::TaskView`]); a status change goes through
//! [`session::DashboardSession::update_status`], whose write comes back
//! through the same feed — write-then-observe, with no local cache to
//! invalidate.

pub mod assignment;
pub mod report;
pub mod session;
pub mod store;
pub mod technician;
pub mod view;

pub use assignment::{filter_assigned, AssignedTo};
pub use report::{Report, ReportKey, ReportStatus};
pub use session::{DashboardSession, SessionError, TaskFeed};
pub use store::{
    FeedError, FetchError, MemoryStore, ProfileError, RecordStore, ReportFeed, ReportSnapshot,
    UpdateError,
};
pub use technician::{Role, TechnicianId, TechnicianIdentity, TechnicianProfile};
pub use view::{TaskDetail, TaskRow, TaskView, NO_TASKS_MESSAGE};
