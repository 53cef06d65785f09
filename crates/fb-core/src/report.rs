//! Report data model for Fixboard.
//!
//! A report is a single submitted issue record (category, location,
//! description, status, assignee, timestamps). Reports are created by an
//! external submission collaborator; this core reads the collection
//! continuously and patches a single report's status on demand. Reports are
//! never deleted by this core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique key for a report, assigned by the record store at creation.
///
/// The underlying string is opaque to the core; the in-memory store issues
/// UUID-backed keys, but any non-empty string is valid.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReportKey(pub String);

impl ReportKey {
    /// Creates a new `ReportKey` from a string.
    pub fn new(key: String) -> Self {
        Self(key)
    }

    /// Returns the underlying string representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ReportKey` and returns the underlying string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ReportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ReportKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ReportKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Workflow status of a report.
///
/// The closed set is `Pending`, `In Progress`, and `Resolved`. Any other
/// string found in the store is carried through verbatim as
/// [`ReportStatus::Unrecognized`] so that rendering never fails on
/// unexpected data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReportStatus {
    /// Submitted, not yet picked up.
    Pending,
    /// A technician is working on it.
    InProgress,
    /// Work is complete.
    Resolved,
    /// A status string outside the known set, rendered as-is.
    Unrecognized(String),
}

impl ReportStatus {
    /// Returns the display label for this status.
    pub fn label(&self) -> &str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::InProgress => "In Progress",
            ReportStatus::Resolved => "Resolved",
            ReportStatus::Unrecognized(raw) => raw,
        }
    }

    /// Derives the presentation CSS class for this status: the label
    /// lowercased with spaces replaced by hyphens (e.g. `"in-progress"`).
    pub fn css_class(&self) -> String {
        self.label().to_lowercase().replace(' ', "-")
    }

    /// Returns true if this status belongs to the known closed set.
    pub fn is_known(&self) -> bool {
        !matches!(self, ReportStatus::Unrecognized(_))
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<String> for ReportStatus {
    fn from(raw: String) -> Self {
        // Exact, case-sensitive match; anything else is carried verbatim.
        match raw.as_str() {
            "Pending" => ReportStatus::Pending,
            "In Progress" => ReportStatus::InProgress,
            "Resolved" => ReportStatus::Resolved,
            _ => ReportStatus::Unrecognized(raw),
        }
    }
}

impl From<&str> for ReportStatus {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<ReportStatus> for String {
    fn from(status: ReportStatus) -> Self {
        status.label().to_string()
    }
}

/// A single submitted issue record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Issue category (e.g. "Plumbing", "Electrical").
    pub category: String,
    /// Where the issue was observed.
    pub location: String,
    /// Free-text description of the issue.
    pub description: String,
    /// Current workflow status.
    pub status: ReportStatus,
    /// Raw assignment reference. Holds either a technician id or a
    /// technician display name; see [`crate::assignment::AssignedTo`].
    pub assigned_to: String,
    /// When the report was submitted. Set at creation, immutable.
    pub submitted_at: DateTime<Utc>,
    /// When the status was last patched, using the store's server-side
    /// clock. Absent until the first update.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Report {
    /// Creates a new pending report submitted now.
    pub fn new(
        category: impl Into<String>,
        location: impl Into<String>,
        description: impl Into<String>,
        assigned_to: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            location: location.into(),
            description: description.into(),
            status: ReportStatus::Pending,
            assigned_to: assigned_to.into(),
            submitted_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Replaces the submission timestamp, for controlled ordering in tests
    /// and seed data.
    pub fn with_submitted_at(mut self, submitted_at: DateTime<Utc>) -> Self {
        self.submitted_at = submitted_at;
        self
    }

    /// Replaces the initial status.
    pub fn with_status(mut self, status: ReportStatus) -> Self {
        self.status = status;
        self
    }
}
