//! Row-level view models consumed by the presentation layer.
//!
//! The presentation layer receives an ordered sequence of [`TaskRow`]s and a
//! "no tasks" marker; it sends back *update requested* and *status
//! submitted* events, which reach the core as [`crate::session`] calls.
//! Projection is a pure full replace on every snapshot — no incremental view
//! state is kept anywhere.

use serde::{Deserialize, Serialize};

use crate::report::{Report, ReportKey};

/// Marker text shown when a technician has no assigned reports.
pub const NO_TASKS_MESSAGE: &str = "No tasks assigned.";

/// Display format for submission timestamps.
const SUBMITTED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One dashboard table row, with display fields derived from a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRow {
    /// Store key identifying the report, carried for update requests.
    pub key: ReportKey,
    /// Issue category.
    pub category: String,
    /// Issue location.
    pub location: String,
    /// Issue description.
    pub description: String,
    /// Status display label (unrecognized statuses render as-is).
    pub status_label: String,
    /// Presentation class derived from the status label.
    pub status_class: String,
    /// Submission time formatted for display.
    pub submitted_at: String,
}

impl TaskRow {
    /// Projects a report into a display row.
    pub fn from_report(key: ReportKey, report: &Report) -> Self {
        Self {
            key,
            category: report.category.clone(),
            location: report.location.clone(),
            description: report.description.clone(),
            status_label: report.status.label().to_string(),
            status_class: report.status.css_class(),
            submitted_at: report
                .submitted_at
                .format(SUBMITTED_AT_FORMAT)
                .to_string(),
        }
    }
}

/// The full dashboard view for one snapshot delivery.
///
/// Rebuilt from scratch on every feed delivery; rows from a previous
/// snapshot never persist into the next view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskView {
    rows: Vec<TaskRow>,
}

impl TaskView {
    /// Projects an ordered set of assigned reports into rows.
    pub fn project(assigned: &[(ReportKey, Report)]) -> Self {
        Self {
            rows: assigned
                .iter()
                .map(|(key, report)| TaskRow::from_report(key.clone(), report))
                .collect(),
        }
    }

    /// The ordered rows for rendering.
    pub fn rows(&self) -> &[TaskRow] {
        &self.rows
    }

    /// True when there is nothing assigned (the common case, not an error).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the "no tasks" marker text when the view is empty.
    pub fn empty_message(&self) -> Option<&'static str> {
        self.is_empty().then_some(NO_TASKS_MESSAGE)
    }
}

/// Detail fields for the status-update form, from a single point read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetail {
    /// Issue category.
    pub category: String,
    /// Issue location.
    pub location: String,
    /// Issue description.
    pub description: String,
    /// Current status label, pre-selecting the form's status field.
    pub status_label: String,
}

impl TaskDetail {
    /// Projects a report into update-form details.
    pub fn from_report(report: &Report) -> Self {
        Self {
            category: report.category.clone(),
            location: report.location.clone(),
            description: report.description.clone(),
            status_label: report.status.label().to_string(),
        }
    }
}
