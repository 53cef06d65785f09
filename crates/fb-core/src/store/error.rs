//! Error types for record store operations.

use thiserror::Error;

use crate::report::ReportKey;
use crate::technician::TechnicianId;

/// Errors from the one-shot technician profile lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// No profile record exists for the id.
    #[error("no profile found for technician '{0}'")]
    NotFound(TechnicianId),

    /// A record exists but lacks a usable display name.
    #[error("profile for technician '{0}' has no usable display name")]
    Malformed(TechnicianId),

    /// The store could not be reached.
    #[error("profile store connection failed: {0}")]
    Connection(String),
}

/// Errors from the live report feed.
///
/// A feed failure must surface to the caller rather than silently stopping
/// deliveries; the caller may re-subscribe afterwards.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// The subscription could not be established.
    #[error("report feed connection failed: {0}")]
    Connection(String),

    /// The store denied the subscription.
    #[error("report feed permission denied: {0}")]
    PermissionDenied(String),

    /// An established feed lost its connection to the store.
    #[error("report feed connection lost")]
    ConnectionLost,
}

/// Errors from the single-report point read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The key does not reference an existing report.
    #[error("report not found: {0}")]
    NotFound(ReportKey),

    /// The store could not be reached.
    #[error("report fetch connection failed: {0}")]
    Connection(String),
}

/// Errors from the status partial update.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    /// The key does not reference an existing report; nothing was altered.
    #[error("report not found: {0}")]
    ReportNotFound(ReportKey),

    /// The store rejected the write (e.g. permission denial).
    #[error("status update rejected: {0}")]
    Rejected(String),

    /// The store could not be reached.
    #[error("status update connection failed: {0}")]
    Connection(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_identifiers() {
        let err = ProfileError::NotFound(TechnicianId::from("tech-42"));
        assert!(err.to_string().contains("tech-42"));

        let err = ProfileError::Malformed(TechnicianId::from("tech-1"));
        assert!(err.to_string().contains("display name"));

        let err = UpdateError::ReportNotFound(ReportKey::from("k-missing"));
        assert!(err.to_string().contains("k-missing"));

        let err = FetchError::NotFound(ReportKey::from("k-gone"));
        assert!(err.to_string().contains("k-gone"));

        let err = FeedError::PermissionDenied("rules".to_string());
        assert!(err.to_string().contains("rules"));
    }

    #[test]
    fn test_feed_error_clone() {
        let err = FeedError::ConnectionLost;
        assert_eq!(err.clone(), err);
    }
}
