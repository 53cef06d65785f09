//! Assignment matching and the pure filter over report snapshots.
//!
//! A report's `assigned_to` field holds *either* a technician id *or* a
//! technician display name: two write paths populate the field
//! inconsistently, and both forms must be tolerated permanently. The
//! ambiguity is resolved once at the boundary by [`AssignedTo::classify`]
//! rather than re-deriving string equality throughout the filtering logic.
//!
//! The intended long-term model is id-only; [`AssignedTo::ByName`] marks the
//! records that a future migration would rewrite.

use serde::{Deserialize, Serialize};

use crate::report::{Report, ReportKey};
use crate::store::ReportSnapshot;
use crate::technician::{TechnicianId, TechnicianIdentity};

/// Classified form of a report's raw `assigned_to` reference, relative to
/// one technician's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AssignedTo {
    /// The reference equals the technician's opaque id.
    ById(TechnicianId),
    /// The reference equals the technician's display name (legacy write
    /// path; migratable to id-only).
    ByName(String),
    /// The reference matches neither form for this technician.
    Unknown(String),
}

impl AssignedTo {
    /// Classifies a raw `assigned_to` value against a technician identity.
    ///
    /// Matching is exact and case-sensitive, with no normalization. When a
    /// technician's display name collides with their id, the id form wins.
    pub fn classify(raw: &str, identity: &TechnicianIdentity) -> Self {
        if raw == identity.id.as_str() {
            AssignedTo::ById(identity.id.clone())
        } else if raw == identity.name {
            AssignedTo::ByName(raw.to_string())
        } else {
            AssignedTo::Unknown(raw.to_string())
        }
    }

    /// Returns true if the reference resolves to the technician in either
    /// of its two valid encodings.
    pub fn matches_technician(&self) -> bool {
        !matches!(self, AssignedTo::Unknown(_))
    }
}

/// Selects the reports assigned to one technician from a full snapshot.
///
/// Pure and deterministic: no I/O, no hidden state, identical inputs yield
/// identical output. A report is included iff its raw `assigned_to` equals
/// the technician's id or display name (exact, case-sensitive).
///
/// The store does not guarantee iteration order, so the result is sorted by
/// `submitted_at` (oldest first), tie-broken by key. This is a deliberate
/// ordering imposed here, not a reproduction of store order.
///
/// An empty snapshot or a snapshot with no matches yields an empty vector:
/// the ordinary "no tasks" case, not a failure.
pub fn filter_assigned(
    snapshot: &ReportSnapshot,
    identity: &TechnicianIdentity,
) -> Vec<(ReportKey, Report)> {
    let mut assigned: Vec<(ReportKey, Report)> = snapshot
        .iter()
        .filter(|(_, report)| {
            AssignedTo::classify(&report.assigned_to, identity).matches_technician()
        })
        .map(|(key, report)| (key.clone(), report.clone()))
        .collect();

    assigned.sort_by(|(a_key, a), (b_key, b)| {
        a.submitted_at
            .cmp(&b.submitted_at)
            .then_with(|| a_key.cmp(b_key))
    });

    assigned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportStatus;
    use chrono::{Duration, Utc};

    fn identity() -> TechnicianIdentity {
        TechnicianIdentity::new("tech-42", "Jane Doe")
    }

    fn snapshot_of(entries: Vec<(&str, Report)>) -> ReportSnapshot {
        entries
            .into_iter()
            .map(|(key, report)| (ReportKey::from(key), report))
            .collect()
    }

    #[test]
    fn test_classify_by_id() {
        let assigned = AssignedTo::classify("tech-42", &identity());
        assert_eq!(assigned, AssignedTo::ById(TechnicianId::from("tech-42")));
        assert!(assigned.matches_technician());
    }

    #[test]
    fn test_classify_by_name() {
        let assigned = AssignedTo::classify("Jane Doe", &identity());
        assert_eq!(assigned, AssignedTo::ByName("Jane Doe".to_string()));
        assert!(assigned.matches_technician());
    }

    #[test]
    fn test_classify_unknown() {
        let assigned = AssignedTo::classify("tech-99", &identity());
        assert_eq!(assigned, AssignedTo::Unknown("tech-99".to_string()));
        assert!(!assigned.matches_technician());
    }

    #[test]
    fn test_classify_is_case_sensitive_with_no_normalization() {
        assert!(!AssignedTo::classify("jane doe", &identity()).matches_technician());
        assert!(!AssignedTo::classify("TECH-42", &identity()).matches_technician());
        assert!(!AssignedTo::classify(" Jane Doe", &identity()).matches_technician());
    }

    #[test]
    fn test_classify_id_wins_when_id_and_name_collide() {
        let collided = TechnicianIdentity::new("Jane Doe", "Jane Doe");
        assert_eq!(
            AssignedTo::classify("Jane Doe", &collided),
            AssignedTo::ById(TechnicianId::from("Jane Doe"))
        );
    }

    #[test]
    fn test_filter_matches_both_forms() {
        // k1 is referenced by id, k2 by display name; both must match.
        let snapshot = snapshot_of(vec![
            ("k1", Report::new("Plumbing", "Building A", "Leak", "tech-42")),
            (
                "k2",
                Report::new("Electrical", "Building B", "Outage", "Jane Doe")
                    .with_status(ReportStatus::Resolved),
            ),
            ("k3", Report::new("HVAC", "Building C", "Noise", "tech-7")),
        ]);

        let assigned = filter_assigned(&snapshot, &identity());
        let keys: Vec<&str> = assigned.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(assigned.len(), 2);
        assert!(keys.contains(&"k1"));
        assert!(keys.contains(&"k2"));
    }

    #[test]
    fn test_filter_empty_snapshot_yields_empty() {
        let assigned = filter_assigned(&ReportSnapshot::new(), &identity());
        assert!(assigned.is_empty());
    }

    #[test]
    fn test_filter_no_match_yields_empty_not_error() {
        let snapshot = snapshot_of(vec![(
            "k1",
            Report::new("Plumbing", "Building A", "Leak", "tech-7"),
        )]);
        let nobody = TechnicianIdentity::new("tech-99", "Nobody Home");
        assert!(filter_assigned(&snapshot, &nobody).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let snapshot = snapshot_of(vec![
            ("k1", Report::new("Plumbing", "Building A", "Leak", "tech-42")),
            ("k2", Report::new("Electrical", "B", "Outage", "Jane Doe")),
        ]);
        let first = filter_assigned(&snapshot, &identity());
        let second = filter_assigned(&snapshot, &identity());
        assert_eq!(first, second);
    }

    #[test]
    fn test_filter_orders_by_submission_time_then_key() {
        let base = Utc::now();
        let snapshot = snapshot_of(vec![
            (
                "zz-later",
                Report::new("HVAC", "C", "Noise", "tech-42")
                    .with_submitted_at(base + Duration::minutes(5)),
            ),
            (
                "aa-early",
                Report::new("Plumbing", "A", "Leak", "tech-42").with_submitted_at(base),
            ),
            (
                "bb-tied",
                Report::new("Electrical", "B", "Outage", "Jane Doe").with_submitted_at(base),
            ),
        ]);

        let keys: Vec<String> = filter_assigned(&snapshot, &identity())
            .into_iter()
            .map(|(k, _)| k.into_inner())
            .collect();
        assert_eq!(keys, vec!["aa-early", "bb-tied", "zz-later"]);
    }
}
