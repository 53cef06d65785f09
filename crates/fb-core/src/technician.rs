//! Technician identity types for Fixboard.
//!
//! Profiles are provisioned out-of-band and read-only to this core. Role
//! checks here are client-side convenience filtering; enforcement belongs to
//! the store's own access rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a technician, the profile store's primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TechnicianId(pub String);

impl TechnicianId {
    /// Creates a new `TechnicianId` from a string.
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Returns the underlying string representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `TechnicianId` and returns the underlying string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TechnicianId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TechnicianId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TechnicianId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Role tag on a technician profile.
///
/// Only [`Role::Technician`] grants dashboard access. Unknown role strings
/// are carried through verbatim and denied access.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Field technician; may open the dashboard.
    Technician,
    /// Any other provisioned role, carried verbatim.
    Other(String),
}

impl Role {
    /// Returns whether this role may open the technician dashboard.
    ///
    /// This is a client-side convenience check, not a security boundary.
    pub fn grants_dashboard_access(&self) -> bool {
        matches!(self, Role::Technician)
    }

    /// Returns the role tag as stored.
    pub fn as_str(&self) -> &str {
        match self {
            Role::Technician => "technician",
            Role::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "technician" => Role::Technician,
            _ => Role::Other(raw),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

/// A technician's profile record as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicianProfile {
    /// Human-readable display name.
    pub name: String,
    /// Provisioned role tag.
    pub role: Role,
}

impl TechnicianProfile {
    /// Creates a technician-role profile with the given display name.
    pub fn technician(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: Role::Technician,
        }
    }

    /// Returns true if the profile carries a usable display name.
    pub fn has_usable_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Resolved identity of the signed-in technician, passed explicitly through
/// the assignment filter and update paths instead of ambient session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicianIdentity {
    /// Opaque store identifier.
    pub id: TechnicianId,
    /// Display name from the resolved profile.
    pub name: String,
}

impl TechnicianIdentity {
    /// Creates an identity from an id and a resolved display name.
    pub fn new(id: impl Into<TechnicianId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
