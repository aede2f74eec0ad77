//! Core types for the Cohort enrollment system
//!
//! Defines the persisted value types:
//! - Group assignments (the blinded allocation unit)
//! - Subject records (enrollment ledger entries)
//! - Subject credentials (login codes plus optional forced group)
//!
//! Wire shape matches the original study database: camelCase JSON arrays
//! under the keys in [`keys`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage keys for the three persisted collections
pub mod keys {
    /// Enrollment ledger: ordered `SubjectRecord` array
    pub const ASSIGNMENTS: &str = "assignments";
    /// Allocation sequence: ordered `GroupAssignment` array
    pub const SEQUENCE: &str = "sequence";
    /// Subject credentials: ordered `SubjectCredential` array
    pub const CREDENTIALS: &str = "credentials";
}

/// A study group a subject can be allocated to
///
/// Immutable value; "same group" is deep value equality, which is what
/// deduplicates a cyclic sequence into its distinct groups for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAssignment {
    /// Short identifier (e.g. "T1")
    pub group_id: String,
    /// Display name shown to the subject on reveal
    pub group_name: String,
    /// Protocol description (admin-facing, never shown to subjects)
    pub description: String,
}

impl GroupAssignment {
    /// Create new group assignment
    #[inline]
    #[must_use]
    pub fn new(
        group_id: impl Into<String>,
        group_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            group_name: group_name.into(),
            description: description.into(),
        }
    }
}

/// A completed enrollment: one ledger entry per subject
///
/// Created exactly once, at first successful allocation. The ledger's order
/// is load-bearing: a new subject's sequence index is the ledger length at
/// the moment of insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRecord {
    /// Subject ID exactly as submitted at enrollment
    pub subject_id: String,
    /// The resolved group, forced or sequential
    pub assigned_group: GroupAssignment,
    /// When the assignment was recorded
    pub enrollment_timestamp: DateTime<Utc>,
}

/// Login credential for one subject
///
/// Keyed case-insensitively by `subject_id`. Only `forced_group` is mutable
/// after creation; re-issuance never rotates the access code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectCredential {
    /// Subject ID exactly as submitted at issuance
    pub subject_id: String,
    /// 6-digit numeric login code
    pub access_code: String,
    /// When the credential was first issued
    pub created_at: DateTime<Utc>,
    /// Manual allocation override; pins a future enrollment to this group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forced_group: Option<GroupAssignment>,
}

/// Case-insensitive subject identity comparison
///
/// Ledger and credential records keep the ID as submitted; every lookup
/// normalizes instead.
#[inline]
#[must_use]
pub fn same_subject(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
