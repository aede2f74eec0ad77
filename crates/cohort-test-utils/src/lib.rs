//! Testing utilities for the Cohort workspace
//!
//! Shared fixtures: stores, sequences, role pairs.

#![allow(missing_docs)]

use cohort_core::{CredentialPair, GroupAssignment, RoleCredentials};
use cohort_store::MemoryStore;

pub fn memory_store() -> MemoryStore {
    MemoryStore::new()
}

pub fn two_group_sequence() -> Vec<GroupAssignment> {
    vec![
        GroupAssignment::new("A", "Group A", "Control"),
        GroupAssignment::new("B", "Group B", "Intervention"),
    ]
}

/// Fixed role pairs used across tests: admin/admin-secret, ra/ra-secret
pub fn roles_fixture() -> RoleCredentials {
    RoleCredentials {
        administrator: CredentialPair {
            id: "admin".to_string(),
            secret: "admin-secret".to_string(),
        },
        assistant: CredentialPair {
            id: "ra".to_string(),
            secret: "ra-secret".to_string(),
        },
    }
}
