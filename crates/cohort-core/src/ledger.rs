//! Enrollment ledger access
//!
//! The ledger is the append-only record of completed enrollments and the
//! single source of truth for "who has been assigned what". Its length at
//! the moment of a new subject's insertion is that subject's sequence
//! index, so order matters. Entries are never updated or removed except by
//! a full reset.

use crate::error::CoreError;
use crate::records::{read_array, write_array};
use crate::types::{keys, same_subject, SubjectRecord};
use cohort_store::StudyStore;

/// Load the full ledger in arrival order
pub fn load(store: &dyn StudyStore) -> Result<Vec<SubjectRecord>, CoreError> {
    Ok(read_array(store, keys::ASSIGNMENTS)?.unwrap_or_default())
}

/// Find a subject's enrollment record, case-insensitive
pub fn find(
    store: &dyn StudyStore,
    subject_id: &str,
) -> Result<Option<SubjectRecord>, CoreError> {
    Ok(load(store)?
        .into_iter()
        .find(|r| same_subject(&r.subject_id, subject_id)))
}

/// Append one enrollment record
///
/// Callers must hold the allocation lock: the read-push-write here is what
/// makes ledger length racy under concurrent enrollment.
pub(crate) fn append(store: &dyn StudyStore, record: SubjectRecord) -> Result<(), CoreError> {
    let mut records = load(store)?;
    records.push(record);
    write_array(store, keys::ASSIGNMENTS, &records)
}
