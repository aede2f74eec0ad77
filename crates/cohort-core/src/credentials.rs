//! Credential directory and issuance
//!
//! One credential per subject, keyed case-insensitively. Issuance for an
//! existing subject never rotates the access code; it only sets or replaces
//! the forced-group override when one is supplied. Codes are 6-digit
//! numeric strings drawn uniformly from [100000, 999999] - no cross-subject
//! uniqueness is enforced (codes are per-subject secrets, not global keys).

use crate::error::CoreError;
use crate::records::{read_array, write_array};
use crate::types::{keys, same_subject, GroupAssignment, SubjectCredential};
use chrono::Utc;
use cohort_store::StudyStore;
use rand::Rng;

/// Load all credentials in issuance order
pub fn list(store: &dyn StudyStore) -> Result<Vec<SubjectCredential>, CoreError> {
    Ok(read_array(store, keys::CREDENTIALS)?.unwrap_or_default())
}

/// Find a subject's credential, case-insensitive
pub fn find(
    store: &dyn StudyStore,
    subject_id: &str,
) -> Result<Option<SubjectCredential>, CoreError> {
    Ok(list(store)?
        .into_iter()
        .find(|c| same_subject(&c.subject_id, subject_id)))
}

/// Issue or update a subject's credential, returning the access code
///
/// - Existing subject: keep the code; overwrite `forced_group` iff one was
///   supplied (this retroactively changes a future allocation, never a
///   ledger entry that already exists).
/// - New subject: fresh random code, `created_at` now, persist.
pub fn issue(
    store: &dyn StudyStore,
    subject_id: &str,
    forced_group: Option<GroupAssignment>,
) -> Result<String, CoreError> {
    let mut credentials = list(store)?;

    if let Some(existing) = credentials
        .iter_mut()
        .find(|c| same_subject(&c.subject_id, subject_id))
    {
        if let Some(group) = forced_group {
            tracing::info!(subject = subject_id, group = %group.group_id, "forced group set");
            existing.forced_group = Some(group);
        }
        let code = existing.access_code.clone();
        write_array(store, keys::CREDENTIALS, &credentials)?;
        return Ok(code);
    }

    let code = generate_access_code();
    tracing::info!(subject = subject_id, forced = forced_group.is_some(), "credential issued");
    credentials.push(SubjectCredential {
        subject_id: subject_id.to_string(),
        access_code: code.clone(),
        created_at: Utc::now(),
        forced_group,
    });
    write_array(store, keys::CREDENTIALS, &credentials)?;
    Ok(code)
}

/// Uniformly random 6-digit numeric access code
fn generate_access_code() -> String {
    rand::rng().random_range(100_000..=999_999u32).to_string()
}
