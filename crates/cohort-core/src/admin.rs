//! Administrative operations and roster views

use crate::error::CoreError;
use crate::types::{keys, same_subject, SubjectCredential};
use crate::{credentials, ledger};
use cohort_store::StudyStore;
use serde::Serialize;

/// Wipe the enrollment ledger and the credential directory
///
/// Irreversible. The configured sequence is deliberately untouched so a
/// study can be re-run against the same allocation list.
pub fn reset_all(store: &dyn StudyStore) -> Result<(), CoreError> {
    tracing::warn!("resetting ledger and credential directory");
    store.delete(keys::ASSIGNMENTS)?;
    store.delete(keys::CREDENTIALS)?;
    Ok(())
}

/// One roster row: a credential joined with its enrollment status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    /// The subject's credential
    #[serde(flatten)]
    pub credential: SubjectCredential,
    /// Whether the subject has an enrollment record
    pub enrolled: bool,
}

/// Research-assistant roster: every credential with enrolled/pending status
pub fn roster(store: &dyn StudyStore) -> Result<Vec<RosterEntry>, CoreError> {
    let enrollments = ledger::load(store)?;
    Ok(credentials::list(store)?
        .into_iter()
        .map(|credential| {
            let enrolled = enrollments
                .iter()
                .any(|r| same_subject(&r.subject_id, &credential.subject_id));
            RosterEntry {
                credential,
                enrolled,
            }
        })
        .collect())
}
