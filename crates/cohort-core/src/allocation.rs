//! Allocation engine
//!
//! The one piece of logic with real invariants:
//! - at most one ledger entry per subject, ever
//! - a forced group on the credential beats sequence position
//! - otherwise the assignment is `sequence[ledger_len % sequence_len]`,
//!   ledger length taken *before* the subject's own insertion
//!
//! The whole read-resolve-append runs under a per-engine mutex so two
//! concurrent first enrollments cannot observe the same ledger length and
//! land on the same slot.

use crate::error::CoreError;
use crate::types::{GroupAssignment, SubjectRecord};
use crate::{credentials, ledger, sequence};
use chrono::Utc;
use cohort_store::StudyStore;
use parking_lot::Mutex;

/// How an enrollment's group was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationKind {
    /// Subject was already in the ledger; nothing written
    Existing,
    /// Credential carried a forced group
    Forced,
    /// Sequential slot from the configured sequence
    Sequential,
}

/// Result of an enrollment call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    /// The resolved group
    pub group: GroupAssignment,
    /// How it was resolved
    pub kind: AllocationKind,
}

/// The allocation engine
///
/// Owns the store handle and the enrollment lock. Construct one per store;
/// all enrollments for that store must go through the same engine.
#[derive(Debug)]
pub struct AllocationEngine<S: StudyStore> {
    store: S,
    enroll_lock: Mutex<()>,
}

impl<S: StudyStore> AllocationEngine<S> {
    /// Create new engine over `store`
    #[inline]
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            enroll_lock: Mutex::new(()),
        }
    }

    /// Access the underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Enroll a subject, returning its group
    ///
    /// Idempotent: the first call for a subject appends exactly one ledger
    /// record; every later call (any casing of the ID) returns the recorded
    /// group unchanged and writes nothing.
    ///
    /// # Errors
    /// - [`CoreError::EmptySequence`] if a sequential assignment is needed
    ///   and the configured sequence has no slots
    /// - store and decode failures, propagated unmodified
    pub fn enroll(&self, subject_id: &str) -> Result<Enrollment, CoreError> {
        let _guard = self.enroll_lock.lock();

        // 1. Repeat visit: return the recorded assignment, touch nothing.
        if let Some(existing) = ledger::find(&self.store, subject_id)? {
            tracing::debug!(subject = subject_id, group = %existing.assigned_group.group_id,
                "repeat enrollment");
            return Ok(Enrollment {
                group: existing.assigned_group,
                kind: AllocationKind::Existing,
            });
        }

        // 2. Manual allocation takes absolute precedence; the sequence is
        //    not consulted at all.
        let (group, kind) = match credentials::find(&self.store, subject_id)?
            .and_then(|c| c.forced_group)
        {
            Some(forced) => (forced, AllocationKind::Forced),
            None => {
                // 3. Sequential slot from arrival order among prior subjects.
                let seq = sequence::load_sequence(&self.store)?;
                if seq.is_empty() {
                    return Err(CoreError::EmptySequence);
                }
                let position = ledger::load(&self.store)?.len();
                let group = seq[position % seq.len()].clone();
                (group, AllocationKind::Sequential)
            }
        };

        // 4. Record the assignment. Same lock scope as the index read above.
        tracing::info!(subject = subject_id, group = %group.group_id, ?kind, "subject enrolled");
        ledger::append(
            &self.store,
            SubjectRecord {
                subject_id: subject_id.to_string(),
                assigned_group: group.clone(),
                enrollment_timestamp: Utc::now(),
            },
        )?;

        Ok(Enrollment { group, kind })
    }
}
