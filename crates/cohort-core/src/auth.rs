//! Authentication predicates
//!
//! Three independent credential domains, intentionally not unified:
//! subject login (against the credential directory), administrator, and
//! research assistant (two fixed role pairs injected as configuration).
//! These are pure yes/no identity checks - no sessions, no tokens. The
//! application shell re-checks on every privileged action.

use crate::credentials;
use crate::error::CoreError;
use cohort_store::StudyStore;
use serde::Deserialize;

/// Privileged roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Full configuration access: sequence, credentials, reset
    Administrator,
    /// Read-only roster access (enforced at the application layer)
    ResearchAssistant,
}

/// One role's fixed ID/secret pair
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialPair {
    /// Login identifier
    pub id: String,
    /// Shared secret
    pub secret: String,
}

/// Role credentials injected at startup
///
/// Replaces the original's hardcoded pairs: configuration, not logic.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleCredentials {
    /// Administrator pair
    pub administrator: CredentialPair,
    /// Research-assistant pair
    pub assistant: CredentialPair,
}

impl RoleCredentials {
    /// Check a claimed role identity; exact string match on both fields
    #[must_use]
    pub fn verify(&self, role: Role, id: &str, secret: &str) -> bool {
        let pair = match role {
            Role::Administrator => &self.administrator,
            Role::ResearchAssistant => &self.assistant,
        };
        pair.id == id && pair.secret == secret
    }
}

/// Verify a subject login
///
/// True iff a credential exists for `subject_id` (case-insensitive) whose
/// access code matches exactly. Unknown subjects are `false`, not errors.
pub fn verify_subject(
    store: &dyn StudyStore,
    subject_id: &str,
    access_code: &str,
) -> Result<bool, CoreError> {
    Ok(credentials::find(store, subject_id)?
        .map(|c| c.access_code == access_code)
        .unwrap_or(false))
}
