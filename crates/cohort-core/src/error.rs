//! Error types for the Cohort core
//!
//! Covers the three failure classes the core can hit on its own:
//! - store I/O passed through unmodified
//! - malformed persisted records
//! - an empty allocation sequence at enrollment time
//!
//! Not-found conditions (unknown subject at login) are plain `false`/`None`
//! results, never errors.

use cohort_store::StoreError;

/// Main Cohort core error type
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Backing store failure, propagated unmasked
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A persisted record under `key` does not decode
    #[error("malformed record under '{key}': {source}")]
    Malformed {
        /// Storage key holding the bad record
        key: String,
        /// Decode failure
        #[source]
        source: serde_json::Error,
    },

    /// Allocation attempted against a zero-length sequence
    #[error("allocation sequence is empty")]
    EmptySequence,

    /// A sequence payload rejected at the write boundary
    #[error("invalid sequence payload: {0}")]
    InvalidSequence(String),
}

impl CoreError {
    /// Check if the error is a boundary rejection (caller input, not state)
    #[inline]
    #[must_use]
    pub fn is_rejected_input(&self) -> bool {
        matches!(self, Self::InvalidSequence(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sequence_display() {
        let err = CoreError::EmptySequence;
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn invalid_sequence_is_rejected_input() {
        assert!(CoreError::InvalidSequence("not an array".into()).is_rejected_input());
        assert!(!CoreError::EmptySequence.is_rejected_input());
    }
}
