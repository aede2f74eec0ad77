//! Allocation sequence configuration
//!
//! The sequence is the ordered, cyclic list of group definitions used for
//! non-forced allocation. Absent from the store means the built-in default
//! (Tier 1 / Tier 2 alternating). An administrator replaces it wholesale;
//! the write boundary only checks that the payload is an array of the
//! expected shape - an empty sequence is accepted here and fails loudly at
//! allocation time instead.

use crate::error::CoreError;
use crate::records::{read_array, write_array};
use crate::types::{keys, GroupAssignment};
use cohort_store::StudyStore;

/// Built-in default sequence: Tier 1 / Tier 2 alternating, 8 slots
#[must_use]
pub fn default_sequence() -> Vec<GroupAssignment> {
    let tier1 = GroupAssignment::new("T1", "Tier 1 Group", "Standard Protocol");
    let tier2 = GroupAssignment::new("T2", "Tier 2 Group", "Enhanced Protocol");
    vec![
        tier1.clone(),
        tier2.clone(),
        tier1.clone(),
        tier2.clone(),
        tier1.clone(),
        tier2.clone(),
        tier1,
        tier2,
    ]
}

/// Load the configured sequence, falling back to the built-in default
pub fn load_sequence(store: &dyn StudyStore) -> Result<Vec<GroupAssignment>, CoreError> {
    Ok(read_array(store, keys::SEQUENCE)?.unwrap_or_else(default_sequence))
}

/// Replace the configured sequence wholesale
///
/// Content is not validated here: an empty or lopsided sequence is the
/// administrator's call (spec'd study designs vary), and an empty one
/// surfaces as [`CoreError::EmptySequence`] at the next allocation.
pub fn replace_sequence(
    store: &dyn StudyStore,
    sequence: &[GroupAssignment],
) -> Result<(), CoreError> {
    write_array(store, keys::SEQUENCE, sequence)?;
    tracing::info!(slots = sequence.len(), "sequence replaced");
    Ok(())
}

/// Replace the sequence from a raw JSON payload (admin textarea semantics)
///
/// Rejects non-array or malformed input without touching persisted state.
/// Returns the parsed sequence on success.
pub fn replace_sequence_json(
    store: &dyn StudyStore,
    payload: &str,
) -> Result<Vec<GroupAssignment>, CoreError> {
    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| CoreError::InvalidSequence(format!("not valid JSON: {e}")))?;
    if !value.is_array() {
        return Err(CoreError::InvalidSequence("must be an array".to_string()));
    }
    let sequence: Vec<GroupAssignment> = serde_json::from_value(value)
        .map_err(|e| CoreError::InvalidSequence(format!("bad group entry: {e}")))?;

    replace_sequence(store, &sequence)?;
    Ok(sequence)
}

/// Distinct groups in a sequence, by deep equality, in first-seen order
///
/// Display helper: collapses a cyclic sequence into the set of groups it
/// allocates to.
#[must_use]
pub fn distinct_groups(sequence: &[GroupAssignment]) -> Vec<GroupAssignment> {
    let mut seen = Vec::new();
    for group in sequence {
        if !seen.contains(group) {
            seen.push(group.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_store::MemoryStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_sequence_alternates_two_tiers() {
        let seq = default_sequence();
        assert_eq!(seq.len(), 8);
        assert_eq!(seq[0].group_id, "T1");
        assert_eq!(seq[1].group_id, "T2");
        assert_eq!(distinct_groups(&seq).len(), 2);
    }

    #[test]
    fn absent_sequence_loads_default() {
        let store = MemoryStore::new();
        assert_eq!(load_sequence(&store).unwrap(), default_sequence());
    }

    #[test]
    fn replace_overwrites_wholesale() {
        let store = MemoryStore::new();
        let seq = vec![GroupAssignment::new("A", "Group A", "Control")];
        replace_sequence(&store, &seq).unwrap();
        assert_eq!(load_sequence(&store).unwrap(), seq);
    }

    #[test]
    fn empty_sequence_is_accepted_at_write_time() {
        let store = MemoryStore::new();
        replace_sequence(&store, &[]).unwrap();
        assert!(load_sequence(&store).unwrap().is_empty());
    }

    #[test]
    fn json_boundary_rejects_non_array() {
        let store = MemoryStore::new();
        let err = replace_sequence_json(&store, "{\"groupId\": \"A\"}").unwrap_err();
        assert!(matches!(err, CoreError::InvalidSequence(_)));
    }

    #[test]
    fn json_boundary_rejects_malformed_without_overwrite() {
        let store = MemoryStore::new();
        let prior = vec![GroupAssignment::new("A", "Group A", "Control")];
        replace_sequence(&store, &prior).unwrap();

        assert!(replace_sequence_json(&store, "[{]").is_err());
        assert!(replace_sequence_json(&store, "[{\"groupId\": 7}]").is_err());
        // Prior state intact
        assert_eq!(load_sequence(&store).unwrap(), prior);
    }

    #[test]
    fn json_boundary_accepts_well_formed_array() {
        let store = MemoryStore::new();
        let parsed = replace_sequence_json(
            &store,
            r#"[
                {"groupId": "A", "groupName": "Group A", "description": "Control"},
                {"groupId": "B", "groupName": "Group B", "description": "Intervention"}
            ]"#,
        )
        .unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(load_sequence(&store).unwrap(), parsed);
    }
}
