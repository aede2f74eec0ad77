//! Shared JSON record access over the backing store
//!
//! Each persisted collection is one JSON-array value under a fixed key.
//! These helpers centralize the decode/encode and the "absent key" default.

use crate::error::CoreError;
use cohort_store::StudyStore;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read the JSON array under `key`, or `None` if the key is absent
pub(crate) fn read_array<T: DeserializeOwned>(
    store: &dyn StudyStore,
    key: &str,
) -> Result<Option<Vec<T>>, CoreError> {
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| CoreError::Malformed {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Overwrite the JSON array under `key`
pub(crate) fn write_array<T: Serialize>(
    store: &dyn StudyStore,
    key: &str,
    items: &[T],
) -> Result<(), CoreError> {
    let raw = serde_json::to_string(items).map_err(|source| CoreError::Malformed {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)?;
    Ok(())
}
