//! Backing key-value store for the Cohort enrollment system
//!
//! The domain core only ever touches persistence through [`StudyStore`]:
//! get/set/delete of opaque string values by string key. Two implementations
//! are provided:
//! - [`MemoryStore`] - in-process map, the substitute used by tests
//! - [`JsonFileStore`] - a single JSON object file, rewritten on every write

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying I/O failure
    #[error("store i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Store file exists but cannot be parsed
    #[error("store corrupt: {0}")]
    Corrupt(String),
}

/// Key-value store contract
///
/// Values are opaque strings (JSON documents in practice); the store never
/// interprets them. Absent keys are `Ok(None)`, not errors.
pub trait StudyStore: Send + Sync {
    /// Read the value under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`; removing an absent key is not an error
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: StudyStore + ?Sized> StudyStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }
}
