//! Document store errors
//!
//! Store conditions are the caller's problem, not the validator's: a
//! uniqueness violation in particular is reported separately from any
//! validation rejection, since the document itself was accepted.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Collection '{0}' not found")]
    CollectionNotFound(String),

    #[error("Unique value conflict in '{collection}': field '{field}' already holds '{value}'")]
    UniqueViolation {
        collection: String,
        field: String,
        value: String,
    },

    #[error("Corrupt record in '{collection}' at offset {offset}: {reason}")]
    CorruptRecord {
        collection: String,
        offset: u64,
        reason: String,
    },

    #[error("Record serialization failed: {0}")]
    Serialize(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e.to_string())
    }
}
