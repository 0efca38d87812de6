//! Append-only document store
//!
//! One log file per collection at `<data_dir>/collections/<name>.log`.
//! The store is a collaborator of the validator, never a participant:
//! it receives documents the caller already had accepted, assigns ids,
//! and appends. It holds no schema knowledge beyond recording which
//! schema version a document was accepted under.
//!
//! Uniqueness is enforced out of band: collections may declare unique
//! fields (e.g. `isbn`), checked against the existing log at insert time.
//! A conflict is a `StoreError::UniqueViolation`, a different failure
//! class from validation rejection.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use uuid::Uuid;

use super::errors::{StoreError, StoreResult};
use super::record::StoredRecord;

/// Handle to a data directory of collection logs.
///
/// Explicitly constructed and explicitly passed by the caller; nothing in
/// this crate holds a process-wide store.
pub struct DocumentStore {
    collections_dir: PathBuf,
    /// Declared unique fields per collection
    unique_fields: HashMap<String, Vec<String>>,
}

impl DocumentStore {
    /// Opens (and if needed creates) the collections directory.
    pub fn open(
        data_dir: &Path,
        unique_fields: HashMap<String, Vec<String>>,
    ) -> StoreResult<Self> {
        let collections_dir = data_dir.join("collections");
        fs::create_dir_all(&collections_dir)?;
        Ok(Self {
            collections_dir,
            unique_fields,
        })
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.collections_dir.join(format!("{}.log", collection))
    }

    /// Appends an accepted document, assigning it a fresh document id.
    ///
    /// Declared unique fields are checked against the existing log first;
    /// a conflict leaves the log untouched.
    pub fn insert(
        &self,
        collection: &str,
        schema_id: &str,
        schema_version: &str,
        document: &Value,
    ) -> StoreResult<String> {
        self.check_unique(collection, document)?;

        let document_id = Uuid::new_v4().to_string();
        let body = serde_json::to_vec(document)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;
        let record = StoredRecord::new(&document_id, schema_id, schema_version, body);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.collection_path(collection))?;
        file.write_all(&record.serialize())?;
        file.flush()?;

        Ok(document_id)
    }

    /// Reads every record of a collection, verifying checksums.
    ///
    /// Returns (document id, document) pairs in insertion order. A missing
    /// log means an untouched collection: empty, not an error.
    pub fn scan(&self, collection: &str) -> StoreResult<Vec<(String, Value)>> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let data = fs::read(&path)?;
        let mut documents = Vec::new();
        let mut offset = 0usize;

        while offset < data.len() {
            let (record, consumed) =
                StoredRecord::deserialize(&data[offset..]).map_err(|e| {
                    StoreError::CorruptRecord {
                        collection: collection.to_string(),
                        offset: offset as u64,
                        reason: e.to_string(),
                    }
                })?;

            let body: Value = serde_json::from_slice(&record.body).map_err(|e| {
                StoreError::CorruptRecord {
                    collection: collection.to_string(),
                    offset: offset as u64,
                    reason: format!("body is not JSON: {}", e),
                }
            })?;

            documents.push((record.document_id, body));
            offset += consumed;
        }

        Ok(documents)
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: &str) -> StoreResult<usize> {
        Ok(self.scan(collection)?.len())
    }

    /// Out-of-band uniqueness check over the declared unique fields.
    fn check_unique(&self, collection: &str, document: &Value) -> StoreResult<()> {
        let fields = match self.unique_fields.get(collection) {
            Some(fields) if !fields.is_empty() => fields,
            _ => return Ok(()),
        };

        let existing = self.scan(collection)?;
        for field in fields {
            let candidate = match document.get(field) {
                Some(value) if !value.is_null() => value,
                _ => continue,
            };

            let taken = existing
                .iter()
                .any(|(_, stored)| stored.get(field) == Some(candidate));
            if taken {
                let value = match candidate.as_str() {
                    Some(s) => s.to_string(),
                    None => candidate.to_string(),
                };
                return Err(StoreError::UniqueViolation {
                    collection: collection.to_string(),
                    field: field.clone(),
                    value,
                });
            }
        }

        Ok(())
    }
}
